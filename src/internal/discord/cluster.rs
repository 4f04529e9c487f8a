//! Shard and cluster lookup for a guild id.

use crate::internal::config::ClusterConfig;

/// Shard a guild lives on: `(guild_id >> 22) % max_shards`.
pub fn shard_for_guild(guild_id: u64, max_shards: u64) -> u64 {
    (guild_id >> 22) % max_shards.max(1)
}

/// The cluster whose shard range contains the guild's shard.
pub fn cluster_for_guild(
    guild_id: u64,
    clusters: &[ClusterConfig],
    max_shards: u64,
) -> Option<&ClusterConfig> {
    let shard = shard_for_guild(guild_id, max_shards);
    clusters
        .iter()
        .find(|cluster| (cluster.min_shard..=cluster.max_shard).contains(&shard))
}
