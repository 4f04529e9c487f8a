//! Waiting for a freshly invited guild to show up for the bot.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, header::AUTHORIZATION};

use super::{DiscordError, check_status, client::DiscordRestClient};

#[async_trait]
pub trait GuildDirectory: Send + Sync {
    /// Whether the bot can currently see `guild_id`.
    async fn is_guild_visible(&self, guild_id: u64) -> Result<bool, DiscordError>;
}

#[async_trait]
impl GuildDirectory for DiscordRestClient {
    async fn is_guild_visible(&self, guild_id: u64) -> Result<bool, DiscordError> {
        let response = self
            .http_client
            .get(self.endpoint(&format!("guilds/{guild_id}"))?)
            .header(AUTHORIZATION, format!("Bot {}", self.bot_token))
            .send()
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => Ok(false),
            _ => check_status(response).await.map(|_| true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildPoll {
    /// Seen after `tries` misses.
    Found { tries: u32 },
    Exhausted { tries: u32 },
}

/// Polls `directory` until the guild is visible, at most `max_tries` times.
///
/// Lookup errors count as misses. `interval` is slept between attempts, never after the last one.
pub async fn wait_for_guild(
    directory: &dyn GuildDirectory,
    guild_id: u64,
    max_tries: u32,
    interval: Duration,
) -> GuildPoll {
    let mut tries = 0;
    while tries < max_tries {
        match directory.is_guild_visible(guild_id).await {
            Ok(true) => {
                tracing::info!("Guild {guild_id} was successfully found after {tries} tries!");
                return GuildPoll::Found { tries };
            }
            Ok(false) => {}
            Err(e) => tracing::warn!("Failed to look up guild {guild_id}: {e}"),
        }
        tries += 1;
        tracing::warn!(
            "Received guild {guild_id} via OAuth2 scope, but I'm not in that guild yet! Tries: {tries}"
        );
        if tries < max_tries {
            tokio::time::sleep(interval).await;
        }
    }
    GuildPoll::Exhausted { tries }
}
