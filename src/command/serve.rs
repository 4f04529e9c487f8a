//! Starts the dashboard: loads the config, prepares the database and serves HTTP until shutdown.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;

use crate::internal::{
    config::DashboardConfig, db, discord::client::DiscordRestClient, web,
};

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Path of the TOML configuration file
    #[arg(short, long, default_value = "dashboard.toml")]
    pub config: PathBuf,

    /// Overrides `website.listen`
    #[arg(long)]
    pub listen: Option<String>,
}

pub async fn execute(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = DashboardConfig::load(&args.config)?;
    if let Some(listen) = args.listen {
        config.website.listen = listen;
    }
    tracing::info!(
        "Loaded config from {} ({} clusters, {} shards)",
        args.config.display(),
        config.clusters.len(),
        config.discord.max_shards
    );

    let db = db::establish_connection(&config.database.url)
        .await
        .with_context(|| format!("failed to connect to {}", config.database.url))?;
    db::setup_schema(&db).await?;

    let discord = Arc::new(DiscordRestClient::new(&config.discord)?);
    let sessions = config.session_store();
    let state = web::AppState {
        config: Arc::new(config),
        db,
        sessions,
        oauth: discord.clone(),
        guilds: discord,
    };
    web::start_server(state).await
}
