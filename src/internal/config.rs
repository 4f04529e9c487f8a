//! Dashboard configuration loaded from a TOML file, with secrets overridable from the environment.

use std::{env, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::internal::session::SessionStore;

/// Environment variable overriding `discord.client_secret`.
pub const CLIENT_SECRET_ENV: &str = "LORITTA_CLIENT_SECRET";
/// Environment variable overriding `discord.bot_token`.
pub const BOT_TOKEN_ENV: &str = "LORITTA_BOT_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid website url `{0}`")]
    WebsiteUrl(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub website: WebsiteConfig,
    pub discord: DiscordConfig,
    pub database: DatabaseConfig,
    pub clusters: Vec<ClusterConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebsiteConfig {
    pub url: String,
    /// Address the HTTP server binds to.
    pub listen: String,
    /// How many times the guild cache is polled after the bot was invited.
    pub max_guild_tries: u32,
    pub guild_poll_interval_ms: u64,
    /// Lifetime of a dashboard login session.
    pub session_ttl_secs: u64,
    /// Sessions kept in memory before the oldest is evicted.
    pub max_sessions: usize,
}

impl Default for WebsiteConfig {
    fn default() -> Self {
        Self {
            url: "https://loritta.website/".to_string(),
            listen: "0.0.0.0:4568".to_string(),
            max_guild_tries: 5,
            guild_poll_interval_ms: 1_000,
            session_ttl_secs: 7 * 24 * 60 * 60,
            max_sessions: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    pub client_id: String,
    pub client_secret: String,
    pub bot_token: String,
    /// Full authorize URL including `client_id`, `scope` and `response_type`; `&state=` is appended.
    pub authorization_url: String,
    pub api_base: String,
    pub max_shards: u64,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            bot_token: String::new(),
            authorization_url: "https://discord.com/oauth2/authorize?response_type=code\
                &scope=identify%20guilds%20email%20guilds.join"
                .to_string(),
            api_base: "https://discord.com/api/v10/".to_string(),
            max_shards: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://loritta-dashboard.db?mode=rwc".to_string(),
        }
    }
}

/// One deployment cluster serving the shards `min_shard..=max_shard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub id: u64,
    pub name: String,
    /// Host name the cluster's dashboard is reachable at, without scheme.
    pub url: String,
    pub min_shard: u64,
    pub max_shard: u64,
}

impl DashboardConfig {
    /// Reads `path` and applies environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env();
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.website_host()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(secret) = env::var(CLIENT_SECRET_ENV) {
            tracing::debug!("{CLIENT_SECRET_ENV} set, overriding discord.client_secret");
            self.discord.client_secret = secret;
        }
        if let Ok(token) = env::var(BOT_TOKEN_ENV) {
            tracing::debug!("{BOT_TOKEN_ENV} set, overriding discord.bot_token");
            self.discord.bot_token = token;
        }
    }

    /// Host part of `website.url`.
    pub fn website_host(&self) -> Result<String, ConfigError> {
        url::Url::parse(&self.website.url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .ok_or_else(|| ConfigError::WebsiteUrl(self.website.url.clone()))
    }

    pub fn guild_poll_interval(&self) -> Duration {
        Duration::from_millis(self.website.guild_poll_interval_ms)
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::with_limits(
            Duration::from_secs(self.website.session_ttl_secs),
            self.website.max_sessions,
        )
    }
}
