//! Discord collaborators of the dashboard: the OAuth2 code grant, guild visibility checks through
//! the bot account, and shard to cluster routing.

use reqwest::StatusCode;
use thiserror::Error;

pub mod client;
pub mod cluster;
pub mod guild;
pub mod oauth;

/// User agent Discord uses when it crawls links to build embeds.
pub const DISCORD_CRAWLER_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Discordbot/2.0; +https://discordapp.com)";

#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("request to discord failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid discord api url: {0}")]
    Url(#[from] url::ParseError),

    #[error("discord answered {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Turns a non-success response into [`DiscordError::Status`].
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, DiscordError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(DiscordError::Status { status, body })
    }
}
