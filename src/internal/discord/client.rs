use reqwest::Client as HttpClient;
use url::Url;

use super::DiscordError;
use crate::internal::config::DiscordConfig;

/// REST client for the Discord API.
///
/// Serves both the OAuth2 exchange (application credentials) and bot lookups (bot token).
#[derive(Clone, Debug)]
pub struct DiscordRestClient {
    /// API root, always ending with `/`.
    pub api_base: Url,
    pub http_client: HttpClient,
    pub client_id: String,
    pub client_secret: String,
    pub bot_token: String,
}

impl DiscordRestClient {
    /// Creates a client from the `[discord]` config section.
    ///
    /// The HTTP client is configured with a 30 seconds timeout.
    pub fn new(config: &DiscordConfig) -> Result<Self, DiscordError> {
        let mut api_base = Url::parse(&config.api_base)?;
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        let http_client = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to build HTTP client with timeout: {}. Using default client.",
                    e
                );
                HttpClient::new()
            });

        Ok(Self {
            api_base,
            http_client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            bot_token: config.bot_token.clone(),
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, DiscordError> {
        Ok(self.api_base.join(path)?)
    }
}
