//! HTTP client for the guild configuration endpoints that load and save custom commands.

use reqwest::{Client as HttpClient, StatusCode, header::COOKIE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::{
    CustomCommand, SAVE_TYPE,
    editor::{CustomCommandsEditor, SaveRequest},
};
use crate::internal::session::SESSION_COOKIE;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid dashboard url: {0}")]
    Url(#[from] url::ParseError),

    #[error("dashboard answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error(transparent)]
    Command(#[from] super::CommandError),
}

/// The slice of a guild configuration holding its custom commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialGuildConfiguration {
    #[serde(default)]
    pub custom_commands: Vec<CustomCommand>,
}

#[derive(Clone, Debug)]
pub struct DashboardClient {
    base_url: Url,
    http_client: HttpClient,
    session_id: Option<String>,
}

impl DashboardClient {
    /// Creates a client for the dashboard at `base_url`, with a 30 seconds timeout.
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http_client = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {e}. Using default client.");
                HttpClient::new()
            });
        Self {
            base_url,
            http_client,
            session_id: None,
        }
    }

    /// Sends `session_id` as the dashboard session cookie on every request.
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    fn config_url(&self, guild_id: u64) -> Result<Url, ClientError> {
        Ok(self
            .base_url
            .join(&format!("api/v1/guilds/{guild_id}/config"))?)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session_id {
            Some(id) => request.header(COOKIE, format!("{SESSION_COOKIE}={id}")),
            None => request,
        }
    }

    pub async fn retrieve_custom_commands(
        &self,
        guild_id: u64,
    ) -> Result<Vec<CustomCommand>, ClientError> {
        let request = self
            .http_client
            .get(self.config_url(guild_id)?)
            .query(&[("sections", SAVE_TYPE)]);
        let response = check_status(self.authorize(request).send().await?).await?;
        let config: PartialGuildConfiguration = response.json().await?;
        tracing::debug!(
            guild_id,
            count = config.custom_commands.len(),
            "retrieved custom commands"
        );
        Ok(config.custom_commands)
    }

    pub async fn save(&self, guild_id: u64, request: &SaveRequest) -> Result<(), ClientError> {
        let builder = self
            .http_client
            .patch(self.config_url(guild_id)?)
            .json(request);
        check_status(self.authorize(builder).send().await?).await?;
        tracing::info!(guild_id, save_type = %request.save_type, "saved guild configuration");
        Ok(())
    }

    /// Fetches the guild's commands and attaches them to `editor`.
    pub async fn load_editor(
        &self,
        editor: &mut CustomCommandsEditor,
        guild_id: u64,
    ) -> Result<(), ClientError> {
        let commands = self.retrieve_custom_commands(guild_id).await?;
        editor.attach(guild_id, commands);
        Ok(())
    }

    /// Saves whatever `editor` currently holds.
    pub async fn save_editor(&self, editor: &CustomCommandsEditor) -> Result<(), ClientError> {
        let request = editor.save_request()?;
        self.save(editor.guild_id()?, &request).await
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status { status, body })
    }
}
