//! OAuth2 authorization-code grant against Discord and the identification of the logged in user.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use super::{DiscordError, check_status, client::DiscordRestClient};

/// Scopes requested by the dashboard login.
pub const SCOPES: [&str; 4] = ["identify", "guilds", "email", "guilds.join"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub scope: String,
}

/// The subset of `/users/@me` the dashboard uses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentification {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
}

#[async_trait]
pub trait DiscordOAuth: Send + Sync {
    /// Exchanges an authorization code for tokens. `redirect_uri` must match the authorize request.
    async fn exchange_code(&self, code: &str, redirect_uri: &str)
    -> Result<AuthTokens, DiscordError>;

    async fn identify(&self, tokens: &AuthTokens) -> Result<UserIdentification, DiscordError>;
}

#[async_trait]
impl DiscordOAuth for DiscordRestClient {
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AuthTokens, DiscordError> {
        let scope = SCOPES.join(" ");
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("scope", scope.as_str()),
        ];
        let response = self
            .http_client
            .post(self.endpoint("oauth2/token")?)
            .form(&form)
            .send()
            .await?;
        let tokens: AuthTokens = check_status(response).await?.json().await?;
        tracing::debug!(scope = %tokens.scope, "exchanged authorization code");
        Ok(tokens)
    }

    async fn identify(&self, tokens: &AuthTokens) -> Result<UserIdentification, DiscordError> {
        let response = self
            .http_client
            .get(self.endpoint("users/@me")?)
            .header(
                AUTHORIZATION,
                format!("{} {}", tokens.token_type, tokens.access_token),
            )
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }
}
