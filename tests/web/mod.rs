//! Shared helpers for the dashboard route tests: a router over fake Discord collaborators and an
//! in-memory database.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response, header},
};
use loritta_dashboard::{
    internal::{
        config::DashboardConfig,
        discord::oauth::AuthTokens,
        session::{DashboardSession, SESSION_COOKIE},
        web::{self, AppState},
    },
    utils::test::{FakeGuilds, FakeOAuth, TEST_HOST, test_config, test_state},
};
use tower::ServiceExt;
use uuid::Uuid;

mod auth_test;
mod guild_config_test;

/// Guild on shard 0, served by the cluster at [`TEST_HOST`].
pub const LOCAL_GUILD: u64 = 2 << 22;
/// Guild on shard 1, served by `c2.`[`TEST_HOST`].
pub const REMOTE_GUILD: u64 = 1 << 22;

pub struct TestApp {
    pub state: AppState,
    pub oauth: Arc<FakeOAuth>,
    pub guilds: Arc<FakeGuilds>,
}

impl TestApp {
    pub async fn new(visible_guilds: &[u64]) -> Self {
        Self::with_config(test_config(), visible_guilds).await
    }

    pub async fn with_config(config: DashboardConfig, visible_guilds: &[u64]) -> Self {
        let oauth = Arc::new(FakeOAuth::default());
        let guilds = Arc::new(FakeGuilds::with_visible(visible_guilds.iter().copied()));
        let state = test_state(config, oauth.clone(), guilds.clone())
            .await
            .unwrap();
        Self {
            state,
            oauth,
            guilds,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        web::router(self.state.clone())
            .oneshot(request)
            .await
            .unwrap()
    }

    /// Stores a logged in session and returns its cookie header value.
    pub async fn login(&self) -> String {
        format!("{SESSION_COOKIE}={}", self.login_id().await)
    }

    /// Stores a logged in session and returns its id.
    pub async fn login_id(&self) -> Uuid {
        let id = Uuid::new_v4();
        let session = DashboardSession {
            discord_auth: Some(AuthTokens {
                access_token: "token".to_string(),
                refresh_token: None,
                token_type: "Bearer".to_string(),
                expires_in: 604_800,
                scope: "identify".to_string(),
            }),
            identification: Some(FakeOAuth::user()),
        };
        self.state.sessions.insert(id, session).await;
        id
    }
}

/// `GET uri` addressed to [`TEST_HOST`].
pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::HOST, TEST_HOST)
        .body(Body::empty())
        .unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
