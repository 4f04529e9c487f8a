//! Dashboard HTTP server: the OAuth2 callback and the guild configuration API.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::internal::{
    config::DashboardConfig,
    discord::{guild::GuildDirectory, oauth::DiscordOAuth, oauth::UserIdentification},
    session::{SessionStore, session_cookie},
};

pub mod auth;
pub mod error;
pub mod guild_config;
pub mod pages;

use error::AppError;

/// Everything a request handler needs, owned by the router instead of living in globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub db: DatabaseConnection,
    pub sessions: SessionStore,
    pub oauth: Arc<dyn DiscordOAuth>,
    pub guilds: Arc<dyn GuildDirectory>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/dashboardauth", get(auth::dashboard_auth))
        .route(
            "/api/v1/guilds/{guild_id}/config",
            get(guild_config::retrieve).patch(guild_config::save),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `website.listen` and serves until Ctrl+C or SIGTERM.
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let address = state.config.website.listen.clone();
    let app = router(state);

    tracing::info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("Dashboard running on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Dashboard shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// `302 Found`.
pub(crate) fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// `301 Moved Permanently`.
pub(crate) fn moved_permanently(location: String) -> Response {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

pub(crate) fn with_session_cookie(mut response: Response, id: &Uuid) -> Response {
    if let Some(cookie) = session_cookie(id) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

/// The identification of the logged in user, or [`AppError::Unauthorized`].
pub(crate) async fn require_login(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<UserIdentification, AppError> {
    state
        .sessions
        .from_headers(headers)
        .await
        .and_then(|(_, session)| session.identification)
        .ok_or(AppError::Unauthorized)
}
