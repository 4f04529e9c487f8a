//! `/dashboardauth`: the OAuth2 callback that logs users in and routes them to the right page,
//! including the bot-invite flow where the callback carries the invited `guild_id`.

use axum::{
    extract::{Query, State},
    http::{Extensions, HeaderMap, Uri, header::USER_AGENT},
    response::{Html, IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;
use uuid::Uuid;

use super::{AppState, error::AppError, found, moved_permanently, pages, with_session_cookie};
use crate::{
    internal::{
        db,
        discord::{
            DISCORD_CRAWLER_USER_AGENT,
            cluster::cluster_for_guild,
            guild::{GuildPoll, wait_for_guild},
            oauth::UserIdentification,
        },
    },
    utils::request::{client_ip, request_host},
};

/// Code a master cluster sends along when forwarding a user to the cluster owning their guild.
pub const FROM_MASTER: &str = "from_master";

#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    pub state: Option<String>,
    pub guild_id: Option<String>,
    pub code: Option<String>,
    pub from_master: Option<String>,
}

pub async fn dashboard_auth(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
    uri: Uri,
    headers: HeaderMap,
    extensions: Extensions,
) -> Result<Response, AppError> {
    let default_host = state.config.website_host().unwrap_or_default();
    let host = request_host(&headers, &default_host);
    let (session_id, mut session) = state
        .sessions
        .from_headers(&headers)
        .await
        .unwrap_or_else(|| (Uuid::new_v4(), Default::default()));

    let Some(code) = query.code.as_deref() else {
        if session.discord_auth.is_some() {
            return Ok(found(format!("https://{host}/dashboard")));
        }
        let user_agent = headers.get(USER_AGENT).and_then(|ua| ua.to_str().ok());
        if user_agent == Some(DISCORD_CRAWLER_USER_AGENT) {
            return Ok(Html(pages::discord_crawler_authentication()).into_response());
        }
        return Ok(found(authorization_redirect(
            &state.config.discord.authorization_url,
            &host,
            uri.path(),
        )));
    };

    let mut session_updated = false;
    let identification = match (code, session.identification.clone()) {
        (FROM_MASTER, Some(identification)) => identification,
        _ => {
            let redirect_uri = format!("https://{host}/dashboardauth");
            let tokens = state.oauth.exchange_code(code, &redirect_uri).await?;
            let identification = state.oauth.identify(&tokens).await?;
            session.discord_auth = Some(tokens);
            session.identification = Some(identification.clone());
            state.sessions.insert(session_id, session).await;
            session_updated = true;
            identification
        }
    };
    tracing::info!(user_id = %identification.id, "User authenticated on the dashboard");

    let ip = client_ip(&headers, &extensions);
    log_banned_accounts(&state, ip.as_deref(), &identification).await;

    let response = route_authenticated(&state, &query, &host).await?;
    Ok(if session_updated {
        with_session_cookie(response, &session_id)
    } else {
        response
    })
}

/// Where a logged in user goes next: state redirect, owning cluster, invited guild, or dashboard.
async fn route_authenticated(
    state: &AppState,
    query: &AuthQuery,
    host: &str,
) -> Result<Response, AppError> {
    if let Some(encoded) = &query.state {
        if let Some(redirect_url) = decode_state_redirect(encoded)? {
            if is_trusted_redirect(state, host, &redirect_url) {
                return Ok(found(redirect_url));
            }
            tracing::warn!("Ignoring state redirect to untrusted url {redirect_url}");
        }
    }

    let Some(raw_guild_id) = &query.guild_id else {
        return Ok(found(format!("https://{host}/dashboard")));
    };
    let guild_id: u64 = raw_guild_id
        .parse()
        .map_err(|_| AppError::InvalidGuildId(raw_guild_id.clone()))?;

    if query.from_master.is_none() {
        let config = &state.config;
        match cluster_for_guild(guild_id, &config.clusters, config.discord.max_shards) {
            Some(cluster) if cluster.url != host => {
                tracing::info!(
                    "Received guild {guild_id} via OAuth2 scope, but the guild isn't in this cluster! Redirecting to {}",
                    cluster.name
                );
                return Ok(moved_permanently(format!(
                    "https://{}/dashboard?guild_id={guild_id}&code={FROM_MASTER}",
                    cluster.url
                )));
            }
            Some(_) => {}
            None => tracing::warn!("No cluster configured for guild {guild_id}, serving it here"),
        }
    }

    tracing::info!("Received guild {guild_id} via OAuth2 scope, waiting for it to show up...");
    let max_tries = state.config.website.max_guild_tries;
    let poll = wait_for_guild(
        state.guilds.as_ref(),
        guild_id,
        max_tries,
        state.config.guild_poll_interval(),
    )
    .await;

    match poll {
        GuildPoll::Found { .. } => Ok(found(format!(
            "https://{host}/dashboard/configure/{guild_id}"
        ))),
        GuildPoll::Exhausted { .. } => {
            tracing::warn!(
                "Received guild {guild_id} via OAuth2 scope, we tried {max_tries} times, but I'm not in that guild yet! Telling the user about the issue..."
            );
            Ok(Html(pages::guild_not_found(&format!("https://{host}/dashboard"))).into_response())
        }
    }
}

/// Warns when accounts that claimed dailies from the same IP are banned. Never blocks the login.
async fn log_banned_accounts(
    state: &AppState,
    ip: Option<&str>,
    identification: &UserIdentification,
) {
    let Some(ip) = ip else {
        return;
    };
    match db::banned_profiles_for_ip(&state.db, ip).await {
        Ok(banned) if !banned.is_empty() => {
            let ids = banned
                .iter()
                .map(|profile| profile.id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                "User {} has banned accounts in {ip}! IDs: {ids}",
                identification.id
            );
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Failed to check banned accounts for {ip}: {e}"),
    }
}

/// Authorize URL with a `state` that brings the user back to `https://{host}{path}`.
pub fn authorization_redirect(authorization_url: &str, host: &str, path: &str) -> String {
    let state = serde_json::json!({ "redirectUrl": format!("https://{host}{path}") }).to_string();
    let encoded: String =
        url::form_urlencoded::byte_serialize(STANDARD.encode(state).as_bytes()).collect();
    format!("{authorization_url}&state={encoded}")
}

/// Decodes a base64 JSON state and returns its `redirectUrl`, if any.
pub fn decode_state_redirect(encoded: &str) -> Result<Option<String>, AppError> {
    // a `+` that lost its percent-encoding on the way back arrives as a space
    let decoded = STANDARD
        .decode(encoded.trim().replace(' ', "+"))
        .map_err(|e| AppError::MalformedState(e.to_string()))?;
    let json: serde_json::Value =
        serde_json::from_slice(&decoded).map_err(|e| AppError::MalformedState(e.to_string()))?;
    let object = json
        .as_object()
        .ok_or_else(|| AppError::MalformedState("state is not a JSON object".to_string()))?;
    Ok(object
        .get("redirectUrl")
        .and_then(|url| url.as_str())
        .map(str::to_string))
}

/// Only hosts of this deployment are valid redirect targets.
fn is_trusted_redirect(state: &AppState, host: &str, redirect_url: &str) -> bool {
    let Some(target) = url::Url::parse(redirect_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
    else {
        return false;
    };
    target == host
        || state.config.website_host().is_ok_and(|website| website == target)
        || state
            .config
            .clusters
            .iter()
            .any(|cluster| cluster.url == target)
}
