//! In-memory dashboard sessions keyed by the `SESSION_ID` cookie.

use std::{collections::HashMap, sync::Arc, time::Duration};

use http::{HeaderMap, HeaderValue, header::COOKIE};
use serde::{Deserialize, Serialize};
use tokio::{sync::RwLock, time::Instant};
use uuid::Uuid;

use crate::internal::discord::oauth::{AuthTokens, UserIdentification};

pub const SESSION_COOKIE: &str = "SESSION_ID";
/// Matches the lifetime of a Discord access token.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSession {
    /// Tokens from the last successful code exchange.
    pub discord_auth: Option<AuthTokens>,
    /// Cached `/users/@me`, reused when another cluster forwards the user back here.
    pub identification: Option<UserIdentification>,
}

struct StoredSession {
    session: DashboardSession,
    created_at: Instant,
}

/// Sessions expire `ttl` after their last insert. At most `capacity` are kept; the oldest one is
/// evicted to make room.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_SESSION_TTL, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub async fn get(&self, id: &Uuid) -> Option<DashboardSession> {
        self.sessions
            .read()
            .await
            .get(id)
            .filter(|stored| stored.created_at.elapsed() < self.ttl)
            .map(|stored| stored.session.clone())
    }

    /// Stores `session`, dropping expired entries first.
    pub async fn insert(&self, id: Uuid, session: DashboardSession) {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, stored| now.duration_since(stored.created_at) < self.ttl);

        if !sessions.contains_key(&id) && sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, stored)| stored.created_at)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                tracing::debug!("Session store full, evicting session {oldest}");
                sessions.remove(&oldest);
            }
        }
        sessions.insert(
            id,
            StoredSession {
                session,
                created_at: now,
            },
        );
    }

    /// Number of stored sessions, including expired ones not swept yet.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Looks up the session named by the request cookies, if any.
    pub async fn from_headers(&self, headers: &HeaderMap) -> Option<(Uuid, DashboardSession)> {
        let id = session_id_from_headers(headers)?;
        self.get(&id).await.map(|session| (id, session))
    }
}

/// Extracts the session id from every `Cookie` header of the request.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
}

pub fn session_cookie(id: &Uuid) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .ok()
}
