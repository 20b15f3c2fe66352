//! In-memory session state for the staff/faculty dashboards.
//!
//! A successful login mints a uuid token mapped to the resolved `Actor`;
//! gated handlers look the token up from the `X-Session-Token` header. The
//! map is shared across workers through the Actix application state, with
//! concurrent reads and exclusive writes behind an `RwLock`.

use std::{collections::HashMap, sync::Arc};

use actix_web::HttpRequest;
use tokio::sync::RwLock;

use crate::error::PortalError;

pub const SESSION_HEADER: &str = "X-Session-Token";

/// The authenticated identity behind a request, threaded explicitly into
/// every core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub identity_id: i64,
    pub is_admin: bool,
}

/// A thread-safe, shareable container for all live sessions.
#[derive(Clone, Default)]
pub struct SessionsState {
    pub sessions: Arc<RwLock<HashMap<String, Actor>>>,
}

impl SessionsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, token: String, actor: Actor) {
        self.sessions.write().await.insert(token, actor);
    }

    pub async fn remove(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    pub async fn lookup(&self, token: &str) -> Option<Actor> {
        self.sessions.read().await.get(token).copied()
    }
}

/// Resolves the actor for a gated route, or `Forbidden` when the token is
/// missing or unknown.
pub async fn require_actor(
    req: &HttpRequest,
    state: &SessionsState,
) -> Result<Actor, PortalError> {
    let token = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(PortalError::Forbidden)?;
    state.lookup(token).await.ok_or(PortalError::Forbidden)
}

/// Like `require_actor`, additionally requiring the administrator flag.
pub async fn require_admin(
    req: &HttpRequest,
    state: &SessionsState,
) -> Result<Actor, PortalError> {
    let actor = require_actor(req, state).await?;
    if actor.is_admin {
        Ok(actor)
    } else {
        Err(PortalError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tokens_round_trip_and_expire_on_logout() {
        let state = SessionsState::new();
        let actor = Actor { identity_id: 7, is_admin: false };
        state.insert("tok".into(), actor).await;
        assert_eq!(state.lookup("tok").await, Some(actor));
        state.remove("tok").await;
        assert_eq!(state.lookup("tok").await, None);
    }
}
