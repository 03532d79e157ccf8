use serde::{Deserialize, Serialize};

use crate::models::User;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, Storage};

const SESSION_KEY: &str = "guestdesk.session";

/// Token plus profile, held in memory by the app state and mirrored to
/// durable storage. Written only by login/logout (and the 401 handler).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.token.trim())
    }
}

#[cfg(target_arch = "wasm32")]
pub fn load() -> Option<Session> {
    LocalStorage::get::<Session>(SESSION_KEY).ok()
}

#[cfg(target_arch = "wasm32")]
pub fn store(session: &Session) {
    if let Err(err) = LocalStorage::set(SESSION_KEY, session) {
        tracing::warn!("failed to persist session: {err}");
    }
}

#[cfg(target_arch = "wasm32")]
pub fn clear() {
    LocalStorage::delete(SESSION_KEY);
}

// Native builds (tests, tooling) have no browser storage.
#[cfg(not(target_arch = "wasm32"))]
pub fn load() -> Option<Session> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn store(_session: &Session) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn clear() {}

/// Read before every authenticated request, per the session model: the
/// durable copy is the source of truth for the bearer token.
pub fn stored_bearer() -> Option<String> {
    load().map(|session| session.bearer_header())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_trims_token() {
        let session = Session {
            token: "  abc123  ".into(),
            user: User {
                id: 1,
                name: "Front Desk".into(),
                is_admin: false,
            },
        };
        assert_eq!(session.bearer_header(), "Bearer abc123");
    }

    #[test]
    fn session_round_trips_as_json() {
        let session = Session {
            token: "tok".into(),
            user: User {
                id: 9,
                name: "Admin".into(),
                is_admin: true,
            },
        };
        let raw = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, session);
    }
}
