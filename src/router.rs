use crate::config::BasicConfig;
use crate::connection::Connection;
use crate::error::BankError;
use crate::handlers::{auth, pages, questions};
use crate::identity::IdentityVerifier;
use crate::store::RecordStore;
use axum::extract::{DefaultBodyLimit, FromRef};
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::Key;
use base64::Engine;
use tracing::warn;

/// Form submissions are small; anything beyond this is rejected with 413.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct BankState {
    pub store: Connection<dyn RecordStore>,
    pub identity: Connection<dyn IdentityVerifier>,
    pub secure_cookie: bool,
    cookie_key: Key,
}

impl BankState {
    pub fn new(
        store: Connection<dyn RecordStore>,
        identity: Connection<dyn IdentityVerifier>,
        cookie_key: Key,
        secure_cookie: bool,
    ) -> Self {
        Self {
            store,
            identity,
            secure_cookie,
            cookie_key,
        }
    }
}

impl FromRef<BankState> for Key {
    fn from_ref(state: &BankState) -> Self {
        state.cookie_key.clone()
    }
}

/// Decode the configured cookie key, or generate a throwaway one.
pub fn cookie_key(cfg: &BasicConfig) -> Result<Key, BankError> {
    match cfg.cookie_key.as_deref() {
        Some(encoded) => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded.trim())
                .map_err(|e| BankError::CookieKey(e.to_string()))?;
            Key::try_from(bytes.as_slice()).map_err(|e| BankError::CookieKey(e.to_string()))
        }
        None => {
            warn!("no cookie_key configured; generated a random key, sessions will not survive restarts");
            Ok(Key::generate())
        }
    }
}

pub fn bank_router(state: BankState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/interview-questions", get(pages::interview_questions_page))
        .route("/jobs", get(pages::jobs_page))
        .route(
            questions::ADD_QUESTION_PATH,
            get(questions::add_question_page).post(questions::submit_question),
        )
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/set-id-token", post(auth::set_id_token))
        .route("/logout", get(auth::logout))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_cookie_keys() {
        let cfg = BasicConfig {
            cookie_key: Some(base64::engine::general_purpose::STANDARD.encode([7u8; 16])),
            ..BasicConfig::default()
        };
        assert!(matches!(cookie_key(&cfg), Err(BankError::CookieKey(_))));
    }

    #[test]
    fn accepts_64_byte_cookie_keys() {
        let cfg = BasicConfig {
            cookie_key: Some(base64::engine::general_purpose::STANDARD.encode([7u8; 64])),
            ..BasicConfig::default()
        };
        assert!(cookie_key(&cfg).is_ok());
    }
}
