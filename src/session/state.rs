use super::{build_cookie, clear_cookie};
use crate::error::BankError;
use crate::identity::VerifiedIdentity;
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const SESSION_COOKIE: &str = "qb_session";
/// Stored when the identity provider returns no email for the subject.
pub const UNKNOWN_EMAIL: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id_token: Option<String>,
    pub uid: Option<String>,
    pub email: Option<String>,
    pub logged_in: bool,
}

impl Session {
    /// Read the session cookie; a missing or undecodable cookie is an anonymous session.
    pub fn from_jar(jar: &PrivateCookieJar) -> Self {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Self::default();
        };
        serde_json::from_str(cookie.value())
            .inspect_err(|e| warn!(error = %e, "discarding unreadable session cookie"))
            .unwrap_or_default()
    }

    pub fn start(id_token: String, identity: &VerifiedIdentity) -> Self {
        let mut session = Self {
            id_token: Some(id_token),
            ..Self::default()
        };
        session.refresh(identity);
        session
    }

    pub fn refresh(&mut self, identity: &VerifiedIdentity) {
        self.uid = Some(identity.uid.clone());
        self.email = Some(
            identity
                .email
                .clone()
                .unwrap_or_else(|| UNKNOWN_EMAIL.to_string()),
        );
        self.logged_in = true;
    }

    pub fn clear(&mut self) {
        self.id_token = None;
        self.uid = None;
        self.email = None;
        self.logged_in = false;
    }

    pub fn save(&self, jar: PrivateCookieJar, secure: bool) -> Result<PrivateCookieJar, BankError> {
        if *self == Self::default() {
            return Ok(jar.remove(clear_cookie(SESSION_COOKIE)));
        }
        let value = serde_json::to_string(self)?;
        Ok(jar.add(build_cookie(SESSION_COOKIE, value, secure, None)))
    }
}
