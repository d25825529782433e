use super::{build_cookie, clear_cookie};
use crate::error::BankError;
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use time::Duration;

pub const FLASH_COOKIE: &str = "qb_flash";
const FLASH_TTL: Duration = Duration::minutes(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

/// A one-shot, user-visible notice shown on the next rendered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }
}

fn queued(jar: &PrivateCookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok())
        .unwrap_or_default()
}

/// Queue a notice behind any already waiting.
pub fn push(
    jar: PrivateCookieJar,
    flash: Flash,
    secure: bool,
) -> Result<PrivateCookieJar, BankError> {
    let mut pending = queued(&jar);
    pending.push(flash);
    let value = serde_json::to_string(&pending)?;
    Ok(jar.add(build_cookie(FLASH_COOKIE, value, secure, Some(FLASH_TTL))))
}

/// Drain every queued notice.
pub fn take(jar: PrivateCookieJar) -> (Vec<Flash>, PrivateCookieJar) {
    let pending = queued(&jar);
    if pending.is_empty() {
        return (pending, jar);
    }
    (pending, jar.remove(clear_cookie(FLASH_COOKIE)))
}
