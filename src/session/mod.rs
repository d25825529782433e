//! Per-caller state carried in encrypted cookies: the login session and queued flash notices.

pub mod flash;
pub mod guard;
pub mod state;

pub use flash::{Flash, FlashLevel};
pub use guard::{GuardOutcome, check};
pub use state::Session;

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Without `max_age` the cookie lives for the browser session.
pub(crate) fn build_cookie(
    name: &str,
    value: String,
    secure: bool,
    max_age: Option<Duration>,
) -> Cookie<'static> {
    let mut builder = Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax);
    if let Some(max_age) = max_age {
        builder = builder.max_age(max_age);
    }
    builder.build()
}

pub(crate) fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
