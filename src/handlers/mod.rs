//! Request handlers. Pages answer with JSON view models carrying exactly what a
//! template would render, including the caller's login state and drained notices.

pub mod auth;
pub mod pages;
pub mod questions;

use crate::error::BankError;
use crate::router::BankState;
use crate::session::{Flash, GuardOutcome, Session, flash, guard};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Serialize;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Serialize)]
pub struct PageView<T: Serialize> {
    pub page: &'static str,
    pub logged_in: bool,
    pub flashes: Vec<Flash>,
    #[serde(flatten)]
    pub data: T,
}

/// Render a page view, draining queued notices into it.
pub(crate) fn render<T: Serialize>(
    jar: PrivateCookieJar,
    status: StatusCode,
    page: &'static str,
    data: T,
) -> Response {
    let logged_in = Session::from_jar(&jar).logged_in;
    let (flashes, jar) = flash::take(jar);
    let view = PageView {
        page,
        logged_in,
        flashes,
        data,
    };
    (jar, (status, Json(view))).into_response()
}

pub(crate) fn redirect_with_flash(
    jar: PrivateCookieJar,
    to: &str,
    notice: Flash,
    secure: bool,
) -> Result<Response, BankError> {
    let jar = flash::push(jar, notice, secure)?;
    Ok((jar, Redirect::to(to)).into_response())
}

/// Run the session guard for a protected handler.
///
/// `Ok` carries the jar with the refreshed session already written; `Err` is the
/// redirect to the login page that the handler must return as-is.
pub(crate) async fn require_login(
    state: &BankState,
    jar: PrivateCookieJar,
) -> Result<(Session, PrivateCookieJar), Response> {
    let session = Session::from_jar(&jar);
    let secure = state.secure_cookie;
    let outcome = guard::check(session, &state.identity).await;
    match outcome {
        GuardOutcome::Proceed(session) => session
            .save(jar, secure)
            .map(|jar| (session, jar))
            .map_err(IntoResponse::into_response),
        GuardOutcome::Reject { session, notice } => {
            let rejected = session
                .save(jar, secure)
                .and_then(|jar| redirect_with_flash(jar, LOGIN_PATH, notice, secure));
            Err(rejected.unwrap_or_else(IntoResponse::into_response))
        }
    }
}
