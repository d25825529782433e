use super::{LOGIN_PATH, redirect_with_flash, render};
use crate::error::BankError;
use crate::router::BankState;
use crate::session::{Flash, Session, flash};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetIdTokenBody {
    #[serde(rename = "idToken")]
    pub id_token: Option<String>,
}

/// GET /login
pub async fn login_page(jar: PrivateCookieJar) -> Response {
    render(jar, StatusCode::OK, "login", json!({}))
}

/// POST /login -> registration, or acknowledgement that the client should sign in itself.
///
/// Password sign-in happens client-side against the identity provider; the resulting
/// ID token comes back through `/set-id-token`.
pub async fn login_submit(
    State(state): State<BankState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, BankError> {
    let secure = state.secure_cookie;
    let (Some(email), Some(password)) = (
        form.email.filter(|e| !e.is_empty()),
        form.password.filter(|p| !p.is_empty()),
    ) else {
        return redirect_with_flash(
            jar,
            LOGIN_PATH,
            Flash::error("Email and password are required."),
            secure,
        );
    };

    match form.action.as_deref() {
        Some("register") => {
            let created = match state.identity.get() {
                Ok(identity) => identity.create_account(&email, &password).await,
                Err(e) => Err(e.into()),
            };
            match created {
                Ok(account) => redirect_with_flash(
                    jar,
                    LOGIN_PATH,
                    Flash::success(format!(
                        "User {} created successfully! Please log in.",
                        account.email
                    )),
                    secure,
                ),
                Err(e) => {
                    error!(error = %e, "identity provider rejected registration");
                    let jar = flash::push(jar, Flash::error(e.user_message()), secure)?;
                    Ok(render(jar, StatusCode::OK, "login", json!({})))
                }
            }
        }
        Some("login") => {
            let jar = flash::push(
                jar,
                Flash::info("Login process initiated. Please wait for redirection..."),
                secure,
            )?;
            Ok((
                jar,
                Json(json!({
                    "status": "success",
                    "message": "Proceed to client-side login."
                })),
            )
                .into_response())
        }
        _ => redirect_with_flash(jar, LOGIN_PATH, Flash::error("Invalid action."), secure),
    }
}

/// POST /set-id-token -> verify a client-obtained ID token and start a session.
pub async fn set_id_token(
    State(state): State<BankState>,
    jar: PrivateCookieJar,
    body: Result<Json<SetIdTokenBody>, JsonRejection>,
) -> Result<Response, BankError> {
    let secure = state.secure_cookie;
    let id_token = body
        .ok()
        .and_then(|Json(b)| b.id_token)
        .filter(|t| !t.is_empty());
    let Some(id_token) = id_token else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({"status": "error", "message": "ID token missing"})),
        )
            .into_response());
    };

    let verified = match state.identity.get() {
        Ok(identity) => identity.verify(&id_token).await,
        Err(e) => Err(e),
    };

    match verified {
        Ok(identity) => {
            let session = Session::start(id_token, &identity);
            let email = session.email.clone().unwrap_or_default();
            info!(email = %email, uid = %identity.uid, "user logged in");
            let jar = session.save(jar, secure)?;
            let jar = flash::push(
                jar,
                Flash::success(format!("Successfully logged in as {email}!")),
                secure,
            )?;
            Ok((jar, Json(json!({"status": "success", "redirect": "/"}))).into_response())
        }
        Err(e) => {
            warn!(error = %e, "error verifying ID token");
            let mut session = Session::from_jar(&jar);
            session.clear();
            let jar = session.save(jar, secure)?;
            Ok((
                jar,
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"status": "error", "message": "Invalid or expired token"})),
                ),
            )
                .into_response())
        }
    }
}

/// GET /logout
pub async fn logout(State(state): State<BankState>, jar: PrivateCookieJar) -> Result<Response, BankError> {
    let mut session = Session::from_jar(&jar);
    if let Some(email) = session.email.as_deref() {
        info!(email, "user logged out");
    }
    session.clear();
    let jar = session.save(jar, state.secure_cookie)?;
    redirect_with_flash(jar, "/", Flash::info("You have been logged out."), state.secure_cookie)
}
