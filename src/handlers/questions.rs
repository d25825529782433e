use super::{render, require_login};
use crate::error::BankError;
use crate::questions::{parse_form, shape};
use crate::router::BankState;
use crate::session::{Flash, flash};
use axum::extract::rejection::{QueryRejection, RawFormRejection};
use axum::extract::{Query, RawForm, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub const ADD_QUESTION_PATH: &str = "/add-question";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AddQuestionQuery {
    pub success: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Serialize)]
struct AddQuestionData {
    #[serde(flatten)]
    outcome: AddQuestionQuery,
    error_message: Option<&'static str>,
}

/// GET /add-question -> the submission form; echoes the outcome of the last submit.
///
/// The query is only inspected once the session guard has passed.
pub async fn add_question_page(
    State(state): State<BankState>,
    jar: PrivateCookieJar,
    query: Result<Query<AddQuestionQuery>, QueryRejection>,
) -> Response {
    let jar = match require_login(&state, jar).await {
        Ok((_, jar)) => jar,
        Err(redirect) => return redirect,
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return (jar, rejection).into_response(),
    };
    let data = AddQuestionData {
        outcome: query,
        error_message: None,
    };
    render(jar, StatusCode::OK, "add_question", data)
}

/// POST /add-question -> shape the form into a row and append it.
///
/// The body is only decoded once the session guard has passed.
pub async fn submit_question(
    State(state): State<BankState>,
    jar: PrivateCookieJar,
    body: Result<RawForm, RawFormRejection>,
) -> Result<Response, BankError> {
    let (session, jar) = match require_login(&state, jar).await {
        Ok(ok) => ok,
        Err(redirect) => return Ok(redirect),
    };
    let form = match body {
        Ok(RawForm(bytes)) => parse_form(&bytes),
        Err(rejection) => return Ok((jar, rejection).into_response()),
    };

    let kind = form.get("question_type").cloned().unwrap_or_default();
    let record = shape(&kind, &form);
    let question = record.question.clone();

    let appended = match state.store.get() {
        Ok(store) => store.append(record.into_row()).await,
        Err(e) => Err(e),
    };

    match appended {
        Ok(()) => {
            info!(
                kind = %kind,
                question = %question,
                author_uid = session.uid.as_deref().unwrap_or_default(),
                "added new question"
            );
            let target = format!(
                "{ADD_QUESTION_PATH}?{}",
                url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("success", "true")
                    .append_pair("type", &kind)
                    .finish()
            );
            Ok((jar, Redirect::to(&target)).into_response())
        }
        Err(e) => {
            let (notice, error_message) = if matches!(e, BankError::NotConnected(_)) {
                error!("attempted to add question, but the record store is not connected");
                (
                    "Google Sheets not connected. Cannot add question. Check server logs for details.",
                    "Google Sheets not connected.",
                )
            } else {
                error!(error = %e, "failed to add question to the record store");
                (
                    "Error adding question. Please check server logs and Google Sheet column setup.",
                    "Error adding question.",
                )
            };
            let jar = flash::push(jar, Flash::error(notice), state.secure_cookie)?;
            let data = AddQuestionData {
                outcome: AddQuestionQuery::default(),
                error_message: Some(error_message),
            };
            Ok(render(jar, StatusCode::SERVICE_UNAVAILABLE, "add_question", data))
        }
    }
}

