use super::render;
use crate::connection::Connection;
use crate::questions::{Buckets, StoredRow, categorize};
use crate::router::BankState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

const HOME_PREVIEW_LEN: usize = 3;

#[derive(Debug, Serialize)]
struct HomeData {
    questions: Vec<StoredRow>,
}

#[derive(Debug, Serialize)]
struct BrowseData {
    #[serde(flatten)]
    buckets: Buckets,
    current_type_filter: String,
}

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub type_filter: Option<String>,
}

fn notice_row(question: &str, answer: &str) -> StoredRow {
    StoredRow::from([
        ("Question".to_string(), question.to_string()),
        ("Answer".to_string(), answer.to_string()),
    ])
}

/// GET / -> a short preview of stored questions.
pub async fn index(State(state): State<BankState>, jar: PrivateCookieJar) -> Response {
    let questions = match &state.store {
        Connection::Connected(store) => match store.read_all().await {
            Ok(mut rows) => {
                rows.truncate(HOME_PREVIEW_LEN);
                rows
            }
            Err(e) => {
                error!(error = %e, "error fetching questions for home page");
                vec![notice_row(
                    "Error loading questions. Check server logs.",
                    "Please check Google Sheets configuration and permissions.",
                )]
            }
        },
        Connection::Disconnected { .. } => vec![notice_row(
            "Google Sheets not connected.",
            "Please check server logs for connection errors and setup instructions.",
        )],
    };
    render(jar, StatusCode::OK, "index", HomeData { questions })
}

/// GET /interview-questions -> every stored question, bucketed by type.
///
/// Read failures are logged and produce empty buckets.
pub async fn interview_questions_page(
    State(state): State<BankState>,
    Query(query): Query<BrowseQuery>,
    jar: PrivateCookieJar,
) -> Response {
    let current_type_filter = query
        .type_filter
        .unwrap_or_else(|| "all".to_string())
        .to_lowercase();

    let buckets = match &state.store {
        Connection::Connected(store) => match store.read_all().await {
            Ok(rows) => categorize(rows),
            Err(e) => {
                error!(error = %e, "error fetching questions for categorization");
                Buckets::default()
            }
        },
        Connection::Disconnected { reason, .. } => {
            warn!(%reason, "record store not connected; cannot fetch questions");
            Buckets::default()
        }
    };

    render(
        jar,
        StatusCode::OK,
        "interview_questions",
        BrowseData {
            buckets,
            current_type_filter,
        },
    )
}

/// GET /jobs
pub async fn jobs_page(jar: PrivateCookieJar) -> Response {
    render(jar, StatusCode::OK, "jobs", json!({}))
}
