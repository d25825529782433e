use super::RecordStore;
use crate::config::SheetsConfig;
use crate::error::BankError;
use crate::google::{ServiceAccountKey, ServiceAccountTokenSource};
use crate::questions::{HEADERS, QuestionRow, StoredRow};
use async_trait::async_trait;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use url::Url;

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
pub const SHEETS_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct GoogleApiError {
    error: GoogleApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleApiErrorBody {
    message: String,
}

/// Google Sheets worksheet used as an append-only question table.
pub struct GoogleSheetsStore {
    http: reqwest::Client,
    tokens: ServiceAccountTokenSource,
    spreadsheet_id: String,
    worksheet: String,
}

impl GoogleSheetsStore {
    /// Load the key, open the worksheet by title and sanity-check its header row.
    /// A header mismatch is only a warning; a missing key, spreadsheet or worksheet is fatal.
    pub async fn connect(cfg: &SheetsConfig, http: reqwest::Client) -> Result<Self, BankError> {
        let key = ServiceAccountKey::load(&cfg.service_account_path)?;
        let tokens = ServiceAccountTokenSource::new(key, &SHEETS_SCOPES, http.clone())?;
        let store = Self {
            http,
            tokens,
            spreadsheet_id: cfg.sheet_id.clone(),
            worksheet: cfg.worksheet.clone(),
        };

        store.ensure_worksheet().await?;
        match store.header_row().await {
            Ok(headers) => {
                let missing = missing_headers(&headers);
                if !missing.is_empty() {
                    warn!(
                        worksheet = %store.worksheet,
                        ?missing,
                        found = ?headers,
                        "sheet headers do not fully match the expected columns"
                    );
                }
            }
            Err(e) => {
                warn!(
                    worksheet = %store.worksheet,
                    error = %e,
                    "could not read sheet headers; ensure the worksheet is accessible and not empty"
                );
            }
        }

        info!(
            spreadsheet_id = %store.spreadsheet_id,
            worksheet = %store.worksheet,
            "connected to Google Sheets"
        );
        Ok(store)
    }

    fn spreadsheet_url(&self) -> Result<Url, BankError> {
        let mut url = Url::parse(SHEETS_API_BASE)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(&self.spreadsheet_id);
        Ok(url)
    }

    fn values_url(&self, range: &str) -> Result<Url, BankError> {
        let mut url = self.spreadsheet_url()?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push("values")
            .push(range);
        Ok(url)
    }

    fn sheet_range(&self, cells: Option<&str>) -> String {
        let title = format!("'{}'", self.worksheet.replace('\'', "''"));
        match cells {
            Some(cells) => format!("{title}!{cells}"),
            None => title,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, BankError> {
        let token = self.tokens.access_token().await?;
        let resp = self.http.get(url).bearer_auth(token).send().await?;
        decode_response(resp).await
    }

    async fn ensure_worksheet(&self) -> Result<(), BankError> {
        let mut url = self.spreadsheet_url()?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");
        let meta: SpreadsheetMeta = self.get_json(url).await?;
        if meta
            .sheets
            .iter()
            .any(|s| s.properties.title == self.worksheet)
        {
            Ok(())
        } else {
            Err(BankError::WorksheetNotFound(self.worksheet.clone()))
        }
    }

    async fn header_row(&self) -> Result<Vec<String>, BankError> {
        let url = self.values_url(&self.sheet_range(Some("1:1")))?;
        let range: ValueRange = self.get_json(url).await?;
        Ok(range.values.into_iter().next().unwrap_or_default())
    }
}

#[async_trait]
impl RecordStore for GoogleSheetsStore {
    async fn read_all(&self) -> Result<Vec<StoredRow>, BankError> {
        let url = self.values_url(&self.sheet_range(None))?;
        let range: ValueRange = self.get_json(url).await?;
        Ok(rows_from_values(range.values))
    }

    async fn append(&self, row: QuestionRow) -> Result<(), BankError> {
        let mut url = self.values_url(&format!("{}:append", self.sheet_range(None)))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let token = self.tokens.access_token().await?;
        let resp = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        let _: serde_json::Value = decode_response(resp).await?;
        Ok(())
    }
}

async fn decode_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, BankError> {
    let status: StatusCode = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }
    let body = resp.bytes().await?;
    let message = serde_json::from_slice::<GoogleApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
    Err(BankError::Upstream { status, message })
}

/// Turn a raw value grid into header-keyed rows. The first row is the header;
/// short rows are padded with empty strings and blank header cells are skipped.
fn rows_from_values(values: Vec<Vec<String>>) -> Vec<StoredRow> {
    let mut iter = values.into_iter();
    let Some(headers) = iter.next() else {
        return Vec::new();
    };
    iter.map(|cells| {
        headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.trim().is_empty())
            .map(|(i, h)| (h.clone(), cells.get(i).cloned().unwrap_or_default()))
            .collect()
    })
    .collect()
}

fn missing_headers(found: &[String]) -> Vec<&'static str> {
    HEADERS
        .iter()
        .copied()
        .filter(|expected| !found.iter().any(|h| h == expected))
        .collect()
}
