use crate::error::BankError;
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::info;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The subset of a Google service-account JSON key this service needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    pub project_id: Option<String>,
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Load a key file. A missing file is an error rather than an empty result.
    pub fn load(path: &Path) -> Result<Self, BankError> {
        if !path.exists() {
            return Err(BankError::ServiceAccount(format!(
                "service account file '{}' not found",
                path.display()
            )));
        }
        let contents = fs::read_to_string(path)?;
        let key = Self::from_json(&contents)?;
        info!(
            path = %path.display(),
            client_email = %key.client_email,
            "loaded service account key"
        );
        Ok(key)
    }

    pub fn from_json(contents: &str) -> Result<Self, BankError> {
        let key: ServiceAccountKey = serde_json::from_str(contents)?;
        if let Some(kind) = key.key_type.as_deref()
            && kind != "service_account"
        {
            return Err(BankError::ServiceAccount(format!(
                "expected key type 'service_account', found '{kind}'"
            )));
        }
        Ok(key)
    }
}
