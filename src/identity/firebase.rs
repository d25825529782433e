use super::jwks::JwksCache;
use super::{AccountIdentity, IdentityVerifier, VerifiedIdentity};
use crate::config::FirebaseConfig;
use crate::error::{AccountError, BankError};
use crate::google::{ServiceAccountKey, ServiceAccountTokenSource};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const SECURETOKEN_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
pub const IDENTITY_TOOLKIT_BASE: &str = "https://identitytoolkit.googleapis.com/v1";
pub const FIREBASE_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/identitytoolkit",
];

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateAccountRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ToolkitError {
    error: ToolkitErrorBody,
}

#[derive(Debug, Deserialize)]
struct ToolkitErrorBody {
    message: String,
}

/// Firebase Authentication backed verifier.
pub struct FirebaseVerifier {
    project_id: String,
    http: reqwest::Client,
    tokens: ServiceAccountTokenSource,
    keys: JwksCache,
}

impl FirebaseVerifier {
    pub fn connect(cfg: &FirebaseConfig, http: reqwest::Client) -> Result<Self, BankError> {
        let key = ServiceAccountKey::load(&cfg.service_account_path)?;
        let project_id = cfg
            .project_id
            .clone()
            .or_else(|| key.project_id.clone())
            .ok_or_else(|| {
                BankError::ServiceAccount(
                    "no Firebase project id in config or service account key".to_string(),
                )
            })?;
        let tokens = ServiceAccountTokenSource::new(key, &FIREBASE_SCOPES, http.clone())?;
        info!(project_id = %project_id, "initialized Firebase verifier");
        Ok(Self {
            keys: JwksCache::new(SECURETOKEN_JWKS_URL, http.clone()),
            project_id,
            http,
            tokens,
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.project_id.as_str()]);
        validation.set_issuer(&[format!("https://securetoken.google.com/{}", self.project_id)]);
        validation.set_required_spec_claims(&["exp", "iat", "aud", "iss", "sub"]);
        validation
    }

    async fn signup(&self, email: &str, password: &str) -> Result<AccountIdentity, AccountError> {
        let token = self.tokens.access_token().await?;
        let url = format!("{IDENTITY_TOOLKIT_BASE}/projects/{}/accounts", self.project_id);
        let resp = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&CreateAccountRequest { email, password })
            .send()
            .await
            .map_err(BankError::from)?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(BankError::from)?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ToolkitError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("identity provider returned {status}"));
            return Err(AccountError::from_provider_message(&message));
        }

        let created: CreateAccountResponse =
            serde_json::from_slice(&body).map_err(BankError::from)?;
        Ok(AccountIdentity {
            uid: created.local_id,
            email: created.email.unwrap_or_else(|| email.to_string()),
        })
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, BankError> {
        let header = jsonwebtoken::decode_header(id_token)?;
        if header.alg != Algorithm::RS256 {
            return Err(BankError::InvalidIdToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| BankError::InvalidIdToken("missing key id".to_string()))?;
        let key = self.keys.decoding_key(&kid).await?;
        let data = jsonwebtoken::decode::<IdTokenClaims>(id_token, &key, &self.validation())?;
        if data.claims.sub.is_empty() {
            return Err(BankError::InvalidIdToken("empty subject".to_string()));
        }
        debug!(uid = %data.claims.sub, "ID token verified");
        Ok(VerifiedIdentity {
            uid: data.claims.sub,
            email: data.claims.email,
        })
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountIdentity, AccountError> {
        self.signup(email, password)
            .await
            .inspect(|account| info!(uid = %account.uid, email = %account.email, "account created"))
            .inspect_err(|e| warn!(email, error = %e, "account creation failed"))
    }
}
