use super::service_account::ServiceAccountKey;
use crate::error::BankError;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use oauth2::TokenResponse;
use oauth2::basic::{BasicErrorResponse, BasicTokenResponse};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens this close to expiry are treated as already expired.
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    secret: String,
    expiry: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expiry - ChronoDuration::seconds(EXPIRY_SKEW_SECS) > now
    }
}

/// Mints OAuth2 access tokens for a service account via the JWT-bearer grant
/// and keeps the latest one until shortly before it expires.
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    scope: String,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(
        key: ServiceAccountKey,
        scopes: &[&str],
        http: reqwest::Client,
    ) -> Result<Self, BankError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
        Ok(Self {
            key,
            signing_key,
            scope: scopes.join(" "),
            http,
            cached: Mutex::new(None),
        })
    }

    /// Return a bearer token, exchanging a fresh assertion when the cached one is stale.
    pub async fn access_token(&self) -> Result<String, BankError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref()
            && token.is_fresh(now)
        {
            return Ok(token.secret.clone());
        }

        let token = self.exchange(now).await?;
        let secret = token.secret.clone();
        *cached = Some(token);
        Ok(secret)
    }

    fn signed_assertion(&self, now: DateTime<Utc>) -> Result<String, BankError> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        Ok(jsonwebtoken::encode(&header, &claims, &self.signing_key)?)
    }

    async fn exchange(&self, now: DateTime<Utc>) -> Result<CachedToken, BankError> {
        let assertion = self.signed_assertion(now)?;
        let resp = self
            .http
            .post(self.key.token_uri.as_str())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            let message = match serde_json::from_slice::<BasicErrorResponse>(&body) {
                Ok(err) => match err.error_description() {
                    Some(desc) => format!("{}: {}", err.error(), desc),
                    None => err.error().to_string(),
                },
                Err(_) => format!("token endpoint returned {status}"),
            };
            return Err(BankError::TokenExchange(message));
        }

        let token: BasicTokenResponse = serde_json::from_slice(&body)?;
        let lifetime = token
            .expires_in()
            .and_then(|d| ChronoDuration::from_std(d).ok())
            .unwrap_or_else(|| ChronoDuration::seconds(ASSERTION_LIFETIME_SECS));
        info!(
            client_email = %self.key.client_email,
            expires_in_secs = lifetime.num_seconds(),
            "access token refreshed"
        );
        Ok(CachedToken {
            secret: token.access_token().secret().to_string(),
            expiry: now + lifetime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_token_goes_stale_before_expiry() {
        let now = Utc::now();
        let token = CachedToken {
            secret: "t".into(),
            expiry: now + ChronoDuration::seconds(30),
        };
        assert!(!token.is_fresh(now));

        let token = CachedToken {
            secret: "t".into(),
            expiry: now + ChronoDuration::seconds(600),
        };
        assert!(token.is_fresh(now));
    }
}
