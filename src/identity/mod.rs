//! Identity verifier: validates bearer ID tokens and creates accounts.

pub mod firebase;
pub mod jwks;

pub use firebase::FirebaseVerifier;

use crate::error::{AccountError, BankError};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    pub uid: String,
    pub email: String,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Check an ID token and return who it belongs to. Expired, malformed or
    /// unverifiable tokens are all errors.
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, BankError>;

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountIdentity, AccountError>;
}
