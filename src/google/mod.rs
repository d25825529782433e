//! Google service-account plumbing shared by the Sheets store and the Firebase verifier.

pub mod http;
pub mod service_account;
pub mod token;

pub use service_account::ServiceAccountKey;
pub use token::ServiceAccountTokenSource;
