pub mod config;
pub mod connection;
pub mod error;
pub mod google;
pub mod handlers;
pub mod identity;
pub mod questions;
pub mod router;
pub mod session;
pub mod store;

pub use connection::Connection;
pub use error::{AccountError, BankError};
pub use identity::{FirebaseVerifier, IdentityVerifier};
pub use store::{GoogleSheetsStore, MemoryStore, RecordStore};
