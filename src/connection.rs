use crate::error::BankError;
use std::sync::Arc;
use tracing::{error, info};

/// Startup outcome for an external collaborator: either a ready handle, or the reason
/// it could not be brought up. Handlers degrade on `Disconnected` instead of failing hard.
pub enum Connection<T: ?Sized> {
    Connected(Arc<T>),
    Disconnected { service: &'static str, reason: String },
}

impl<T: ?Sized> Clone for Connection<T> {
    fn clone(&self) -> Self {
        match self {
            Connection::Connected(handle) => Connection::Connected(handle.clone()),
            Connection::Disconnected { service, reason } => Connection::Disconnected {
                service: *service,
                reason: reason.clone(),
            },
        }
    }
}

impl<T: ?Sized> Connection<T> {
    /// Log and record the outcome of a connect attempt.
    pub fn establish(service: &'static str, result: Result<Arc<T>, BankError>) -> Self {
        match result {
            Ok(handle) => {
                info!(service, "successfully connected");
                Connection::Connected(handle)
            }
            Err(e) => {
                error!(service, error = %e, "failed to connect; continuing without it");
                Connection::Disconnected {
                    service,
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn get(&self) -> Result<&Arc<T>, BankError> {
        match self {
            Connection::Connected(handle) => Ok(handle),
            Connection::Disconnected { service, .. } => Err(BankError::NotConnected(*service)),
        }
    }
}

impl<T: ?Sized> From<Arc<T>> for Connection<T> {
    fn from(handle: Arc<T>) -> Self {
        Connection::Connected(handle)
    }
}
