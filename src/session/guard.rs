use super::flash::Flash;
use super::state::Session;
use crate::connection::Connection;
use crate::identity::IdentityVerifier;
use tracing::{debug, warn};

pub const LOGIN_REQUIRED: &str = "You need to be logged in to access this page.";
pub const SESSION_EXPIRED: &str = "Your session has expired or is invalid. Please log in again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The caller is authenticated; carries the refreshed session.
    Proceed(Session),
    /// Send the caller to the login page with `notice`; `session` is what to persist.
    Reject { session: Session, notice: Flash },
}

/// Authenticate the caller of a protected operation.
///
/// Verifies the stored ID token on every call. Any verification failure, including an
/// unreachable or unconfigured verifier, clears the session's identity.
pub async fn check(
    mut session: Session,
    verifier: &Connection<dyn IdentityVerifier>,
) -> GuardOutcome {
    let Some(id_token) = session.id_token.clone() else {
        return GuardOutcome::Reject {
            session,
            notice: Flash::error(LOGIN_REQUIRED),
        };
    };

    let verified = match verifier.get() {
        Ok(verifier) => verifier.verify(&id_token).await,
        Err(e) => Err(e),
    };

    match verified {
        Ok(identity) => {
            debug!(uid = %identity.uid, "session verified");
            session.refresh(&identity);
            GuardOutcome::Proceed(session)
        }
        Err(e) => {
            warn!(error = %e, "error verifying ID token; clearing session");
            session.clear();
            GuardOutcome::Reject {
                session,
                notice: Flash::error(SESSION_EXPIRED),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AccountError, BankError};
    use crate::identity::{AccountIdentity, VerifiedIdentity};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct OneTokenVerifier;

    #[async_trait]
    impl IdentityVerifier for OneTokenVerifier {
        async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, BankError> {
            if id_token == "good" {
                Ok(VerifiedIdentity {
                    uid: "fresh-uid".into(),
                    email: Some("fresh@example.com".into()),
                })
            } else {
                Err(BankError::InvalidIdToken("expired".into()))
            }
        }

        async fn create_account(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<AccountIdentity, AccountError> {
            Err(AccountError::Other("unsupported".into()))
        }
    }

    fn verifier() -> Connection<dyn IdentityVerifier> {
        Connection::from(Arc::new(OneTokenVerifier) as Arc<dyn IdentityVerifier>)
    }

    fn stale_session(token: &str) -> Session {
        Session {
            id_token: Some(token.into()),
            uid: Some("old-uid".into()),
            email: Some("old@example.com".into()),
            logged_in: true,
        }
    }

    #[tokio::test]
    async fn missing_token_rejects_without_touching_session() {
        let outcome = check(Session::default(), &verifier()).await;
        assert_eq!(
            outcome,
            GuardOutcome::Reject {
                session: Session::default(),
                notice: Flash::error(LOGIN_REQUIRED),
            }
        );
    }

    #[tokio::test]
    async fn valid_token_refreshes_identity() {
        let GuardOutcome::Proceed(session) = check(stale_session("good"), &verifier()).await
        else {
            panic!("expected to proceed");
        };
        assert_eq!(session.uid.as_deref(), Some("fresh-uid"));
        assert_eq!(session.email.as_deref(), Some("fresh@example.com"));
        assert_eq!(session.id_token.as_deref(), Some("good"));
        assert!(session.logged_in);
    }

    #[tokio::test]
    async fn invalid_token_clears_identity() {
        let GuardOutcome::Reject { session, notice } =
            check(stale_session("revoked"), &verifier()).await
        else {
            panic!("expected rejection");
        };
        assert_eq!(session, Session::default());
        assert!(!session.logged_in);
        assert_eq!(notice.message, SESSION_EXPIRED);
    }

    #[tokio::test]
    async fn disconnected_verifier_counts_as_failure() {
        let disconnected: Connection<dyn IdentityVerifier> = Connection::Disconnected {
            service: "firebase",
            reason: "key file missing".into(),
        };
        let outcome = check(stale_session("good"), &disconnected).await;
        assert!(matches!(
            outcome,
            GuardOutcome::Reject { ref session, .. } if !session.logged_in && session.uid.is_none()
        ));
    }
}
