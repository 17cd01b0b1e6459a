use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::user::AuthenticatedUser;
use crate::security::password::verify_password;
use crate::security::timing::AuthTimer;
use crate::storage::traits::UserStore;

/// Why a login attempt failed.
///
/// Callers present every credential failure as one generic message; the
/// precise kind exists for logs and telemetry. `StoreUnavailable` is
/// infrastructure, never a credential problem, and must not be collapsed
/// into `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Identifier or password missing from the request
    MissingInput,
    /// No record matches the identifier
    NotFound,
    /// Record exists but the password does not match
    InvalidPassword,
    /// Store lookup failed or timed out
    StoreUnavailable(String),
}

impl AuthError {
    /// Stable label for logs and telemetry counters.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingInput => "missing_input",
            AuthError::NotFound => "not_found",
            AuthError::InvalidPassword => "invalid_password",
            AuthError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingInput => write!(f, "identifier or password missing"),
            AuthError::NotFound => write!(f, "no user matches the identifier"),
            AuthError::InvalidPassword => write!(f, "password does not match"),
            AuthError::StoreUnavailable(msg) => write!(f, "user store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Minimum wall-clock duration of a verify call, success or failure.
const MIN_AUTH_DURATION: Duration = Duration::from_millis(100);

/// Checks identifier/password pairs against stored records.
pub struct CredentialVerifier {
    store: Arc<dyn UserStore>,
    store_timeout: Duration,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn UserStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    /// Verifies a credential pair.
    ///
    /// The identifier matches either the email or the username field of a
    /// record. Input-shape failures are rejected before any store access.
    /// Every path is padded to the same minimum duration.
    pub async fn verify(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let timer = AuthTimer::new(MIN_AUTH_DURATION);

        if identifier.trim().is_empty() || password.is_empty() {
            timer.wait().await;
            return Err(AuthError::MissingInput);
        }

        let lookup = tokio::time::timeout(
            self.store_timeout,
            self.store.find_by_identifier(identifier),
        )
        .await;

        let record = match lookup {
            Err(_) => {
                timer.wait().await;
                return Err(AuthError::StoreUnavailable(
                    "user store lookup timed out".to_string(),
                ));
            }
            Ok(Err(e)) => {
                timer.wait().await;
                return Err(AuthError::StoreUnavailable(e.to_string()));
            }
            Ok(Ok(None)) => {
                timer.wait().await;
                return Err(AuthError::NotFound);
            }
            Ok(Ok(Some(record))) => record,
        };

        if !verify_password(&record.password_hash, password) {
            timer.wait().await;
            return Err(AuthError::InvalidPassword);
        }

        timer.wait().await;
        Ok(record.to_authenticated())
    }
}
