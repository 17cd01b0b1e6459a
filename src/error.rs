use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum OpsGateError {
    // Storage errors
    StorageError(String),

    // Password hashing errors
    HashingError(String),

    // Token issuance errors (validation failures carry their own kind)
    TokenIssue(String),

    // Navigation configuration errors
    NavConfigError(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for OpsGateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::HashingError(msg) => write!(f, "Password hashing error: {}", msg),
            Self::TokenIssue(msg) => write!(f, "Token issuance error: {}", msg),
            Self::NavConfigError(msg) => write!(f, "Navigation config error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for OpsGateError {}

// Generic result type for OpsGate
pub type Result<T> = std::result::Result<T, OpsGateError>;
