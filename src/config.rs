//! Server configuration module
//! Handles runtime configuration for the dashboard gate service

use crate::constants::{
    DEFAULT_BYPASS_PREFIXES, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SESSION_TTL_SECS,
    DEFAULT_STORE_TIMEOUT_SECS,
};
use crate::error::{OpsGateError, Result};
use std::env;
use std::time::Duration;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Secret used to sign and verify session tokens
    pub session_secret: String,
    /// Lifetime of issued session tokens
    pub session_ttl: Duration,
    /// Path prefixes exempt from token inspection
    pub bypass_prefixes: Vec<String>,
    /// Upper bound on a single user store lookup
    pub store_timeout: Duration,
    /// Optional path to a navigation tree JSON file
    pub nav_config_path: Option<String>,
    /// Development mode (seeds demo accounts)
    pub development_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        panic!("ServerConfig::default() is not allowed for security reasons. Use ServerConfig::from_env() instead.");
    }
}

impl ServerConfig {
    /// Create a test configuration - DANGEROUS: Only for testing!
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            session_secret: "unit-testing-session-signing-key-a7b3c9d1e5".to_string(),
            session_ttl: Duration::from_secs(3600),
            bypass_prefixes: DEFAULT_BYPASS_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            store_timeout: Duration::from_secs(1),
            nav_config_path: None,
            development_mode: true,
        }
    }

    /// Validate that the session secret meets security requirements
    fn validate_session_secret(secret: &str) -> Result<()> {
        if secret.len() < 32 {
            return Err(OpsGateError::ConfigError(
                "Session secret must be at least 32 characters long".to_string(),
            ));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "INSECURE-DEFAULT-FOR-TESTING-ONLY",
            "test-secret",
            "default",
            "secret",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.contains(pattern) {
                return Err(OpsGateError::ConfigError(format!(
                    "Session secret contains insecure pattern '{}'. Please use a secure random secret generated with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        // Ensure some complexity
        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(OpsGateError::ConfigError(
                "Session secret should contain mixed characters (letters, numbers, symbols) for security".to_string(),
            ));
        }

        Ok(())
    }

    fn parse_bypass_prefixes(raw: &str) -> Result<Vec<String>> {
        let prefixes: Vec<String> = raw
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        for prefix in &prefixes {
            if !prefix.starts_with('/') {
                return Err(OpsGateError::ConfigError(format!(
                    "Bypass prefix must start with '/': {}",
                    prefix
                )));
            }
        }

        Ok(prefixes)
    }

    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        let host = env::var("OPSGATE_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("OPSGATE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let session_secret = env::var("OPSGATE_SESSION_SECRET")
            .or_else(|_| env::var("SESSION_SECRET"))
            .map_err(|_| {
                OpsGateError::ConfigError(
                    "SESSION_SECRET environment variable is required for security. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;

        let ttl_secs = env::var("OPSGATE_SESSION_TTL_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_SECS);

        let bypass_prefixes = match env::var("OPSGATE_BYPASS_PREFIXES") {
            Ok(raw) => Self::parse_bypass_prefixes(&raw)?,
            Err(_) => DEFAULT_BYPASS_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        };

        let store_timeout_secs = env::var("OPSGATE_STORE_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_STORE_TIMEOUT_SECS);

        let nav_config_path = env::var("OPSGATE_NAV_CONFIG").ok();

        let development_mode = env::var("OPSGATE_DEVELOPMENT_MODE")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false); // SECURITY: Default to false (production mode)

        Self::validate_session_secret(&session_secret)?;

        Ok(Self {
            host,
            port,
            session_secret,
            session_ttl: Duration::from_secs(ttl_secs),
            bypass_prefixes,
            store_timeout: Duration::from_secs(store_timeout_secs),
            nav_config_path,
            development_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "ServerConfig::default() is not allowed for security reasons")]
    fn test_default_panics() {
        let _ = ServerConfig::default();
    }

    #[test]
    fn test_for_testing_works_in_tests() {
        let config = ServerConfig::for_testing();
        assert!(config.development_mode);
        assert!(config.bypass_prefixes.contains(&"/auth".to_string()));
    }

    #[test]
    fn test_secret_validation() {
        assert!(ServerConfig::validate_session_secret("short").is_err());
        assert!(ServerConfig::validate_session_secret(
            "contains-the-word-secret-which-is-not-allowed-1"
        )
        .is_err());
        assert!(ServerConfig::validate_session_secret(
            "onlyalphabeticcharactershereandnothingelse"
        )
        .is_err());
        assert!(ServerConfig::validate_session_secret(
            "k9fQ2mX8vL4nR7wB1cJ5hT3gY6pD0sZa"
        )
        .is_ok());
    }

    #[test]
    fn test_bypass_prefix_parsing() {
        let prefixes = ServerConfig::parse_bypass_prefixes("/auth, /api,/health").unwrap();
        assert_eq!(prefixes, vec!["/auth", "/api", "/health"]);
        assert!(ServerConfig::parse_bypass_prefixes("auth").is_err());
    }
}
