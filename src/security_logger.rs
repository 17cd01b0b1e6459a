//! Security-focused logging module to track authentication events
//!
//! Credential and token failures all look the same to the client on
//! purpose; this is where the precise kinds stay visible. Counters are
//! keyed by kind so telemetry can tell ordinary expiry apart from
//! tampering attempts.

use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

/// Authentication and authorization events worth tracking
#[derive(Debug, Clone)]
pub enum SecurityEvent {
    LoginSucceeded { user_id: String },
    LoginFailed { kind: &'static str },
    TokenRejected { kind: &'static str, path: String },
}

impl SecurityEvent {
    fn counter_key(&self) -> String {
        match self {
            SecurityEvent::LoginSucceeded { .. } => "login_succeeded".to_string(),
            SecurityEvent::LoginFailed { kind } => format!("login_failed.{}", kind),
            SecurityEvent::TokenRejected { kind, .. } => format!("token_rejected.{}", kind),
        }
    }
}

/// Records security events and keeps per-kind counters
pub struct SecurityLogger {
    counts: RwLock<HashMap<String, u64>>,
}

impl SecurityLogger {
    pub fn new() -> Self {
        Self {
            counts: RwLock::new(HashMap::new()),
        }
    }

    pub async fn record(&self, event: SecurityEvent) {
        {
            let mut counts = self.counts.write().await;
            *counts.entry(event.counter_key()).or_insert(0) += 1;
        }

        match &event {
            SecurityEvent::LoginSucceeded { user_id } => {
                log::info!("login succeeded for user {}", user_id);
            }
            SecurityEvent::LoginFailed { kind } => {
                log::warn!("login failed: {}", kind);
            }
            SecurityEvent::TokenRejected { kind, path } => {
                log::warn!("token rejected ({}) on {}", kind, path);
            }
        }
    }

    /// Snapshot of event counts, keyed by kind
    pub async fn counts(&self) -> HashMap<String, u64> {
        self.counts.read().await.clone()
    }
}

impl Default for SecurityLogger {
    fn default() -> Self {
        Self::new()
    }
}

static SECURITY_LOGGER: OnceLock<SecurityLogger> = OnceLock::new();

/// Process-wide security logger
pub fn security_logger() -> &'static SecurityLogger {
    SECURITY_LOGGER.get_or_init(SecurityLogger::new)
}
