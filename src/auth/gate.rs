use chrono::{DateTime, Utc};
use std::sync::Arc;
use url::form_urlencoded;

use crate::auth::token::{SessionClaims, SessionCodec, TokenError};
use crate::constants::LOGIN_PATH;

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No token on the request (first visit, cleared cookies)
    TokenAbsent,
    /// Token present but failed validation
    Token(TokenError),
}

impl DenyReason {
    /// Stable label for logs and telemetry counters.
    pub fn kind(&self) -> &'static str {
        match self {
            DenyReason::TokenAbsent => "token_absent",
            DenyReason::Token(err) => err.kind(),
        }
    }
}

/// Outcome of gating one request.
///
/// The gate only decides; the serving layer executes the redirect and
/// records the deny reason.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Request may proceed. Claims are present unless the path was
    /// bypass-listed.
    Allow { claims: Option<SessionClaims> },
    /// Send the client to the login flow, then back to `return_to`.
    RedirectToLogin {
        return_to: String,
        reason: DenyReason,
    },
}

/// Validates session tokens on every inbound request.
///
/// Closes over immutable startup configuration only (codec, bypass list),
/// so it is safe to share across concurrent requests.
pub struct Gate {
    codec: Arc<SessionCodec>,
    bypass_prefixes: Vec<String>,
}

impl Gate {
    pub fn new(codec: Arc<SessionCodec>, bypass_prefixes: Vec<String>) -> Self {
        Self {
            codec,
            bypass_prefixes,
        }
    }

    /// True when the path belongs to the authentication or programmatic
    /// API surface, which must stay reachable without a token.
    pub fn is_bypassed(&self, path: &str) -> bool {
        self.bypass_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Decides one request.
    ///
    /// `request_path` is the full requested path including any query
    /// string; it is echoed back as the post-login return target. Bypass
    /// prefixes are checked before any token decode.
    pub fn decide(
        &self,
        request_path: &str,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> GateDecision {
        if self.is_bypassed(path_only(request_path)) {
            return GateDecision::Allow { claims: None };
        }

        let token = match token {
            Some(token) => token,
            None => {
                return GateDecision::RedirectToLogin {
                    return_to: request_path.to_string(),
                    reason: DenyReason::TokenAbsent,
                }
            }
        };

        match self.codec.validate(token, now) {
            Ok(claims) => GateDecision::Allow {
                claims: Some(claims),
            },
            Err(kind) => GateDecision::RedirectToLogin {
                return_to: request_path.to_string(),
                reason: DenyReason::Token(kind),
            },
        }
    }
}

/// Login URL carrying the original destination, e.g.
/// `/auth/login?callback_url=%2Fservers%2Fproduction`.
pub fn login_redirect_target(return_to: &str) -> String {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("callback_url", return_to)
        .finish();
    format!("{}?{}", LOGIN_PATH, query)
}

fn path_only(request_path: &str) -> &str {
    request_path.split('?').next().unwrap_or(request_path)
}
