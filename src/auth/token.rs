use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::auth::user::{AuthenticatedUser, Role};
use crate::error::{OpsGateError, Result};

/// Claims embedded in a session token.
///
/// Immutable once issued. The role is a point-in-time snapshot: a
/// server-side role change does not reach tokens already in flight, the
/// holder keeps the issued role until re-authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Display name
    pub name: String,
    /// Avatar URI, if the account has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Role snapshot taken at issuance
    pub role: Role,
    /// Issued at (as UTC timestamp)
    pub iat: i64,
    /// Expiration time (as UTC timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Creates claims for an authenticated user, valid from `now` for `ttl`.
    pub fn new(user: &AuthenticatedUser, now: DateTime<Utc>, ttl: Duration) -> Self {
        let iat = now.timestamp();
        Self {
            sub: user.id.clone(),
            name: user.display_name.clone(),
            avatar: user.avatar_url.clone(),
            role: user.role,
            iat,
            exp: iat + ttl.as_secs() as i64,
        }
    }

    /// Validity window is closed: `iat <= now < exp`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Why a presented token failed validation.
///
/// The kinds stay distinct even though callers currently redirect on all
/// of them: expiry is routine, a bad signature is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Token could not be decoded at all
    Malformed,
    /// Token decoded but the signature does not verify
    BadSignature,
    /// Signature fine, validity window over
    Expired,
}

impl TokenError {
    /// Stable label for logs and telemetry counters.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::BadSignature => "bad_signature",
            TokenError::Expired => "expired",
        }
    }
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "token is malformed"),
            TokenError::BadSignature => write!(f, "token signature verification failed"),
            TokenError::Expired => write!(f, "token has expired"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Signs and validates session tokens (HS256) with a fixed server secret.
///
/// Pure after construction: no mutable state, no I/O.
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionCodec {
    /// Creates a codec from the signing secret and the configured token
    /// lifetime.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        // Expiry is checked against the caller-supplied clock, not the
        // system clock jsonwebtoken would use.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a signed token embedding the user's identity and role.
    pub fn issue(&self, user: &AuthenticatedUser, now: DateTime<Utc>) -> Result<String> {
        let claims = SessionClaims::new(user, now, self.ttl);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| OpsGateError::TokenIssue(format!("failed to sign session token: {}", e)))
    }

    /// Decodes a token and validates signature and expiry against `now`.
    pub fn validate(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<SessionClaims, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            },
        )?;

        let claims = data.claims;
        if claims.iat > now.timestamp() {
            return Err(TokenError::Malformed);
        }
        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

/// Extracts a bearer token from an Authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    auth_header
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}
