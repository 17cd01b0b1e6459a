//! Login endpoint and session token extraction

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::{HeaderMap, StatusCode};
use warp::{Filter, Rejection, Reply};

use crate::auth::token::{extract_bearer_token, SessionCodec};
use crate::auth::user::AuthenticatedUser;
use crate::auth::verifier::{AuthError, CredentialVerifier};
use crate::constants::SESSION_COOKIE;
use crate::security_logger::{security_logger, SecurityEvent};

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login reply
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthenticatedUser,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// POST /auth/login
pub fn login_route(
    verifier: Arc<CredentialVerifier>,
    codec: Arc<SessionCodec>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("auth" / "login")
        .and(warp::post())
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with_verifier(verifier))
        .and(with_codec(codec))
        .and_then(handle_login)
}

/// GET /auth/login - placeholder; page rendering belongs to the frontend
pub fn login_page_route() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("auth" / "login").and(warp::get()).map(|| {
        warp::reply::html(
            "<!doctype html><title>Sign in</title><p>Sign in by POSTing credentials to /auth/login</p>",
        )
    })
}

async fn handle_login(
    body: LoginRequest,
    verifier: Arc<CredentialVerifier>,
    codec: Arc<SessionCodec>,
) -> Result<warp::reply::Response, Rejection> {
    match verifier.verify(&body.identifier, &body.password).await {
        Ok(user) => {
            let token = match codec.issue(&user, chrono::Utc::now()) {
                Ok(token) => token,
                Err(e) => {
                    log::error!("failed to issue session token: {}", e);
                    return Ok(error_reply(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error",
                    ));
                }
            };

            security_logger()
                .record(SecurityEvent::LoginSucceeded {
                    user_id: user.id.clone(),
                })
                .await;

            let cookie = format!(
                "{}={}; HttpOnly; Path=/; SameSite=Lax",
                SESSION_COOKIE, token
            );
            let reply = warp::reply::json(&LoginResponse { token, user });
            let reply = warp::reply::with_header(reply, "set-cookie", cookie);
            Ok(reply.into_response())
        }
        Err(err) => {
            security_logger()
                .record(SecurityEvent::LoginFailed { kind: err.kind() })
                .await;

            match err {
                AuthError::StoreUnavailable(ref detail) => {
                    log::error!("user store unavailable during login: {}", detail);
                    Ok(error_reply(
                        StatusCode::SERVICE_UNAVAILABLE,
                        "service unavailable",
                    ))
                }
                // One generic message for every credential failure; the
                // precise kind stays in the logs.
                _ => {
                    log::debug!("login rejected: {}", err);
                    Ok(error_reply(StatusCode::UNAUTHORIZED, "invalid credentials"))
                }
            }
        }
    }
}

/// Pulls the session token off a request: Authorization header first,
/// then the session cookie.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get("authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = extract_bearer_token(auth_str) {
                return Some(token);
            }
        }
    }

    if let Some(cookie_header) = headers.get("cookie") {
        if let Ok(cookie_str) = cookie_header.to_str() {
            let prefix = format!("{}=", SESSION_COOKIE);
            for pair in cookie_str.split(';') {
                if let Some(value) = pair.trim().strip_prefix(prefix.as_str()) {
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
        }
    }

    None
}

fn error_reply(status: StatusCode, message: &str) -> warp::reply::Response {
    warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            error: message.to_string(),
        }),
        status,
    )
    .into_response()
}

fn with_verifier(
    verifier: Arc<CredentialVerifier>,
) -> impl Filter<Extract = (Arc<CredentialVerifier>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || verifier.clone())
}

fn with_codec(
    codec: Arc<SessionCodec>,
) -> impl Filter<Extract = (Arc<SessionCodec>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || codec.clone())
}
