//! Programmatic API surface
//!
//! These routes live under a gate-bypassed prefix and do their own token
//! check, so machine clients get a structured 401 instead of a redirect.

use serde::Serialize;
use std::sync::Arc;
use warp::http::{HeaderMap, StatusCode};
use warp::{Filter, Rejection, Reply};

use crate::auth::token::{SessionClaims, SessionCodec};
use crate::handlers::auth::extract_session_token;
use crate::nav::{resolve, NavSection};
use crate::security_logger::{security_logger, SecurityEvent};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// GET /api/health
pub fn health_route() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "health").and(warp::get()).map(|| "OK")
}

/// GET /api/nav - the navigation surface the session's role may see
pub fn nav_route(
    codec: Arc<SessionCodec>,
    tree: Arc<Vec<NavSection>>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "nav")
        .and(warp::get())
        .and(warp::header::headers_cloned())
        .and(with_codec(codec))
        .and(warp::any().map(move || tree.clone()))
        .and_then(handle_nav)
}

/// GET /api/session - the current session claims
pub fn session_route(
    codec: Arc<SessionCodec>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "session")
        .and(warp::get())
        .and(warp::header::headers_cloned())
        .and(with_codec(codec))
        .and_then(handle_session)
}

async fn handle_nav(
    headers: HeaderMap,
    codec: Arc<SessionCodec>,
    tree: Arc<Vec<NavSection>>,
) -> Result<warp::reply::Response, Rejection> {
    let claims = match authorize(&headers, &codec, "/api/nav").await {
        Ok(claims) => claims,
        Err(reply) => return Ok(reply),
    };

    let visible = resolve(&tree, claims.role);
    Ok(warp::reply::json(&visible).into_response())
}

async fn handle_session(
    headers: HeaderMap,
    codec: Arc<SessionCodec>,
) -> Result<warp::reply::Response, Rejection> {
    match authorize(&headers, &codec, "/api/session").await {
        Ok(claims) => Ok(warp::reply::json(&claims).into_response()),
        Err(reply) => Ok(reply),
    }
}

/// Token check for API handlers. Failures come back as a ready-made 401
/// response; the rejection kind is recorded before it is flattened.
async fn authorize(
    headers: &HeaderMap,
    codec: &SessionCodec,
    path: &str,
) -> Result<SessionClaims, warp::reply::Response> {
    let token = match extract_session_token(headers) {
        Some(token) => token,
        None => {
            security_logger()
                .record(SecurityEvent::TokenRejected {
                    kind: "token_absent",
                    path: path.to_string(),
                })
                .await;
            return Err(unauthorized());
        }
    };

    match codec.validate(&token, chrono::Utc::now()) {
        Ok(claims) => Ok(claims),
        Err(err) => {
            security_logger()
                .record(SecurityEvent::TokenRejected {
                    kind: err.kind(),
                    path: path.to_string(),
                })
                .await;
            Err(unauthorized())
        }
    }
}

fn unauthorized() -> warp::reply::Response {
    warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            error: "unauthorized".to_string(),
        }),
        StatusCode::UNAUTHORIZED,
    )
    .into_response()
}

fn with_codec(
    codec: Arc<SessionCodec>,
) -> impl Filter<Extract = (Arc<SessionCodec>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || codec.clone())
}
