use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::http::Uri;
use warp::{Filter, Reply};

use opsgate::auth::gate::{login_redirect_target, Gate, GateDecision};
use opsgate::auth::token::SessionCodec;
use opsgate::auth::user::Role;
use opsgate::auth::verifier::CredentialVerifier;
use opsgate::config::ServerConfig;
use opsgate::handlers::api::{health_route, nav_route, session_route};
use opsgate::handlers::auth::{extract_session_token, login_page_route, login_route};
use opsgate::nav;
use opsgate::security_logger::{security_logger, SecurityEvent};
use opsgate::storage::memory::MemoryUserStore;

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    // Load config from the environment
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration: host={}, port={}", config.host, config.port);

    // User store; demo accounts only in development mode
    let store = Arc::new(MemoryUserStore::new());
    if config.development_mode {
        seed_demo_users(&store).await;
    }
    info!("User store ready with {} accounts", store.user_count().await);

    let codec = Arc::new(SessionCodec::new(
        &config.session_secret,
        config.session_ttl,
    ));
    let verifier = Arc::new(CredentialVerifier::new(store.clone(), config.store_timeout));
    let gate = Arc::new(Gate::new(codec.clone(), config.bypass_prefixes.clone()));

    // Navigation tree: load-time configuration, immutable afterwards
    let tree = match &config.nav_config_path {
        Some(path) => match nav::load_tree(std::path::Path::new(path)) {
            Ok(tree) => tree,
            Err(e) => {
                error!("Failed to load navigation config: {}", e);
                std::process::exit(1);
            }
        },
        None => nav::default_tree(),
    };
    let tree = Arc::new(tree);

    let routes = login_route(verifier.clone(), codec.clone())
        .or(login_page_route())
        .or(health_route())
        .or(nav_route(codec.clone(), tree.clone()))
        .or(session_route(codec.clone()))
        .or(gated_pages(gate.clone()));

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting opsgate server on {}", addr);

    warp::serve(routes).run(addr).await;
}

/// Catchall for page requests: every path not matched above goes through
/// the authorization gate, which decides; this layer executes.
fn gated_pages(
    gate: Arc<Gate>,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::get()
        .and(warp::path::full())
        .and(raw_query())
        .and(warp::header::headers_cloned())
        .and(warp::any().map(move || gate.clone()))
        .and_then(handle_page)
}

fn raw_query() -> impl Filter<Extract = (String,), Error = std::convert::Infallible> + Clone {
    warp::query::raw()
        .or(warp::any().map(String::new))
        .unify()
}

async fn handle_page(
    path: warp::path::FullPath,
    query: String,
    headers: warp::http::HeaderMap,
    gate: Arc<Gate>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let request_path = if query.is_empty() {
        path.as_str().to_string()
    } else {
        format!("{}?{}", path.as_str(), query)
    };

    let token = extract_session_token(&headers);
    match gate.decide(&request_path, token.as_deref(), chrono::Utc::now()) {
        GateDecision::Allow { claims } => {
            // Page rendering is the frontend's job; echo the claims the
            // downstream consumer would receive.
            let body = serde_json::json!({
                "path": path.as_str(),
                "session": claims,
            });
            Ok(warp::reply::json(&body).into_response())
        }
        GateDecision::RedirectToLogin { return_to, reason } => {
            security_logger()
                .record(SecurityEvent::TokenRejected {
                    kind: reason.kind(),
                    path: path.as_str().to_string(),
                })
                .await;

            let target = login_redirect_target(&return_to);
            match target.parse::<Uri>() {
                Ok(uri) => Ok(warp::redirect::see_other(uri).into_response()),
                Err(e) => {
                    error!("failed to build login redirect for {}: {}", return_to, e);
                    Ok(warp::reply::with_status(
                        warp::reply::json(&serde_json::json!({"error": "internal error"})),
                        warp::http::StatusCode::INTERNAL_SERVER_ERROR,
                    )
                    .into_response())
                }
            }
        }
    }
}

async fn seed_demo_users(store: &MemoryUserStore) {
    warn!("Development mode: seeding demo accounts. Never enable in production.");

    let demo = [
        ("alice", "alice@example.com", "admin-demo-pass", Role::Admin),
        ("bob", "bob@example.com", "user-demo-pass", Role::User),
        ("carol", "carol@example.com", "mod-demo-pass", Role::Moderator),
    ];

    for (username, email, password, role) in demo {
        match store.add_user(username, email, password, role).await {
            Ok(user) => info!("Seeded demo account {} ({})", user.username, role),
            Err(e) => warn!("Failed to seed demo account {}: {}", username, e),
        }
    }
}
