use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::database::DocumentStore;
use crate::handlers::{posts, profiles, users};
use crate::middleware::require_auth;

/// Shared request state: configuration and the document store, both built
/// once at startup and passed by reference everywhere.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
}

pub fn app(state: AppState) -> Router {
    let enable_cors = state.config.security.enable_cors;

    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(state.clone())
        .merge(user_routes(state.clone()))
        .merge(profile_routes(state.clone()))
        .merge(post_routes(state));

    if enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    router.layer(TraceLayer::new_for_http())
}

fn user_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/users", get(users::current_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
        .merge(protected)
        .with_state(state)
}

fn profile_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/profiles/me", get(profiles::me))
        .route("/api/profiles", post(profiles::create).put(profiles::update))
        .route("/api/profiles/users/:user_id", delete(profiles::delete_account))
        .route("/api/profiles/experience", put(profiles::add_experience))
        .route("/api/profiles/experience/:exp_id", delete(profiles::delete_experience))
        .route("/api/profiles/education", put(profiles::add_education))
        .route("/api/profiles/education/:edu_id", delete(profiles::delete_education))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/api/profiles", get(profiles::list))
        .route("/api/profiles/users/:user_id", get(profiles::get_by_user))
        .merge(protected)
        .with_state(state)
}

fn post_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/posts", post(posts::create).get(posts::list))
        .route("/api/posts/:post_id", get(posts::get).delete(posts::delete))
        .route("/api/posts/like/:post_id", put(posts::like))
        .route("/api/posts/unlike/:post_id", put(posts::unlike))
        .route("/api/posts/comment/:post_id", post(posts::add_comment))
        .route("/api/posts/comment/:post_id/:comment_id", delete(posts::delete_comment))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "DevConnect API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "users": "/api/users/* (register/login public)",
            "profiles": "/api/profiles/* (listing public)",
            "posts": "/api/posts/* (protected)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "timestamp": now })),
            )
        }
    }
}
