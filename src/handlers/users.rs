use axum::{extract::State, response::Json, Extension};
use chrono::Duration;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, Identity};
use crate::domain::{user, User};
use crate::error::ApiError;
use crate::routes::AppState;

use super::non_empty;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = Vec::new();
    let name = non_empty(body.name, "Name is Required", &mut errors);
    let email = non_empty(body.email, "Email is Required", &mut errors);
    let password = non_empty(body.password, "Password is Required", &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    if state.store.user_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict("User Already Exists"));
    }

    let password_hash = user::hash_password(&password).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal("Registration failed")
    })?;

    let user = User::new(name, email, password_hash);
    state.store.insert_user(&user).await?;

    tracing::info!(user = %user.id, "registered new account");
    Ok(Json(json!({ "msg": "Registration is Success" })))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = Vec::new();
    let email = non_empty(body.email, "Email is Required", &mut errors);
    let password = non_empty(body.password, "Password is Required", &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let user = state
        .store
        .user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthenticated("Invalid Credentials"))?;

    if !user::verify_password(&password, &user.password_hash) {
        return Err(ApiError::unauthenticated("Invalid Credentials"));
    }

    let identity = Identity {
        id: user.id,
        name: user.name.clone(),
    };
    let ttl = Duration::hours(state.config.security.token_ttl_hours as i64);
    let token = auth::issue(&identity, &state.config.security.jwt_secret, ttl).map_err(|e| {
        tracing::error!("token signing failed: {}", e);
        ApiError::internal("Login failed")
    })?;

    Ok(Json(json!({ "msg": "Login Success", "token": token })))
}

/// GET /api/users - the authenticated user's own record
pub async fn current_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Value>, ApiError> {
    let user = state
        .store
        .user_by_id(identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User Not Found"))?;

    Ok(Json(json!({ "user": user.public() })))
}
