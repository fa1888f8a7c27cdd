use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::error::ApiError;
use crate::routes::AppState;

/// Header carrying the raw signed token, no Bearer scheme.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Request gate for protected routes.
///
/// Extracts the token from `x-auth-token`, verifies it against the configured
/// secret and injects the resolved [`auth::Identity`] as a request extension.
/// A missing header and a failed verification are both 401, with distinct
/// messages for diagnostics. Handlers never run on rejection.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ApiError::unauthenticated("No Token, Authentication Denied"))?;

    let identity = auth::verify(&token, &state.config.security.jwt_secret)
        .map_err(|_| ApiError::unauthenticated("Invalid Token"))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
