//! Access-Token Middleware
//!
//! Verifies the `Authorization: Bearer` header and stashes the decoded
//! claims in request extensions for downstream handlers. Routes behind
//! this middleware never see an unverified token.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::token::{AccessClaims, TokenCodec};

#[derive(Clone)]
pub struct BearerAuthState {
    pub config: Arc<AuthConfig>,
}

/// Require a valid access token on the request
pub async fn require_access_token(
    State(state): State<BearerAuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let claims = bearer_claims(&state, request.headers()).map_err(|e| e.into_response())?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

fn bearer_claims(state: &BearerAuthState, headers: &HeaderMap) -> AuthResult<AccessClaims> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::InvalidToken)?;
    let token = value.strip_prefix("Bearer ").ok_or(AuthError::InvalidToken)?;

    let codec = TokenCodec::new(&state.config.signing_secret)?;
    codec.verify_access_token(token)
}
