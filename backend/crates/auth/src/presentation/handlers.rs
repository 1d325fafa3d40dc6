//! HTTP Handlers
//!
//! Thin adapters between the wire DTOs and the use cases. Handlers are
//! generic over the realm, so the same code serves the admin and the
//! storefront surface.

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::application::config::AuthConfig;
use crate::application::{
    IdentifyUseCase, LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase, RegisterInput,
    RegisterUseCase,
};
use crate::domain::repository::{CustomerRegistry, PrincipalRepository, SessionStore};
use crate::error::AuthResult;
use crate::presentation::dto::{
    LoginRequest, LogoutRequest, MeResponse, RefreshRequest, RegisterRequest, RegisterResponse,
    SessionResponse,
};
use crate::token::AccessClaims;

/// Shared state for one realm's routes
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: Send + Sync + 'static,
{
    pub realm: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(request): Json<LoginRequest>,
) -> AuthResult<Json<SessionResponse>>
where
    R: PrincipalRepository + SessionStore + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.realm.clone(), state.config.clone());
    let issued = use_case
        .execute(LoginInput {
            email: request.email,
            password: request.password,
        })
        .await?;
    Ok(Json(issued.into()))
}

/// POST /refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    Json(request): Json<RefreshRequest>,
) -> AuthResult<Json<SessionResponse>>
where
    R: PrincipalRepository + SessionStore + Send + Sync + 'static,
{
    let use_case = RefreshUseCase::new(state.realm.clone(), state.config.clone());
    let issued = use_case.execute(&request.refresh_token).await?;
    Ok(Json(issued.into()))
}

/// POST /logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    Json(request): Json<LogoutRequest>,
) -> AuthResult<StatusCode>
where
    R: SessionStore + Send + Sync + 'static,
{
    let use_case = LogoutUseCase::new(state.realm.clone());
    use_case.execute(&request.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /me (behind the bearer middleware)
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    Extension(claims): Extension<AccessClaims>,
) -> AuthResult<Json<MeResponse>>
where
    R: PrincipalRepository + Send + Sync + 'static,
{
    let use_case = IdentifyUseCase::new(state.realm.clone(), state.config.clone());
    let identity = use_case.lookup(&claims).await?;
    Ok(Json(identity.into()))
}

/// POST /register (storefront realm only)
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(request): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    R: CustomerRegistry + SessionStore + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.realm.clone(), state.config.clone());
    let output = use_case
        .execute(RegisterInput {
            email: request.email,
            password: request.password,
            full_name: request.full_name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(output.into())))
}
