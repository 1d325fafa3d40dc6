//! Routers
//!
//! One router per realm. Both expose the same session endpoints; the
//! storefront additionally exposes self-service registration.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::application::config::AuthConfig;
use crate::domain::repository::{PrincipalRepository, SessionStore};
use crate::infra::postgres::{PgAdminRealm, PgCustomerRealm};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{BearerAuthState, require_access_token};

/// Session routes shared by every realm
fn session_router<R>(realm: R, config: AuthConfig) -> Router
where
    R: PrincipalRepository + SessionStore + Clone + Send + Sync + 'static,
{
    let config = Arc::new(config);
    let bearer = BearerAuthState {
        config: config.clone(),
    };
    let state = AuthAppState {
        realm: Arc::new(realm),
        config,
    };

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route(
            "/me",
            get(handlers::me::<R>)
                .route_layer(middleware::from_fn_with_state(bearer, require_access_token)),
        )
        .with_state(state)
}

/// Routes for the administrator realm
///
/// Mounted under `/api/admin/auth`. There is no admin registration
/// endpoint; admin accounts are provisioned out of band.
pub fn admin_auth_router(realm: PgAdminRealm, config: AuthConfig) -> Router {
    session_router(realm, config)
}

/// Routes for the storefront customer realm
///
/// Mounted under `/api/storefront/auth`.
pub fn storefront_auth_router(realm: PgCustomerRealm, config: AuthConfig) -> Router {
    let config = Arc::new(config);
    let bearer = BearerAuthState {
        config: config.clone(),
    };
    let state = AuthAppState {
        realm: Arc::new(realm),
        config,
    };

    Router::new()
        .route("/register", post(handlers::register::<PgCustomerRealm>))
        .route("/login", post(handlers::login::<PgCustomerRealm>))
        .route("/refresh", post(handlers::refresh::<PgCustomerRealm>))
        .route("/logout", post(handlers::logout::<PgCustomerRealm>))
        .route(
            "/me",
            get(handlers::me::<PgCustomerRealm>)
                .route_layer(middleware::from_fn_with_state(bearer, require_access_token)),
        )
        .with_state(state)
}
