//! PostgreSQL Repository Implementations
//!
//! One realm struct per principal table. Admin and customer realms are
//! physically separated: separate account tables, separate session
//! tables, no cross-realm queries. Both implement the same repository
//! traits, so the use cases never see the difference.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{Customer, RefreshSession};
use crate::domain::principal::{LEVEL_CUSTOMER, Principal};
use crate::domain::repository::{CustomerRegistry, PrincipalRepository, SessionStore};
use crate::domain::value_object::{AdminLevel, Email};
use crate::error::{AuthError, AuthResult};
use kernel::id::SessionId;
use platform::password::HashedPassword;

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AdminRow {
    admin_id: Uuid,
    email: String,
    password_hash: String,
    level: String,
    is_active: bool,
}

impl AdminRow {
    fn into_principal(self) -> AuthResult<Principal> {
        let level = AdminLevel::from_code(&self.level)
            .ok_or_else(|| AuthError::Internal(format!("Unknown admin level: {}", self.level)))?;
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|_| AuthError::Internal("Stored admin password hash is malformed".into()))?;
        Ok(Principal {
            id: self.admin_id,
            email: Email::from_db(self.email),
            password_hash,
            is_active: self.is_active,
            level: level.code().to_string(),
        })
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    customer_id: Uuid,
    email: String,
    password_hash: String,
    is_active: bool,
}

impl CustomerRow {
    fn into_principal(self) -> AuthResult<Principal> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash).map_err(|_| {
            AuthError::Internal("Stored customer password hash is malformed".into())
        })?;
        Ok(Principal {
            id: self.customer_id,
            email: Email::from_db(self.email),
            password_hash,
            is_active: self.is_active,
            level: LEVEL_CUSTOMER.to_string(),
        })
    }
}

/// Session row shape shared by both realms
///
/// The admin table stores `admin_id` and the customer table stores
/// `customer_id`; both are selected as `principal_id`.
#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    principal_id: Uuid,
    refresh_token_hash: String,
    created_at: chrono::DateTime<chrono::Utc>,
    expires_at: chrono::DateTime<chrono::Utc>,
    revoked: bool,
}

impl SessionRow {
    fn into_session(self) -> RefreshSession {
        RefreshSession {
            session_id: SessionId::from_uuid(self.session_id),
            principal_id: self.principal_id,
            refresh_token_hash: self.refresh_token_hash,
            created_at: self.created_at,
            expires_at: self.expires_at,
            revoked: self.revoked,
        }
    }
}

// ============================================================================
// Admin Realm
// ============================================================================

/// Repository over `admins` and `admin_sessions`
#[derive(Clone)]
pub struct PgAdminRealm {
    pool: PgPool,
}

impl PgAdminRealm {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PrincipalRepository for PgAdminRealm {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Principal>> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            SELECT admin_id, email, password_hash, level, is_active
            FROM admins
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AdminRow::into_principal).transpose()
    }

    async fn find_by_id(&self, principal_id: Uuid) -> AuthResult<Option<Principal>> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            SELECT admin_id, email, password_hash, level, is_active
            FROM admins
            WHERE admin_id = $1
            "#,
        )
        .bind(principal_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AdminRow::into_principal).transpose()
    }
}

impl SessionStore for PgAdminRealm {
    async fn create(&self, session: &RefreshSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO admin_sessions
                (session_id, admin_id, refresh_token_hash, created_at, expires_at, revoked)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(session.session_id.into_uuid())
        .bind(session.principal_id)
        .bind(&session.refresh_token_hash)
        .bind(session.created_at)
        .bind(session.expires_at)
        .bind(session.revoked)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_refresh_hash(&self, hash: &str) -> AuthResult<Option<RefreshSession>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT session_id, admin_id AS principal_id, refresh_token_hash,
                   created_at, expires_at, revoked
            FROM admin_sessions
            WHERE refresh_token_hash = $1
            "#,
        )
        .bind(hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn consume(&self, session_id: SessionId) -> AuthResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE admin_sessions
            SET revoked = TRUE
            WHERE session_id = $1 AND revoked = FALSE
            "#,
        )
        .bind(session_id.into_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn revoke_by_refresh_hash(&self, hash: &str) -> AuthResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE admin_sessions
            SET revoked = TRUE
            WHERE refresh_token_hash = $1 AND revoked = FALSE
            "#,
        )
        .bind(hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

// ============================================================================
// Customer Realm
// ============================================================================

/// Repository over `customers` and `customer_sessions`
#[derive(Clone)]
pub struct PgCustomerRealm {
    pool: PgPool,
}

impl PgCustomerRealm {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PrincipalRepository for PgCustomerRealm {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Principal>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT customer_id, email, password_hash, is_active
            FROM customers
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CustomerRow::into_principal).transpose()
    }

    async fn find_by_id(&self, principal_id: Uuid) -> AuthResult<Option<Principal>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT customer_id, email, password_hash, is_active
            FROM customers
            WHERE customer_id = $1
            "#,
        )
        .bind(principal_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CustomerRow::into_principal).transpose()
    }
}

impl SessionStore for PgCustomerRealm {
    async fn create(&self, session: &RefreshSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO customer_sessions
                (session_id, customer_id, refresh_token_hash, created_at, expires_at, revoked)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(session.session_id.into_uuid())
        .bind(session.principal_id)
        .bind(&session.refresh_token_hash)
        .bind(session.created_at)
        .bind(session.expires_at)
        .bind(session.revoked)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_refresh_hash(&self, hash: &str) -> AuthResult<Option<RefreshSession>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT session_id, customer_id AS principal_id, refresh_token_hash,
                   created_at, expires_at, revoked
            FROM customer_sessions
            WHERE refresh_token_hash = $1
            "#,
        )
        .bind(hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn consume(&self, session_id: SessionId) -> AuthResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE customer_sessions
            SET revoked = TRUE
            WHERE session_id = $1 AND revoked = FALSE
            "#,
        )
        .bind(session_id.into_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn revoke_by_refresh_hash(&self, hash: &str) -> AuthResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE customer_sessions
            SET revoked = TRUE
            WHERE refresh_token_hash = $1 AND revoked = FALSE
            "#,
        )
        .bind(hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

impl CustomerRegistry for PgCustomerRealm {
    async fn create_customer(&self, customer: &Customer) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO customers
                (customer_id, email, password_hash, full_name, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(customer.customer_id.into_uuid())
        .bind(customer.email.as_str())
        .bind(customer.password_hash.as_phc_string())
        .bind(&customer.full_name)
        .bind(customer.is_active)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            // A racing registration that passed the exists check still
            // trips the unique email constraint here
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AuthError::EmailTaken)
            }
            Err(e) => Err(AuthError::Storage(e)),
        }
    }

    async fn email_exists(&self, email: &Email) -> AuthResult<bool> {
        let exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM customers WHERE email = $1 LIMIT 1")
                .bind(email.as_str())
                .fetch_optional(&self.pool)
                .await?;

        Ok(exists.is_some())
    }
}
