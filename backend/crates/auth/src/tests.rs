//! End-to-end use-case tests over an in-memory realm
//!
//! Exercises the full login / refresh / logout / identify / register
//! lifecycle without a database. The in-memory store mirrors the
//! Postgres semantics, including atomic session consumption.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use chrono::Duration;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::{
    IdentifyUseCase, LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase, RegisterInput,
    RegisterUseCase,
};
use crate::domain::entity::{Customer, RefreshSession};
use crate::domain::principal::{LEVEL_CUSTOMER, Principal};
use crate::domain::repository::{CustomerRegistry, PrincipalRepository, SessionStore};
use crate::domain::value_object::Email;
use crate::error::AuthError;
use crate::token::{TokenCodec, issue_opaque_secret};
use kernel::id::SessionId;
use platform::password::{ClearTextPassword, HashedPassword};

const PASSWORD: &str = "Sunrise#Harbor42";

// ============================================================================
// In-memory realm
// ============================================================================

#[derive(Clone, Default)]
struct MemRealm {
    principals: Arc<Mutex<HashMap<Uuid, Principal>>>,
    sessions: Arc<Mutex<HashMap<Uuid, RefreshSession>>>,
}

impl PrincipalRepository for MemRealm {
    async fn find_by_email(&self, email: &Email) -> crate::error::AuthResult<Option<Principal>> {
        Ok(self
            .principals
            .lock()
            .unwrap()
            .values()
            .find(|p| p.email == *email)
            .cloned())
    }

    async fn find_by_id(&self, principal_id: Uuid) -> crate::error::AuthResult<Option<Principal>> {
        Ok(self.principals.lock().unwrap().get(&principal_id).cloned())
    }
}

impl SessionStore for MemRealm {
    async fn create(&self, session: &RefreshSession) -> crate::error::AuthResult<()> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.session_id.into_uuid(), session.clone());
        Ok(())
    }

    async fn find_by_refresh_hash(
        &self,
        hash: &str,
    ) -> crate::error::AuthResult<Option<RefreshSession>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .find(|s| s.refresh_token_hash == hash)
            .cloned())
    }

    async fn consume(&self, session_id: SessionId) -> crate::error::AuthResult<bool> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(session_id.as_uuid()) {
            Some(session) if !session.revoked => {
                session.revoked = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_by_refresh_hash(&self, hash: &str) -> crate::error::AuthResult<u64> {
        let mut revoked = 0;
        for session in self.sessions.lock().unwrap().values_mut() {
            if session.refresh_token_hash == hash && !session.revoked {
                session.revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}

impl CustomerRegistry for MemRealm {
    async fn create_customer(&self, customer: &Customer) -> crate::error::AuthResult<()> {
        let mut principals = self.principals.lock().unwrap();
        // Mirrors the unique constraint on the email column
        if principals.values().any(|p| p.email == customer.email) {
            return Err(AuthError::EmailTaken);
        }
        principals.insert(customer.customer_id.into_uuid(), customer.to_principal());
        Ok(())
    }

    async fn email_exists(&self, email: &Email) -> crate::error::AuthResult<bool> {
        Ok(self
            .principals
            .lock()
            .unwrap()
            .values()
            .any(|p| p.email == *email))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn config() -> Arc<AuthConfig> {
    Arc::new(
        AuthConfig::new(
            "scenario-test-secret-0123456789",
            StdDuration::from_secs(600),
            StdDuration::from_secs(1_209_600),
        )
        .unwrap(),
    )
}

fn hash_password(raw: &str) -> HashedPassword {
    ClearTextPassword::new(raw.to_string())
        .unwrap()
        .hash(None)
        .unwrap()
}

fn seed_staff(realm: &MemRealm, email: &str, active: bool) -> Uuid {
    let id = Uuid::new_v4();
    let principal = Principal {
        id,
        email: Email::new(email).unwrap(),
        password_hash: hash_password(PASSWORD),
        is_active: active,
        level: "staff".to_string(),
    };
    realm.principals.lock().unwrap().insert(id, principal);
    id
}

fn login_use_case(realm: &MemRealm) -> LoginUseCase<MemRealm> {
    LoginUseCase::new(Arc::new(realm.clone()), config())
}

fn refresh_use_case(realm: &MemRealm) -> RefreshUseCase<MemRealm> {
    RefreshUseCase::new(Arc::new(realm.clone()), config())
}

async fn login(realm: &MemRealm, email: &str, password: &str) -> crate::error::AuthResult<crate::application::IssuedSession> {
    login_use_case(realm)
        .execute(LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_issues_verifiable_session() {
    let realm = MemRealm::default();
    let id = seed_staff(&realm, "ops@example.com", true);

    let issued = login(&realm, "ops@example.com", PASSWORD).await.unwrap();

    let codec = TokenCodec::new(&config().signing_secret).unwrap();
    let claims = codec.verify_access_token(&issued.access_token).unwrap();
    assert_eq!(claims.principal_id().unwrap(), id);
    assert_eq!(claims.level, "staff");
    assert_eq!(claims.exp - claims.iat, 600);

    // The session row stores only the hash of the refresh secret
    let sessions = realm.sessions.lock().unwrap();
    let session = sessions.values().next().unwrap();
    assert_ne!(session.refresh_token_hash, issued.refresh_token);
    assert!(!session.revoked);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let realm = MemRealm::default();
    seed_staff(&realm, "ops@example.com", true);

    let err = login(&realm, "ops@example.com", "Wrong#Password1").await;
    assert!(matches!(err, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_unknown_email_same_error_as_wrong_password() {
    let realm = MemRealm::default();
    seed_staff(&realm, "ops@example.com", true);

    let err = login(&realm, "nobody@example.com", PASSWORD).await;
    assert!(matches!(err, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_inactive_account() {
    let realm = MemRealm::default();
    seed_staff(&realm, "gone@example.com", false);

    let err = login(&realm, "gone@example.com", PASSWORD).await;
    assert!(matches!(err, Err(AuthError::AccountInactive)));
}

#[tokio::test]
async fn test_login_inactive_account_with_wrong_password() {
    // Credential failure wins over liveness
    let realm = MemRealm::default();
    seed_staff(&realm, "gone@example.com", false);

    let err = login(&realm, "gone@example.com", "Wrong#Password1").await;
    assert!(matches!(err, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_multiple_logins_coexist() {
    let realm = MemRealm::default();
    seed_staff(&realm, "ops@example.com", true);

    let first = login(&realm, "ops@example.com", PASSWORD).await.unwrap();
    let second = login(&realm, "ops@example.com", PASSWORD).await.unwrap();

    // A second device does not invalidate the first session
    let rotated = refresh_use_case(&realm)
        .execute(&first.refresh_token)
        .await;
    assert!(rotated.is_ok());
    let rotated = refresh_use_case(&realm)
        .execute(&second.refresh_token)
        .await;
    assert!(rotated.is_ok());
}

// ============================================================================
// Refresh rotation
// ============================================================================

#[tokio::test]
async fn test_refresh_rotates_and_old_secret_dies() {
    let realm = MemRealm::default();
    seed_staff(&realm, "ops@example.com", true);
    let issued = login(&realm, "ops@example.com", PASSWORD).await.unwrap();

    let rotated = refresh_use_case(&realm)
        .execute(&issued.refresh_token)
        .await
        .unwrap();
    assert_ne!(rotated.refresh_token, issued.refresh_token);
    assert_ne!(rotated.session_id.into_uuid(), issued.session_id.into_uuid());

    // Replay of the consumed secret
    let replay = refresh_use_case(&realm)
        .execute(&issued.refresh_token)
        .await;
    assert!(matches!(replay, Err(AuthError::RevokedToken)));

    // The rotated secret still works
    let again = refresh_use_case(&realm)
        .execute(&rotated.refresh_token)
        .await;
    assert!(again.is_ok());
}

#[tokio::test]
async fn test_refresh_unknown_secret() {
    let realm = MemRealm::default();
    seed_staff(&realm, "ops@example.com", true);

    let (never_issued, _) = issue_opaque_secret();
    let err = refresh_use_case(&realm).execute(&never_issued).await;
    assert!(matches!(err, Err(AuthError::InvalidRefreshToken)));
}

#[tokio::test]
async fn test_refresh_expired_session() {
    let realm = MemRealm::default();
    let id = seed_staff(&realm, "ops@example.com", true);

    let (plain, hash) = issue_opaque_secret();
    let stale = RefreshSession::new(id, hash, Duration::seconds(-5));
    SessionStore::create(&realm, &stale).await.unwrap();

    let err = refresh_use_case(&realm).execute(&plain).await;
    assert!(matches!(err, Err(AuthError::ExpiredToken)));
}

#[tokio::test]
async fn test_revoked_wins_over_expired() {
    let realm = MemRealm::default();
    let id = seed_staff(&realm, "ops@example.com", true);

    let (plain, hash) = issue_opaque_secret();
    let mut stale = RefreshSession::new(id, hash, Duration::seconds(-5));
    stale.revoked = true;
    SessionStore::create(&realm, &stale).await.unwrap();

    let err = refresh_use_case(&realm).execute(&plain).await;
    assert!(matches!(err, Err(AuthError::RevokedToken)));
}

#[tokio::test]
async fn test_refresh_for_deactivated_principal() {
    let realm = MemRealm::default();
    let id = seed_staff(&realm, "ops@example.com", true);
    let issued = login(&realm, "ops@example.com", PASSWORD).await.unwrap();

    realm
        .principals
        .lock()
        .unwrap()
        .get_mut(&id)
        .unwrap()
        .is_active = false;

    let err = refresh_use_case(&realm)
        .execute(&issued.refresh_token)
        .await;
    assert!(matches!(err, Err(AuthError::AccountInactive)));
}

#[tokio::test]
async fn test_concurrent_refresh_single_winner() {
    let realm = MemRealm::default();
    seed_staff(&realm, "ops@example.com", true);
    let issued = login(&realm, "ops@example.com", PASSWORD).await.unwrap();

    let use_case = Arc::new(refresh_use_case(&realm));
    let first = tokio::spawn({
        let use_case = use_case.clone();
        let token = issued.refresh_token.clone();
        async move { use_case.execute(&token).await }
    });
    let second = tokio::spawn({
        let use_case = use_case.clone();
        let token = issued.refresh_token.clone();
        async move { use_case.execute(&token).await }
    });

    let first = first.await.unwrap();
    let second = second.await.unwrap();

    let winners = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for result in [first, second] {
        if let Err(e) = result {
            assert!(matches!(e, AuthError::RevokedToken));
        }
    }
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_revokes_session() {
    let realm = MemRealm::default();
    seed_staff(&realm, "ops@example.com", true);
    let issued = login(&realm, "ops@example.com", PASSWORD).await.unwrap();

    let logout = LogoutUseCase::new(Arc::new(realm.clone()));
    logout.execute(&issued.refresh_token).await.unwrap();

    let err = refresh_use_case(&realm)
        .execute(&issued.refresh_token)
        .await;
    assert!(matches!(err, Err(AuthError::RevokedToken)));
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let realm = MemRealm::default();
    seed_staff(&realm, "ops@example.com", true);
    let issued = login(&realm, "ops@example.com", PASSWORD).await.unwrap();

    let logout = LogoutUseCase::new(Arc::new(realm.clone()));
    logout.execute(&issued.refresh_token).await.unwrap();
    // Second logout with the same secret still succeeds
    logout.execute(&issued.refresh_token).await.unwrap();

    // As does a logout with a token the server never issued
    let (never_issued, _) = issue_opaque_secret();
    logout.execute(&never_issued).await.unwrap();
}

// ============================================================================
// Identify
// ============================================================================

#[tokio::test]
async fn test_identify_resolves_principal() {
    let realm = MemRealm::default();
    let id = seed_staff(&realm, "ops@example.com", true);
    let issued = login(&realm, "ops@example.com", PASSWORD).await.unwrap();

    let identify = IdentifyUseCase::new(Arc::new(realm.clone()), config());
    let identity = identify.execute(&issued.access_token).await.unwrap();
    assert_eq!(identity.principal_id, id);
    assert_eq!(identity.email, "ops@example.com");
    assert_eq!(identity.level, "staff");
}

#[tokio::test]
async fn test_identify_deactivated_principal_reads_as_bad_token() {
    let realm = MemRealm::default();
    let id = seed_staff(&realm, "ops@example.com", true);
    let issued = login(&realm, "ops@example.com", PASSWORD).await.unwrap();

    realm
        .principals
        .lock()
        .unwrap()
        .get_mut(&id)
        .unwrap()
        .is_active = false;

    let identify = IdentifyUseCase::new(Arc::new(realm.clone()), config());
    let err = identify.execute(&issued.access_token).await;
    assert!(matches!(err, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_identify_garbage_token() {
    let realm = MemRealm::default();
    let identify = IdentifyUseCase::new(Arc::new(realm), config());
    let err = identify.execute("not.a.token").await;
    assert!(matches!(err, Err(AuthError::InvalidToken)));
}

// ============================================================================
// Register
// ============================================================================

#[tokio::test]
async fn test_register_opens_customer_session() {
    let realm = MemRealm::default();
    let register = RegisterUseCase::new(Arc::new(realm.clone()), config());

    let output = register
        .execute(RegisterInput {
            email: "shopper@example.com".to_string(),
            password: "Fresh#Start2026".to_string(),
            full_name: "  Hanako Sato  ".to_string(),
        })
        .await
        .unwrap();

    let codec = TokenCodec::new(&config().signing_secret).unwrap();
    let claims = codec.verify_access_token(&output.session.access_token).unwrap();
    assert_eq!(
        claims.principal_id().unwrap(),
        output.customer_id.into_uuid()
    );
    assert_eq!(claims.level, LEVEL_CUSTOMER);

    // The new account can log in with its own credentials
    let issued = login(&realm, "shopper@example.com", "Fresh#Start2026")
        .await
        .unwrap();
    assert!(!issued.access_token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let realm = MemRealm::default();
    let register = RegisterUseCase::new(Arc::new(realm.clone()), config());

    let input = || RegisterInput {
        email: "shopper@example.com".to_string(),
        password: "Fresh#Start2026".to_string(),
        full_name: "Hanako Sato".to_string(),
    };
    register.execute(input()).await.unwrap();

    let err = register.execute(input()).await;
    assert!(matches!(err, Err(AuthError::EmailTaken)));
}

#[tokio::test]
async fn test_registration_race_loser_gets_email_taken() {
    let realm = MemRealm::default();
    let register = RegisterUseCase::new(Arc::new(realm.clone()), config());
    register
        .execute(RegisterInput {
            email: "shopper@example.com".to_string(),
            password: "Fresh#Start2026".to_string(),
            full_name: "Hanako Sato".to_string(),
        })
        .await
        .unwrap();

    // A racing registration that already passed the exists check still
    // collides on insert and must surface as EmailTaken, not a storage
    // failure
    let duplicate = Customer::new(
        Email::new("shopper@example.com").unwrap(),
        hash_password("Fresh#Start2026"),
        "Other Shopper".to_string(),
    );
    let err = CustomerRegistry::create_customer(&realm, &duplicate).await;
    assert!(matches!(err, Err(AuthError::EmailTaken)));
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let realm = MemRealm::default();
    let register = RegisterUseCase::new(Arc::new(realm), config());

    let err = register
        .execute(RegisterInput {
            email: "shopper@example.com".to_string(),
            password: "password123".to_string(),
            full_name: "Hanako Sato".to_string(),
        })
        .await;
    assert!(matches!(err, Err(AuthError::PasswordPolicy(_))));
}

#[tokio::test]
async fn test_register_rejects_bad_email() {
    let realm = MemRealm::default();
    let register = RegisterUseCase::new(Arc::new(realm), config());

    let err = register
        .execute(RegisterInput {
            email: "not-an-email".to_string(),
            password: "Fresh#Start2026".to_string(),
            full_name: "Hanako Sato".to_string(),
        })
        .await;
    assert!(matches!(err, Err(AuthError::InvalidEmail)));
}
