//! Auth Configuration
//!
//! Signing secret and token lifetimes, loaded from the environment at
//! startup. The secret has no default: a process without one must not
//! come up, because every realm signs with the same key.

use std::env;
use std::time::Duration;

/// Default access-token lifetime: 10 minutes
const DEFAULT_ACCESS_TTL_SECS: u64 = 600;

/// Default refresh-token lifetime: 14 days
const DEFAULT_REFRESH_TTL_SECS: u64 = 1_209_600;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT signing secret is not set (set AUTH_JWT_SECRET)")]
    MissingSecret,
}

/// Runtime configuration for the auth module
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret shared by access-token signing and verification
    pub signing_secret: String,
    /// Access-token lifetime
    pub access_ttl: Duration,
    /// Refresh-token lifetime
    pub refresh_ttl: Duration,
}

impl AuthConfig {
    pub fn new(
        signing_secret: impl Into<String>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, ConfigError> {
        let signing_secret = signing_secret.into();
        if signing_secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        Ok(Self {
            signing_secret,
            access_ttl,
            refresh_ttl,
        })
    }

    /// Load from environment variables
    ///
    /// - `AUTH_JWT_SECRET`: signing secret (canonical name)
    /// - `JWT_ACCESS_SECRET`: legacy fallback for the secret
    /// - `JWT_ACCESS_EXP_SECONDS`: access TTL, default 600
    /// - `JWT_REFRESH_EXP_SECONDS`: refresh TTL, default 1209600
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = non_empty_env("AUTH_JWT_SECRET")
            .or_else(|| non_empty_env("JWT_ACCESS_SECRET"))
            .ok_or(ConfigError::MissingSecret)?;

        Self::new(
            secret,
            Duration::from_secs(env_seconds(
                "JWT_ACCESS_EXP_SECONDS",
                DEFAULT_ACCESS_TTL_SECS,
            )),
            Duration::from_secs(env_seconds(
                "JWT_REFRESH_EXP_SECONDS",
                DEFAULT_REFRESH_TTL_SECS,
            )),
        )
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read a TTL override, keeping the default on unset or unparsable values
fn env_seconds(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                tracing::warn!(key, value = %raw, default, "Ignoring invalid TTL override");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_rejected() {
        let err = AuthConfig::new("", Duration::from_secs(600), Duration::from_secs(1_209_600));
        assert_eq!(err.unwrap_err(), ConfigError::MissingSecret);

        let err = AuthConfig::new(
            "   ",
            Duration::from_secs(600),
            Duration::from_secs(1_209_600),
        );
        assert_eq!(err.unwrap_err(), ConfigError::MissingSecret);
    }

    #[test]
    fn test_explicit_config() {
        let config = AuthConfig::new(
            "secret",
            Duration::from_secs(300),
            Duration::from_secs(86_400),
        )
        .unwrap();
        assert_eq!(config.access_ttl, Duration::from_secs(300));
        assert_eq!(config.refresh_ttl, Duration::from_secs(86_400));
    }
}
