/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Identity-provider configuration.
//!
//! [`CognitoSettings`] holds the raw per-field values, each either a literal
//! or a deferred computation (so secrets can come from a secret store at
//! flow start instead of living in the environment). [`resolve`] evaluates
//! them once into an immutable [`CognitoConfig`], which also derives every
//! provider endpoint — the issuer URL in particular is always computed from
//! configuration, never taken from a token.
//!
//! [`resolve`]: CognitoSettings::resolve

use std::env;
use std::fmt;
use std::sync::Arc;

use crate::error::AuthError;

/// A configuration value: a literal string, or a computation evaluated at
/// resolution time.
#[derive(Clone)]
pub enum ConfigValue {
    Literal(String),
    Deferred(Arc<dyn Fn() -> Result<String, String> + Send + Sync>),
}

impl ConfigValue {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn() -> Result<String, String> + Send + Sync + 'static,
    {
        Self::Deferred(Arc::new(f))
    }

    /// Evaluate the value. A deferred computation that fails is a fatal
    /// configuration error.
    fn resolve(&self, field: &str) -> Result<String, AuthError> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Deferred(f) => {
                f().map_err(|reason| AuthError::Config(format!("{field}: {reason}")))
            }
        }
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Deferred(_) => f.debug_tuple("Deferred").field(&"<fn>").finish(),
        }
    }
}

/// Raw identity-provider settings, resolved once per flow into a
/// [`CognitoConfig`].
#[derive(Debug, Clone)]
pub struct CognitoSettings {
    pub auth_domain: ConfigValue,
    pub client_id: ConfigValue,
    pub client_secret: ConfigValue,
    pub user_pool_id: ConfigValue,
    pub region: ConfigValue,
    pub redirect_url: ConfigValue,
}

impl CognitoSettings {
    /// Load settings from environment variables, all as literals.
    ///
    /// # Required
    /// - `COGNITO_AUTH_DOMAIN` (e.g. `"auth.example.com"`)
    /// - `COGNITO_CLIENT_ID`
    /// - `COGNITO_CLIENT_SECRET`
    /// - `COGNITO_USER_POOL_ID` (e.g. `"us-east-1_AbCdEfGhI"`)
    /// - `AWS_REGION` (e.g. `"us-east-1"`)
    /// - `COGNITO_REDIRECT_URL`
    pub fn from_env() -> Result<Self, AuthError> {
        Ok(Self {
            auth_domain: ConfigValue::Literal(require_env("COGNITO_AUTH_DOMAIN")?),
            client_id: ConfigValue::Literal(require_env("COGNITO_CLIENT_ID")?),
            client_secret: ConfigValue::Literal(require_env("COGNITO_CLIENT_SECRET")?),
            user_pool_id: ConfigValue::Literal(require_env("COGNITO_USER_POOL_ID")?),
            region: ConfigValue::Literal(require_env("AWS_REGION")?),
            redirect_url: ConfigValue::Literal(require_env("COGNITO_REDIRECT_URL")?),
        })
    }

    /// Evaluate every field into a concrete [`CognitoConfig`].
    ///
    /// Deferred computations run exactly once per call; the first failure
    /// aborts resolution.
    pub fn resolve(&self) -> Result<CognitoConfig, AuthError> {
        Ok(CognitoConfig {
            auth_domain: self.auth_domain.resolve("auth_domain")?,
            client_id: self.client_id.resolve("client_id")?,
            client_secret: self.client_secret.resolve("client_secret")?,
            user_pool_id: self.user_pool_id.resolve("user_pool_id")?,
            region: self.region.resolve("region")?,
            redirect_url: self.redirect_url.resolve("redirect_url")?,
        })
    }
}

fn require_env(name: &str) -> Result<String, AuthError> {
    env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AuthError::Config(format!("{name} environment variable is required")))
}

/// Resolved identity-provider configuration. Immutable per flow.
#[derive(Debug, Clone)]
pub struct CognitoConfig {
    /// Hosted-UI domain, without scheme (e.g. `"auth.example.com"`).
    pub auth_domain: String,
    /// App client id; the expected `aud` of every ID token.
    pub client_id: String,
    /// App client secret, sent via HTTP Basic auth on token exchange.
    pub client_secret: String,
    /// User pool id (e.g. `"us-east-1_AbCdEfGhI"`).
    pub user_pool_id: String,
    /// AWS region hosting the pool.
    pub region: String,
    /// Redirect URI registered with the app client.
    pub redirect_url: String,
}

impl CognitoConfig {
    /// Trusted issuer: `https://cognito-idp.{region}.amazonaws.com/{pool}`.
    pub fn issuer_url(&self) -> String {
        format!(
            "https://cognito-idp.{}.amazonaws.com/{}",
            self.region, self.user_pool_id
        )
    }

    /// Published signing keys for the pool.
    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer_url())
    }

    /// Hosted-UI authorization endpoint.
    pub fn authorize_url(&self) -> String {
        format!("https://{}/oauth2/authorize", self.auth_domain)
    }

    /// Token endpoint for the authorization-code exchange.
    pub fn token_url(&self) -> String {
        format!("https://{}/oauth2/token", self.auth_domain)
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn literal_settings() -> CognitoSettings {
        CognitoSettings {
            auth_domain: ConfigValue::literal("auth.example.com"),
            client_id: ConfigValue::literal("client-123"),
            client_secret: ConfigValue::literal("secret-456"),
            user_pool_id: ConfigValue::literal("us-east-1_TestPool"),
            region: ConfigValue::literal("us-east-1"),
            redirect_url: ConfigValue::literal("https://app.example.com/callback"),
        }
    }

    #[test]
    fn literal_values_resolve() {
        let config = literal_settings().resolve().expect("should resolve");
        assert_eq!(config.auth_domain, "auth.example.com");
        assert_eq!(config.client_id, "client-123");
        assert_eq!(config.region, "us-east-1");
    }

    #[test]
    fn deferred_value_is_evaluated_at_resolution() {
        let mut settings = literal_settings();
        settings.client_secret = ConfigValue::deferred(|| Ok("from-secret-store".to_string()));
        let config = settings.resolve().expect("should resolve");
        assert_eq!(config.client_secret, "from-secret-store");
    }

    #[test]
    fn deferred_failure_is_a_config_error() {
        let mut settings = literal_settings();
        settings.client_secret = ConfigValue::deferred(|| Err("vault unreachable".to_string()));
        let err = settings.resolve().unwrap_err();
        assert_eq!(
            err,
            AuthError::Config("client_secret: vault unreachable".to_string())
        );
    }

    #[test]
    fn issuer_is_derived_from_region_and_pool() {
        let config = literal_settings().resolve().unwrap();
        assert_eq!(
            config.issuer_url(),
            "https://cognito-idp.us-east-1.amazonaws.com/us-east-1_TestPool"
        );
    }

    #[test]
    fn jwks_url_is_under_well_known() {
        let config = literal_settings().resolve().unwrap();
        assert_eq!(
            config.jwks_url(),
            "https://cognito-idp.us-east-1.amazonaws.com/us-east-1_TestPool/.well-known/jwks.json"
        );
    }

    #[test]
    fn oauth2_endpoints_live_on_the_auth_domain() {
        let config = literal_settings().resolve().unwrap();
        assert_eq!(
            config.authorize_url(),
            "https://auth.example.com/oauth2/authorize"
        );
        assert_eq!(config.token_url(), "https://auth.example.com/oauth2/token");
    }

    const ENV_VARS: [&str; 6] = [
        "COGNITO_AUTH_DOMAIN",
        "COGNITO_CLIENT_ID",
        "COGNITO_CLIENT_SECRET",
        "COGNITO_USER_POOL_ID",
        "AWS_REGION",
        "COGNITO_REDIRECT_URL",
    ];

    fn clear_env() {
        for name in ENV_VARS {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn from_env_reads_all_variables() {
        clear_env();
        env::set_var("COGNITO_AUTH_DOMAIN", "auth.example.com");
        env::set_var("COGNITO_CLIENT_ID", "client-123");
        env::set_var("COGNITO_CLIENT_SECRET", "secret-456");
        env::set_var("COGNITO_USER_POOL_ID", "us-east-1_TestPool");
        env::set_var("AWS_REGION", "us-east-1");
        env::set_var("COGNITO_REDIRECT_URL", "https://app.example.com/callback");

        let config = CognitoSettings::from_env()
            .expect("should load")
            .resolve()
            .expect("should resolve");
        assert_eq!(config.user_pool_id, "us-east-1_TestPool");

        clear_env();
    }

    #[test]
    #[serial]
    fn from_env_names_the_missing_variable() {
        clear_env();
        env::set_var("COGNITO_AUTH_DOMAIN", "auth.example.com");

        let err = CognitoSettings::from_env().unwrap_err();
        assert_eq!(
            err,
            AuthError::Config("COGNITO_CLIENT_ID environment variable is required".to_string())
        );

        clear_env();
    }
}
