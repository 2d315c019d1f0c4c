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

//! End-to-end authorization-code flow.
//!
//! [`AuthFlowController`] owns the CSRF state lifecycle and sequences the
//! callback: state validation, code exchange, JWKS fetch, ID token
//! verification, and credentials assembly. The session store and HTTP
//! transport are injected at construction; production and test
//! implementations differ only there.

use chrono::Utc;
use oauth2::CsrfToken;
use serde_json::Value;
use url::Url;

use crate::config::CognitoConfig;
use crate::error::AuthError;
use crate::oauth::exchange::exchange_code;
use crate::oauth::jwks::fetch_key_set;
use crate::oauth::verify::{verify_id_token, Claims};
use crate::session::SessionStore;
use crate::transport::HttpTransport;

/// Scopes requested on every authorization redirect.
const SCOPES: &str = "openid profile email";

/// CSRF state entropy in bytes.
const STATE_LEN_BYTES: u32 = 32;

/// Where to send the user's browser to authenticate.
#[derive(Debug, Clone)]
pub struct RedirectInstruction {
    pub url: String,
}

/// Parameters received on the provider callback. Either may be absent; both
/// absences are defined error paths, not crashes.
#[derive(Debug, Clone, Default)]
pub struct CallbackParams {
    pub state: Option<String>,
    pub code: Option<String>,
}

/// Tokens issued for the authenticated user. Derived from the exchange
/// response, not authoritative — identity facts live in the claims.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Expiry as epoch seconds, only when the provider reported a lifetime.
    pub expires_at: Option<i64>,
    /// Whether `expires_at` is meaningful. Absence stays absent; it is never
    /// defaulted to zero.
    pub expires: bool,
}

/// A completed login: credentials plus the verified claims.
#[derive(Debug, Clone)]
pub struct AuthSuccess {
    pub credentials: Credentials,
    pub claims: Claims,
}

impl AuthSuccess {
    /// The user's login name: `cognito:username`, falling back to
    /// `username`, then `sub`.
    pub fn username(&self) -> Option<&str> {
        claim_username(&self.claims)
    }
}

fn claim_username(claims: &Claims) -> Option<&str> {
    ["cognito:username", "username", "sub"]
        .iter()
        .find_map(|key| claims.get(*key).and_then(Value::as_str))
}

// Session keys are namespaced under the caller's session handle.
fn csrf_key(session_id: &str) -> String {
    format!("{session_id}:oauth_state")
}

fn access_token_key(session_id: &str) -> String {
    format!("{session_id}:access_token")
}

fn refresh_token_key(session_id: &str) -> String {
    format!("{session_id}:refresh_token")
}

fn claims_key(session_id: &str) -> String {
    format!("{session_id}:id_claims")
}

/// Orchestrates one user's login attempt from redirect to verified claims.
pub struct AuthFlowController<S, T> {
    config: CognitoConfig,
    sessions: S,
    transport: T,
}

impl<S, T> AuthFlowController<S, T>
where
    S: SessionStore,
    T: HttpTransport,
{
    pub fn new(config: CognitoConfig, sessions: S, transport: T) -> Self {
        Self {
            config,
            sessions,
            transport,
        }
    }

    pub fn config(&self) -> &CognitoConfig {
        &self.config
    }

    /// Start a login: issue fresh CSRF state, persist it under the session
    /// handle, and build the authorization redirect.
    pub fn begin_auth(&self, session_id: &str) -> RedirectInstruction {
        let state = CsrfToken::new_random_len(STATE_LEN_BYTES);
        self.sessions.put(&csrf_key(session_id), state.secret());

        RedirectInstruction {
            url: build_authorize_url(&self.config, state.secret()),
        }
    }

    /// Handle the provider callback.
    ///
    /// The stored CSRF state is consumed on every path through here —
    /// a second callback with the same parameters fails with
    /// [`AuthError::StateMismatch`].
    pub async fn complete_auth(
        &self,
        session_id: &str,
        params: &CallbackParams,
    ) -> Result<AuthSuccess, AuthError> {
        let stored_state = self.sessions.take(&csrf_key(session_id));

        let state = params.state.as_deref().ok_or(AuthError::MissingState)?;
        match stored_state.as_deref() {
            Some(stored) if stored == state => {}
            _ => return Err(AuthError::StateMismatch),
        }

        let code = params.code.as_deref().ok_or(AuthError::MissingCode)?;

        let bundle = exchange_code(&self.transport, &self.config, code).await?;
        let key_set = fetch_key_set(&self.transport, &self.config).await?;
        let claims = verify_id_token(&bundle.id_token, &key_set, &self.config)?;

        let credentials = Credentials {
            access_token: bundle.access_token,
            refresh_token: bundle.refresh_token,
            expires_at: bundle.expires_in.map(|ttl| Utc::now().timestamp() + ttl),
            expires: bundle.expires_in.is_some(),
        };

        self.sessions
            .put(&access_token_key(session_id), &credentials.access_token);
        if let Some(refresh) = &credentials.refresh_token {
            self.sessions.put(&refresh_token_key(session_id), refresh);
        }
        self.sessions.put(
            &claims_key(session_id),
            &Value::Object(claims.clone()).to_string(),
        );

        tracing::info!(
            "Login verified for {}",
            claim_username(&claims).unwrap_or("<unknown>")
        );

        Ok(AuthSuccess {
            credentials,
            claims,
        })
    }

    /// Remove every flow-scoped session entry: CSRF state, stored tokens,
    /// and claims. Lifecycle hygiene, not security.
    pub fn cleanup(&self, session_id: &str) {
        self.sessions.remove(&csrf_key(session_id));
        self.sessions.remove(&access_token_key(session_id));
        self.sessions.remove(&refresh_token_key(session_id));
        self.sessions.remove(&claims_key(session_id));
    }
}

/// Build the hosted-UI authorization URL. Parameters are URL-encoded.
fn build_authorize_url(config: &CognitoConfig, state: &str) -> String {
    let mut url =
        Url::parse(&config.authorize_url()).expect("auth domain must form a valid URL");
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("response_type", "code");
        pairs.append_pair("client_id", &config.client_id);
        pairs.append_pair("redirect_uri", &config.redirect_url);
        pairs.append_pair("state", state);
        pairs.append_pair("scope", SCOPES);
    }
    url.to_string()
}
