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

//! Crate error type.
//!
//! Every failure is terminal for the current login attempt and is returned
//! as a value; nothing here panics. [`AuthError::InvalidIdentityToken`]
//! intentionally carries no detail: which verification check rejected a
//! token is not surfaced to callers.

use std::fmt;

/// Why an authentication flow attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Callback arrived without a `state` parameter.
    MissingState,
    /// Callback `state` does not match the stored value (or none was stored).
    StateMismatch,
    /// State validated but the callback carries no authorization code.
    MissingCode,
    /// Token endpoint returned non-200, was unreachable, or sent an
    /// unparsable body.
    TokenExchangeFailed(String),
    /// JWKS endpoint returned non-200, was unreachable, or sent an
    /// unparsable body.
    KeySetFetchFailed(String),
    /// Signature, audience, expiry, issuer, or usage check failed.
    InvalidIdentityToken,
    /// Missing or unresolvable configuration; the flow cannot start.
    Config(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingState => write!(f, "callback is missing the state parameter"),
            Self::StateMismatch => write!(f, "callback state does not match the stored value"),
            Self::MissingCode => write!(f, "callback is missing the authorization code"),
            Self::TokenExchangeFailed(detail) => write!(f, "token exchange failed: {detail}"),
            Self::KeySetFetchFailed(detail) => write!(f, "key set fetch failed: {detail}"),
            Self::InvalidIdentityToken => write!(f, "identity token rejected"),
            Self::Config(detail) => write!(f, "configuration error: {detail}"),
        }
    }
}

impl std::error::Error for AuthError {}
