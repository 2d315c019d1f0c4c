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

//! ID token verification.
//!
//! The verifier pins the algorithm to RS256 — the token header is never
//! trusted to choose it — and derives the expected issuer and audience from
//! configuration, never from the token under test. Every rejection collapses
//! to [`AuthError::InvalidIdentityToken`]; callers learn that a token was
//! rejected, not why.

use std::collections::HashSet;

use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, Validation};
use serde_json::Value;

use crate::config::CognitoConfig;
use crate::error::AuthError;

use super::jwks::KeySet;

/// Claims of a verified ID token, as the full payload object.
pub type Claims = serde_json::Map<String, Value>;

/// Token usages Cognito stamps into `token_use`.
const VALID_TOKEN_USES: [&str; 2] = ["id", "access"];

/// Verify a token's signature against the key set and validate its claims.
///
/// Keys are tried in set order; the first that proves the signature wins.
/// On success the full claims map is returned, so callers can read identity
/// fields such as `cognito:username` beyond the validated ones.
pub fn verify_id_token(
    token: &str,
    key_set: &KeySet,
    config: &CognitoConfig,
) -> Result<Claims, AuthError> {
    verify_id_token_at(token, key_set, config, Utc::now().timestamp())
}

/// Signature-only validation: RS256 pinned, claim checks done by hand below
/// so their semantics are exact (strict expiry, zero leeway, string `aud`).
fn signature_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();
    validation
}

fn verify_id_token_at(
    token: &str,
    key_set: &KeySet,
    config: &CognitoConfig,
    now: i64,
) -> Result<Claims, AuthError> {
    let validation = signature_validation();

    let mut verified = None;
    for key in &key_set.keys {
        match decode::<Claims>(token, &key.decoding_key, &validation) {
            Ok(data) => {
                verified = Some(data.claims);
                break;
            }
            Err(_) => continue,
        }
    }
    let claims = verified.ok_or(AuthError::InvalidIdentityToken)?;

    let aud = claims.get("aud").and_then(Value::as_str);
    if aud != Some(config.client_id.as_str()) {
        return Err(AuthError::InvalidIdentityToken);
    }

    let exp = claims
        .get("exp")
        .and_then(Value::as_i64)
        .ok_or(AuthError::InvalidIdentityToken)?;
    if exp <= now {
        return Err(AuthError::InvalidIdentityToken);
    }

    let issuer = config.issuer_url();
    let iss = claims.get("iss").and_then(Value::as_str);
    if iss != Some(issuer.as_str()) {
        return Err(AuthError::InvalidIdentityToken);
    }

    let token_use = claims.get("token_use").and_then(Value::as_str);
    if !token_use.is_some_and(|u| VALID_TOKEN_USES.contains(&u)) {
        return Err(AuthError::InvalidIdentityToken);
    }

    Ok(claims)
}
