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

//! JWKS (JSON Web Key Set) retrieval.
//!
//! Keys are fetched fresh for every verification — key-rotation correctness
//! outranks the round-trip cost here, so there is no cache to go stale.

use std::fmt;

use jsonwebtoken::DecodingKey;
use serde::Deserialize;

use crate::config::CognitoConfig;
use crate::error::AuthError;
use crate::transport::{HttpRequest, HttpTransport};

/// A JWK entry from the JWKS endpoint.
#[derive(Debug, Deserialize)]
struct JwkEntry {
    #[serde(default)]
    kid: Option<String>,
    kty: String,
    #[serde(default)]
    alg: Option<String>,
    // RSA components
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwksDocument {
    keys: Vec<JwkEntry>,
}

/// One signing key from the pool's published set.
pub struct SigningKey {
    /// Key identifier, when the entry carries one. Verification does not
    /// depend on it — keys are tried in set order.
    pub kid: Option<String>,
    /// Algorithm declared by the entry, informational only.
    pub algorithm: Option<String>,
    /// Prepared RSA public key material.
    pub decoding_key: DecodingKey,
}

// DecodingKey has no Debug impl; render the identifying fields only.
impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// The pool's current signing keys, in document order.
#[derive(Debug)]
pub struct KeySet {
    pub keys: Vec<SigningKey>,
}

/// Fetch the pool's JWKS document.
///
/// Success is exactly HTTP 200 with a body parseable into a key list.
/// Non-RSA entries and entries without both components are skipped; RSA
/// components that fail to decode mean the document is malformed.
pub async fn fetch_key_set<T: HttpTransport>(
    transport: &T,
    config: &CognitoConfig,
) -> Result<KeySet, AuthError> {
    let response = transport
        .execute(HttpRequest::get(config.jwks_url()))
        .await
        .map_err(|e| AuthError::KeySetFetchFailed(format!("JWKS request failed: {e}")))?;

    if response.status != 200 {
        tracing::error!(
            "JWKS fetch failed. Status: {}, Body: {}",
            response.status,
            response.body
        );
        return Err(AuthError::KeySetFetchFailed(format!(
            "JWKS endpoint returned HTTP {}",
            response.status
        )));
    }

    let document: JwksDocument = serde_json::from_str(&response.body)
        .map_err(|e| AuthError::KeySetFetchFailed(format!("unparsable JWKS document: {e}")))?;

    let mut keys = Vec::with_capacity(document.keys.len());
    for entry in document.keys {
        if entry.kty != "RSA" {
            continue;
        }
        let (n, e) = match (entry.n.as_deref(), entry.e.as_deref()) {
            (Some(n), Some(e)) if !n.is_empty() && !e.is_empty() => (n, e),
            _ => continue,
        };
        let decoding_key = DecodingKey::from_rsa_components(n, e)
            .map_err(|e| AuthError::KeySetFetchFailed(format!("invalid RSA JWK: {e}")))?;
        keys.push(SigningKey {
            kid: entry.kid,
            algorithm: entry.alg,
            decoding_key,
        });
    }

    Ok(KeySet { keys })
}
