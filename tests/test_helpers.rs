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

//! Shared test helpers: a canned-response HTTP transport and an in-process
//! "identity provider" that signs real RS256 tokens and publishes its key.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rsa::traits::PublicKeyParts;
use serde_json::{json, Value};

use cognito_auth::config::{CognitoConfig, CognitoSettings, ConfigValue};
use cognito_auth::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Transport double: canned responses keyed by URL, with a request recorder.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, (u16, String)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `status`/`body` for any request to `url`.
    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.to_string()));
    }

    /// Every request executed so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let responses = self.responses.lock().unwrap();
        match responses.get(&request.url) {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                headers: Vec::new(),
                body: body.clone(),
            }),
            None => Err(TransportError(format!(
                "connection refused: {}",
                request.url
            ))),
        }
    }
}

/// A signing identity: private key for issuing tokens, public JWK
/// components for the key-set document.
pub struct TestIdp {
    pub encoding: EncodingKey,
    pub kid: String,
    pub n: String,
    pub e: String,
}

impl TestIdp {
    pub fn new(kid: &str) -> Self {
        use rsa::pkcs8::EncodePrivateKey;
        use rsa::RsaPrivateKey;

        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).unwrap();
        let priv_pem = private_key
            .to_pkcs8_pem(rsa::pkcs8::LineEnding::LF)
            .unwrap();
        let encoding = EncodingKey::from_rsa_pem(priv_pem.as_bytes()).unwrap();

        let public_key = private_key.to_public_key();
        let n = URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be());
        let e = URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be());

        Self {
            encoding,
            kid: kid.to_string(),
            n,
            e,
        }
    }

    /// Sign `claims` as an RS256 JWT carrying this key's `kid`.
    pub fn sign(&self, claims: &Value) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.kid.clone());
        encode(&header, claims, &self.encoding).unwrap()
    }

    /// This key's entry for a JWKS document.
    pub fn jwk(&self) -> Value {
        json!({
            "kid": self.kid,
            "kty": "RSA",
            "alg": "RS256",
            "use": "sig",
            "n": self.n,
            "e": self.e,
        })
    }
}

/// A JWKS document body for the given keys, in order.
pub fn jwks_body(idps: &[&TestIdp]) -> String {
    json!({ "keys": idps.iter().map(|i| i.jwk()).collect::<Vec<_>>() }).to_string()
}

/// A token-endpoint success body.
pub fn token_body(id_token: &str, refresh_token: Option<&str>, expires_in: Option<i64>) -> String {
    let mut body = json!({
        "access_token": "test-access-token",
        "id_token": id_token,
        "token_type": "Bearer",
    });
    if let Some(refresh) = refresh_token {
        body["refresh_token"] = json!(refresh);
    }
    if let Some(ttl) = expires_in {
        body["expires_in"] = json!(ttl);
    }
    body.to_string()
}

pub fn test_config() -> CognitoConfig {
    CognitoSettings {
        auth_domain: ConfigValue::literal("auth.example.com"),
        client_id: ConfigValue::literal("my-client-id"),
        client_secret: ConfigValue::literal("my-client-secret"),
        user_pool_id: ConfigValue::literal("us-east-1_TestPool"),
        region: ConfigValue::literal("us-east-1"),
        redirect_url: ConfigValue::literal("https://app.example.com/callback"),
    }
    .resolve()
    .expect("test settings are all literals")
}

/// Claims that pass every verification check against [`test_config`].
pub fn valid_claims(config: &CognitoConfig) -> Value {
    json!({
        "aud": config.client_id,
        "exp": chrono::Utc::now().timestamp() + 3600,
        "iss": config.issuer_url(),
        "token_use": "id",
        "cognito:username": "alice",
        "email": "alice@example.com",
    })
}
