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

//! Authorization code → token exchange.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use crate::config::CognitoConfig;
use crate::error::AuthError;
use crate::transport::{HttpRequest, HttpTransport};

/// Raw response from the token endpoint.
///
/// `id_token` is required: a 200 without one is a malformed exchange
/// response, not a success with a missing extra.
#[derive(Debug, Deserialize, Clone)]
pub struct TokenBundle {
    pub access_token: String,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Exchange an authorization code for tokens.
///
/// POSTs `grant_type=authorization_code` to the pool's token endpoint with
/// HTTP Basic client authentication. Success is exactly HTTP 200 with a
/// parseable JSON body; anything else fails the flow attempt — no retry.
pub async fn exchange_code<T: HttpTransport>(
    transport: &T,
    config: &CognitoConfig,
    authorization_code: &str,
) -> Result<TokenBundle, AuthError> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", "authorization_code")
        .append_pair("code", authorization_code)
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_url)
        .finish();

    let credentials = STANDARD.encode(format!("{}:{}", config.client_id, config.client_secret));

    let request = HttpRequest::post(config.token_url(), body)
        .header("Authorization", format!("Basic {credentials}"))
        .header("Content-Type", "application/x-www-form-urlencoded");

    let response = transport
        .execute(request)
        .await
        .map_err(|e| AuthError::TokenExchangeFailed(format!("token request failed: {e}")))?;

    if response.status != 200 {
        tracing::error!(
            "Token exchange failed. Status: {}, Body: {}",
            response.status,
            response.body
        );
        return Err(AuthError::TokenExchangeFailed(format!(
            "token endpoint returned HTTP {}",
            response.status
        )));
    }

    serde_json::from_str(&response.body)
        .map_err(|e| AuthError::TokenExchangeFailed(format!("unparsable token response: {e}")))
}
