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

//! OAuth2 authorization-code client for AWS Cognito user pools.
//!
//! This crate drives the server side of an authorization-code login:
//! redirect the user to the pool's hosted UI, validate the CSRF state on
//! callback, exchange the authorization code for tokens, and
//! cryptographically verify the returned ID token against the pool's JWKS
//! before trusting any claim inside it.
//!
//! The hosting web framework and the HTTP client are collaborators, not
//! dependencies: handlers hand the [`flow::AuthFlowController`] a
//! [`session::SessionStore`] for CSRF state and a
//! [`transport::HttpTransport`] for provider round-trips.

pub mod config;
pub mod error;
pub mod flow;
pub mod oauth;
pub mod session;
pub mod transport;
