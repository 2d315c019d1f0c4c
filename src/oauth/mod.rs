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

//! OAuth2/OIDC protocol pieces: authorization-code exchange, JWKS
//! retrieval, and ID token verification.

pub mod exchange;
pub mod jwks;
pub mod verify;

pub use exchange::{exchange_code, TokenBundle};
pub use jwks::{fetch_key_set, KeySet, SigningKey};
pub use verify::{verify_id_token, Claims};
