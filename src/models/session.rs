// src/models/session.rs
// DOCUMENTATION: Caller session passed explicitly through discovery
// PURPOSE: Extract the bearer token from each request instead of ambient state

use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest};
use std::fmt;
use std::future::{ready, Ready};

use crate::errors::DiscoveryError;

/// Authenticated caller context
/// DOCUMENTATION: Built from `Authorization: Bearer <token>`. The token is
/// opaque here; the auth backend owns its meaning.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionContext {
    token: String,
}

impl SessionContext {
    pub fn new(token: impl Into<String>) -> Result<Self, DiscoveryError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(DiscoveryError::Unauthorized);
        }
        Ok(Self { token })
    }

    /// Parse an Authorization header value
    pub fn from_authorization(value: Option<&str>) -> Result<Self, DiscoveryError> {
        let value = value.ok_or(DiscoveryError::Unauthorized)?.trim();
        let token = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("bearer "))
            .ok_or(DiscoveryError::Unauthorized)?;
        Self::new(token.trim())
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// Never print the token itself
impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl FromRequest for SessionContext {
    type Error = DiscoveryError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        ready(Self::from_authorization(value))
    }
}
