//! Bearer credential for the `Authorization` header.

use std::fmt;

use http::HeaderValue;

use crate::error::{ClientError, ClientResult};

const BEARER_PREFIX: &str = "Bearer ";

/// A bearer token. Its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Accepts a raw token or one already prefixed with `Bearer `.
    pub fn new(token: &str) -> ClientResult<Self> {
        let token = token.trim();
        let token = match token.get(..BEARER_PREFIX.len() - 1) {
            Some(scheme) if scheme.eq_ignore_ascii_case(BEARER_PREFIX.trim_end()) => {
                let rest = &token[scheme.len()..];
                // "Bearer" alone, or "Bearer <token>"; "Bearerxyz" is a raw token.
                if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                    rest.trim()
                } else {
                    token
                }
            }
            _ => token,
        };
        if token.is_empty() {
            return Err(ClientError::Config("bearer token must not be empty".to_string()));
        }
        if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ClientError::Config(
                "bearer token must not contain whitespace".to_string(),
            ));
        }
        Ok(Self(token.to_string()))
    }

    /// `Bearer <token>`, marked sensitive so it is kept out of HPACK tables
    /// and debug output.
    pub fn header_value(&self) -> ClientResult<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("{BEARER_PREFIX}{}", self.0))
            .map_err(|e| ClientError::Config(format!("invalid bearer token: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}
