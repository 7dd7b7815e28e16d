//! Bearer-token authentication.
//!
//! Both the configured secret and the presented token are hashed to a fixed
//! 32-byte digest before comparison, so `subtle::ConstantTimeEq` sees equal
//! lengths and the comparison time does not depend on where they differ.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::domain::config::AgentConfig;
use crate::domain::error::AuthFailure;

const SCHEME: &str = "bearer";

/// Validates `Authorization` header values against the configured secret.
#[derive(Clone)]
pub struct Authenticator {
    /// `None` when no token is configured: nothing is ever authorized.
    expected: Option<[u8; 32]>,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("configured", &self.expected.is_some())
            .finish()
    }
}

impl Authenticator {
    #[must_use]
    pub fn new(token: &str) -> Self {
        let expected = (!token.is_empty()).then(|| digest(token));
        Self { expected }
    }

    #[must_use]
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(&config.auth.token)
    }

    /// Check a raw header value (`None` when the header is absent).
    ///
    /// # Errors
    ///
    /// Returns the [`AuthFailure`] describing why the header was refused.
    pub fn verify(&self, header: Option<&str>) -> Result<(), AuthFailure> {
        let value = header.ok_or(AuthFailure::Missing)?;
        let presented = bearer_token(value).ok_or(AuthFailure::Malformed)?;
        let expected = self.expected.as_ref().ok_or(AuthFailure::NotConfigured)?;

        if bool::from(digest(presented).ct_eq(expected)) {
            Ok(())
        } else {
            Err(AuthFailure::InvalidToken)
        }
    }

    #[must_use]
    pub fn is_authorized(&self, header: Option<&str>) -> bool {
        self.verify(header).is_ok()
    }
}

/// Extract `<token>` from `Bearer <token>`. The scheme is case-insensitive,
/// the token is taken verbatim.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(SCHEME) || token.is_empty() {
        return None;
    }
    Some(token)
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}
