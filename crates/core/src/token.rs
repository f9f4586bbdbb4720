//! QR token code generation and lifetime policy.

use chrono::Duration;
use rand::Rng;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prefix carried by every token code, so scanned payloads are recognizable.
pub const TOKEN_PREFIX: &str = "QR-";

/// Number of random alphanumeric characters after [`TOKEN_PREFIX`].
pub const TOKEN_RANDOM_LENGTH: usize = 24;

/// Default token lifetime in seconds.
pub const DEFAULT_TTL_SECS: i64 = 120;

/// Shortest accepted token lifetime in seconds.
pub const MIN_TTL_SECS: i64 = 30;

/// Longest accepted token lifetime in seconds.
pub const MAX_TTL_SECS: i64 = 600;

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate a fresh token code from the thread-local CSPRNG.
///
/// Codes are shown on screen as QR images, so they must not be guessable
/// from earlier codes.
pub fn generate_token_code() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_RANDOM_LENGTH)
        .map(char::from)
        .collect();

    format!("{TOKEN_PREFIX}{suffix}")
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Lifetime policy applied to newly issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    ttl_secs: i64,
}

impl TokenPolicy {
    /// Build a policy, rejecting lifetimes outside `MIN_TTL_SECS..=MAX_TTL_SECS`.
    pub fn new(ttl_secs: i64) -> Result<Self, CoreError> {
        if !(MIN_TTL_SECS..=MAX_TTL_SECS).contains(&ttl_secs) {
            return Err(CoreError::Validation(format!(
                "Token TTL must be between {MIN_TTL_SECS} and {MAX_TTL_SECS} seconds, got {ttl_secs}"
            )));
        }
        Ok(Self { ttl_secs })
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Expiry of a token issued at `issued_at`.
    pub fn expires_at(&self, issued_at: Timestamp) -> Timestamp {
        issued_at + Duration::seconds(self.ttl_secs)
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}
