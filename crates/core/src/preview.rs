//! Preview grant generation and verification.
//!
//! A preview grant lets anyone holding the token read a site's latest draft
//! until the grant expires. Only the SHA-256 digest of the token is stored;
//! the plaintext is handed to the operator once at issue time.

use chrono::Duration;
use rand::Rng;

use crate::error::CoreError;
use crate::hashing::{constant_time_eq, sha256_hex};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of the generated preview token (alphanumeric characters).
pub const TOKEN_LENGTH: usize = 40;

/// Shortest grant an operator may issue.
pub const MIN_TTL_SECS: i64 = 60;

/// Longest grant an operator may issue (30 days).
pub const MAX_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Grant lifetime when the caller does not ask for one (24 hours).
pub const DEFAULT_TTL_SECS: i64 = 24 * 60 * 60;

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// A freshly generated preview token.
pub struct GeneratedToken {
    /// The plaintext token (returned to the caller once, never stored).
    pub plaintext: String,
    /// SHA-256 hex digest of the plaintext (stored on the site row).
    pub hash: String,
}

/// Generate a new unpredictable preview token from the thread RNG.
pub fn generate_token() -> GeneratedToken {
    let plaintext: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();
    let hash = hash_token(&plaintext);
    GeneratedToken { plaintext, hash }
}

/// Compute the stored digest of a preview token.
pub fn hash_token(token: &str) -> String {
    sha256_hex(token.as_bytes())
}

// ---------------------------------------------------------------------------
// Lifetime
// ---------------------------------------------------------------------------

/// Validate a requested grant lifetime in seconds.
pub fn validate_ttl_secs(ttl_secs: i64) -> Result<Duration, CoreError> {
    if !(MIN_TTL_SECS..=MAX_TTL_SECS).contains(&ttl_secs) {
        return Err(CoreError::Validation(format!(
            "Preview TTL must be between {MIN_TTL_SECS} and {MAX_TTL_SECS} seconds, got {ttl_secs}"
        )));
    }
    Ok(Duration::seconds(ttl_secs))
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Check a supplied token against the grant stored on a site.
///
/// A missing grant or a digest mismatch is [`CoreError::TokenInvalid`]; a
/// matching token past its expiry is [`CoreError::TokenExpired`]. The grant
/// is still valid at exactly `expires_at`.
pub fn check_grant(
    stored_hash: Option<&str>,
    expires_at: Option<Timestamp>,
    supplied: &str,
    now: Timestamp,
) -> Result<(), CoreError> {
    let (Some(stored_hash), Some(expires_at)) = (stored_hash, expires_at) else {
        return Err(CoreError::TokenInvalid);
    };
    if supplied.is_empty() || !constant_time_eq(stored_hash, &hash_token(supplied)) {
        return Err(CoreError::TokenInvalid);
    }
    if now > expires_at {
        return Err(CoreError::TokenExpired);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
