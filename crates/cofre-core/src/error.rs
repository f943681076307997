// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Cofre credential vault.

use thiserror::Error;

/// The primary error type used across all Cofre crates.
///
/// The first five variants form the security taxonomy: they are surfaced
/// to callers verbatim and are never retried internally. The remaining
/// variants cover the ambient stack (config, storage, input validation).
#[derive(Debug, Error)]
pub enum CofreError {
    /// No session, or the session token is unknown or expired.
    #[error("not authenticated: missing, unknown or expired session")]
    Unauthenticated,

    /// Authenticated, but not authorized for the requested domain.
    #[error("forbidden: caller is not authorized for this key domain")]
    Forbidden,

    /// Bad passphrase or recovery code.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Ciphertext failed its integrity check. Treated as a security event;
    /// never retried with a different key.
    #[error("decryption failed: ciphertext did not authenticate")]
    AuthenticationFailure,

    /// A broken internal invariant (wrong key or salt length, corrupted
    /// stored key material). Programming or corruption error, not a
    /// user-facing condition.
    #[error("fatal invariant violation: {0}")]
    Fatal(String),

    /// Referenced principal, group, session or entry does not exist.
    #[error("{what} not found")]
    NotFound { what: String },

    /// Rejected input (policy checks such as minimum passphrase length).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors (invalid TOML, missing fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CofreError {
    /// Shorthand for `NotFound` with an owned description.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Wrap any error as a storage failure.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_variants_render_without_detail_leakage() {
        // Authn/authz errors must not carry caller-controlled detail that
        // could echo secrets back out.
        assert_eq!(
            CofreError::Unauthenticated.to_string(),
            "not authenticated: missing, unknown or expired session"
        );
        assert_eq!(CofreError::InvalidCredentials.to_string(), "invalid credentials");
        assert!(!CofreError::AuthenticationFailure.to_string().contains("key"));
    }

    #[test]
    fn storage_wraps_source_error() {
        let err = CofreError::storage(std::io::Error::other("disk gone"));
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn not_found_names_the_missing_thing() {
        let err = CofreError::not_found("principal");
        assert_eq!(err.to_string(), "principal not found");
    }
}
