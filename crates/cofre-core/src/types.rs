// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Cofre workspace.

use serde::{Deserialize, Serialize};

/// Unique identifier of a principal (a full user or a child sub-account).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub i64);

/// Unique identifier of a group vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub i64);

/// Unique identifier of a stored encrypted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub i64);

/// Opaque, unguessable session token (32 random bytes, URL-safe base64).
///
/// Debug output is truncated so tokens never land in logs whole.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines; useless for resolving the session.
    pub fn preview(&self) -> &str {
        &self.0[..self.0.len().min(8)]
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionToken({}…)", self.preview())
    }
}

/// An independent encryption-key scope.
///
/// Every encrypt/decrypt operation names exactly one domain; the key
/// domain registry is the only component that turns a `DomainRef` into
/// key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DomainRef {
    /// A principal's own vault; key lives only in that principal's sessions.
    Personal(PrincipalId),
    /// A shared group vault; key is stored with the group record.
    Group(GroupId),
    /// A child sub-account vault; key is re-derived deterministically.
    Child(PrincipalId),
}

/// One authenticated-encryption output: ciphertext and the nonce that
/// produced it, both base64. The pair is stored and moved together; a
/// nonce is used for exactly one encryption call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedField {
    pub ciphertext: String,
    pub nonce: String,
}
