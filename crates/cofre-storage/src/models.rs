// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for the storage tables.
//!
//! These mirror the SQLite schema one to one. Higher-level domain types
//! (`DomainRef`, `EncryptedField`, the id newtypes) live in `cofre-core`;
//! the service layer converts between the two.

/// Row in `principals`.
#[derive(Debug, Clone)]
pub struct PrincipalRow {
    pub id: i64,
    pub username: String,
    pub verification_hash: String,
    /// Base64 of the 32-byte salt.
    pub salt: String,
    pub recovery_hash: Option<String>,
    pub parent_id: Option<i64>,
    pub created_at: String,
}

/// Row in `sessions`.
///
/// Debug output omits the cached key.
#[derive(Clone)]
pub struct SessionRow {
    pub token: String,
    pub principal_id: i64,
    /// Base64 of the caller's personal vault key.
    pub key_b64: String,
    pub created_at: String,
    pub last_used_at: String,
}

impl std::fmt::Debug for SessionRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRow")
            .field("token", &self.token)
            .field("principal_id", &self.principal_id)
            .field("key_b64", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("last_used_at", &self.last_used_at)
            .finish()
    }
}

/// Row in `group_domains`.
///
/// Debug output omits the group key.
#[derive(Clone)]
pub struct GroupDomainRow {
    pub id: i64,
    pub owner_id: i64,
    /// Base64 of the 32-byte group key.
    pub key_b64: String,
    pub created_at: String,
}

impl std::fmt::Debug for GroupDomainRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupDomainRow")
            .field("id", &self.id)
            .field("owner_id", &self.owner_id)
            .field("key_b64", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Row in `entries`. Ciphertext and nonce are base64.
#[derive(Debug, Clone)]
pub struct EntryRow {
    pub id: i64,
    /// One of `personal`, `group`, `child` (CHECK-constrained).
    pub domain_kind: String,
    pub domain_id: i64,
    pub label: String,
    pub ciphertext: String,
    pub nonce: String,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_row_debug_redacts_key() {
        let row = SessionRow {
            token: "tok".to_string(),
            principal_id: 1,
            key_b64: "c2VjcmV0".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            last_used_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        let debug = format!("{row:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("c2VjcmV0"));
    }

    #[test]
    fn group_row_debug_redacts_key() {
        let row = GroupDomainRow {
            id: 1,
            owner_id: 2,
            key_b64: "Z3JvdXBrZXk".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        let debug = format!("{row:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("Z3JvdXBrZXk"));
    }
}
