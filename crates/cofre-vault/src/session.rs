// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session key cache.
//!
//! A session binds an unguessable token to a principal and that
//! principal's personal vault key, so one login derivation serves every
//! request until logout or expiry. The cache is backed by the `sessions`
//! table; revoking a session deletes the row and with it the only
//! persisted copy of the key outside memory.

use cofre_config::SessionConfig;
use cofre_core::{CofreError, PrincipalId, SessionToken};
use cofre_crypto::{KEY_SIZE, key_from_b64, key_to_b64};
use cofre_storage::Database;
use cofre_storage::queries::sessions;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// An authenticated caller: the session's principal plus the cached
/// personal vault key.
pub struct Caller {
    pub principal_id: PrincipalId,
    pub key: Zeroizing<[u8; KEY_SIZE]>,
}

impl std::fmt::Debug for Caller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Caller")
            .field("principal_id", &self.principal_id)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Token-to-key cache over the `sessions` table.
pub struct SessionKeyCache<'a> {
    db: &'a Database,
    idle_timeout_secs: u64,
}

impl<'a> SessionKeyCache<'a> {
    pub fn new(db: &'a Database, config: &SessionConfig) -> Self {
        Self {
            db,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }

    /// Create a session for a principal, caching its personal key.
    pub async fn create(
        &self,
        principal: PrincipalId,
        key: &[u8; KEY_SIZE],
    ) -> Result<SessionToken, CofreError> {
        let token = cofre_crypto::generate_session_token()?;
        sessions::create_session(self.db, token.as_str(), principal.0, &key_to_b64(key)).await?;
        info!(principal = principal.0, token = %token.preview(), "session created");
        Ok(token)
    }

    /// Resolve a token to an authenticated caller.
    ///
    /// Unknown and idle-expired tokens both surface as
    /// [`CofreError::Unauthenticated`]; the caller cannot tell them apart.
    pub async fn resolve(&self, token: &SessionToken) -> Result<Caller, CofreError> {
        let row = sessions::resolve_session(self.db, token.as_str(), self.idle_timeout_secs)
            .await?
            .ok_or(CofreError::Unauthenticated)?;
        let key = key_from_b64(&row.key_b64)?;
        Ok(Caller {
            principal_id: PrincipalId(row.principal_id),
            key,
        })
    }

    /// Revoke one session. Revoking an already-gone token is not an error.
    pub async fn revoke(&self, token: &SessionToken) -> Result<(), CofreError> {
        let existed = sessions::delete_session(self.db, token.as_str()).await?;
        debug!(token = %token.preview(), existed, "session revoked");
        Ok(())
    }

    /// Revoke every session a principal holds.
    pub async fn revoke_all(&self, principal: PrincipalId) -> Result<usize, CofreError> {
        let count = sessions::delete_sessions_for_principal(self.db, principal.0).await?;
        info!(principal = principal.0, count, "all sessions revoked");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup() -> (Database, PrincipalId, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();
        let id = cofre_storage::queries::principals::create_principal(&db, "u", "h", "s", None, None)
            .await
            .unwrap();
        (db, PrincipalId(id), dir)
    }

    fn config() -> SessionConfig {
        SessionConfig::default()
    }

    #[tokio::test]
    async fn create_resolve_revoke_cycle() {
        let (db, principal, _dir) = setup().await;
        let cache = SessionKeyCache::new(&db, &config());
        let key = [7u8; KEY_SIZE];

        let token = cache.create(principal, &key).await.unwrap();
        let caller = cache.resolve(&token).await.unwrap();
        assert_eq!(caller.principal_id, principal);
        assert_eq!(*caller.key, key);

        cache.revoke(&token).await.unwrap();
        let result = cache.resolve(&token).await;
        assert!(matches!(result, Err(CofreError::Unauthenticated)));
    }

    #[tokio::test]
    async fn unknown_token_is_unauthenticated() {
        let (db, _principal, _dir) = setup().await;
        let cache = SessionKeyCache::new(&db, &config());
        let result = cache.resolve(&SessionToken::new("bogus")).await;
        assert!(matches!(result, Err(CofreError::Unauthenticated)));
    }

    #[tokio::test]
    async fn revoke_all_clears_every_session() {
        let (db, principal, _dir) = setup().await;
        let cache = SessionKeyCache::new(&db, &config());
        let key = [1u8; KEY_SIZE];

        let t1 = cache.create(principal, &key).await.unwrap();
        let t2 = cache.create(principal, &key).await.unwrap();
        assert_ne!(t1, t2);

        let revoked = cache.revoke_all(principal).await.unwrap();
        assert_eq!(revoked, 2);
        assert!(cache.resolve(&t1).await.is_err());
        assert!(cache.resolve(&t2).await.is_err());
    }

    #[tokio::test]
    async fn caller_debug_redacts_key() {
        let (db, principal, _dir) = setup().await;
        let cache = SessionKeyCache::new(&db, &config());
        let token = cache.create(principal, &[9u8; KEY_SIZE]).await.unwrap();
        let caller = cache.resolve(&token).await.unwrap();
        assert!(format!("{caller:?}").contains("[REDACTED]"));
    }
}
