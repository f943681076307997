// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-principal async locks.
//!
//! Re-key operations (passphrase change, recovery, account deletion) take
//! the write side; ordinary encrypt/decrypt traffic takes the read side.
//! This keeps a re-key from racing a concurrent decrypt that holds the
//! old key, without serializing unrelated principals against each other.

use std::collections::HashMap;
use std::sync::Arc;

use cofre_core::PrincipalId;
use tokio::sync::{Mutex, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

/// Registry of per-principal read/write locks.
#[derive(Default)]
pub struct PrincipalLocks {
    inner: Mutex<HashMap<i64, Arc<RwLock<()>>>>,
}

impl PrincipalLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lock_for(&self, principal: PrincipalId) -> Arc<RwLock<()>> {
        let mut map = self.inner.lock().await;
        Arc::clone(map.entry(principal.0).or_default())
    }

    /// Shared access: ordinary vault operations.
    pub async fn read(&self, principal: PrincipalId) -> OwnedRwLockReadGuard<()> {
        self.lock_for(principal).await.read_owned().await
    }

    /// Exclusive access: re-key and deletion.
    pub async fn write(&self, principal: PrincipalId) -> OwnedRwLockWriteGuard<()> {
        self.lock_for(principal).await.write_owned().await
    }
}
