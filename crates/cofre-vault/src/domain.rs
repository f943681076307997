// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key domain registry.
//!
//! [`KeyDomainRegistry::resolve`] is the single place where a `DomainRef`
//! becomes key material, and it fuses the authorization check into the
//! same call. Nothing else in the workspace hands out domain keys, so an
//! operation that bypasses authorization simply has no key to work with.

use cofre_config::KdfConfig;
use cofre_core::{CofreError, DomainRef};
use cofre_crypto::{KEY_SIZE, derive_child_key, key_from_b64, salt_from_b64};
use cofre_storage::Database;
use cofre_storage::queries::{groups, principals};
use zeroize::Zeroizing;

use crate::session::Caller;

/// The `domain_kind` column value for each domain variant.
pub fn domain_kind(domain: DomainRef) -> &'static str {
    match domain {
        DomainRef::Personal(_) => "personal",
        DomainRef::Group(_) => "group",
        DomainRef::Child(_) => "child",
    }
}

/// The `domain_id` column value for each domain variant.
pub fn domain_id(domain: DomainRef) -> i64 {
    match domain {
        DomainRef::Personal(id) | DomainRef::Child(id) => id.0,
        DomainRef::Group(id) => id.0,
    }
}

/// Reconstruct a `DomainRef` from its stored representation.
pub fn domain_from_parts(kind: &str, id: i64) -> Result<DomainRef, CofreError> {
    match kind {
        "personal" => Ok(DomainRef::Personal(cofre_core::PrincipalId(id))),
        "group" => Ok(DomainRef::Group(cofre_core::GroupId(id))),
        "child" => Ok(DomainRef::Child(cofre_core::PrincipalId(id))),
        other => Err(CofreError::Fatal(format!(
            "unknown stored domain kind: {other}"
        ))),
    }
}

/// Authorization-fused key resolution for all three domain kinds.
pub struct KeyDomainRegistry<'a> {
    db: &'a Database,
    kdf: &'a KdfConfig,
}

impl<'a> KeyDomainRegistry<'a> {
    pub fn new(db: &'a Database, kdf: &'a KdfConfig) -> Self {
        Self { db, kdf }
    }

    /// Resolve a domain to its key on behalf of `caller`.
    ///
    /// - Personal: only the owning principal's own sessions; the key comes
    ///   from the session, never from storage.
    /// - Group: current members only; the key comes from the group record.
    /// - Child: the child itself or its registered parent; the key is
    ///   re-derived deterministically and never stored.
    pub async fn resolve(
        &self,
        caller: &Caller,
        domain: DomainRef,
    ) -> Result<Zeroizing<[u8; KEY_SIZE]>, CofreError> {
        match domain {
            DomainRef::Personal(principal) => {
                if principal != caller.principal_id {
                    return Err(CofreError::Forbidden);
                }
                Ok(caller.key.clone())
            }
            DomainRef::Group(group) => {
                let record = groups::get_group(self.db, group.0)
                    .await?
                    .ok_or_else(|| CofreError::not_found("group"))?;
                if !groups::is_member(self.db, group.0, caller.principal_id.0).await? {
                    return Err(CofreError::Forbidden);
                }
                key_from_b64(&record.key_b64)
            }
            DomainRef::Child(child) => {
                let record = principals::get_principal(self.db, child.0)
                    .await?
                    .ok_or_else(|| CofreError::not_found("child principal"))?;
                let parent_id = record.parent_id.ok_or(CofreError::Forbidden)?;
                let authorized =
                    caller.principal_id.0 == child.0 || caller.principal_id.0 == parent_id;
                if !authorized {
                    return Err(CofreError::Forbidden);
                }
                let salt = salt_from_b64(&record.salt)?;
                derive_child_key(parent_id, child.0, &salt, self.kdf)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cofre_core::{GroupId, PrincipalId};
    use cofre_crypto::{generate_salt, salt_to_b64};
    use tempfile::tempdir;

    struct Fixture {
        db: Database,
        kdf: KdfConfig,
        parent: PrincipalId,
        child: PrincipalId,
        stranger: PrincipalId,
        _dir: tempfile::TempDir,
    }

    async fn setup() -> Fixture {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();
        let parent = principals::create_principal(&db, "parent", "h", "s", None, None)
            .await
            .unwrap();
        let child_salt = salt_to_b64(&generate_salt().unwrap());
        let child = principals::create_principal(&db, "kid", "h", &child_salt, None, Some(parent))
            .await
            .unwrap();
        let stranger = principals::create_principal(&db, "stranger", "h", "s", None, None)
            .await
            .unwrap();
        Fixture {
            db,
            kdf: KdfConfig::insecure_for_tests(),
            parent: PrincipalId(parent),
            child: PrincipalId(child),
            stranger: PrincipalId(stranger),
            _dir: dir,
        }
    }

    fn caller(principal: PrincipalId) -> Caller {
        Caller {
            principal_id: principal,
            key: Zeroizing::new([42u8; KEY_SIZE]),
        }
    }

    #[tokio::test]
    async fn personal_domain_uses_the_session_key() {
        let fx = setup().await;
        let registry = KeyDomainRegistry::new(&fx.db, &fx.kdf);
        let me = caller(fx.parent);

        let key = registry
            .resolve(&me, DomainRef::Personal(fx.parent))
            .await
            .unwrap();
        assert_eq!(*key, *me.key);
    }

    #[tokio::test]
    async fn another_principals_personal_domain_is_forbidden() {
        let fx = setup().await;
        let registry = KeyDomainRegistry::new(&fx.db, &fx.kdf);

        let result = registry
            .resolve(&caller(fx.stranger), DomainRef::Personal(fx.parent))
            .await;
        assert!(matches!(result, Err(CofreError::Forbidden)));
    }

    #[tokio::test]
    async fn child_key_is_identical_for_parent_and_child() {
        let fx = setup().await;
        let registry = KeyDomainRegistry::new(&fx.db, &fx.kdf);

        let from_parent = registry
            .resolve(&caller(fx.parent), DomainRef::Child(fx.child))
            .await
            .unwrap();
        let from_child = registry
            .resolve(&caller(fx.child), DomainRef::Child(fx.child))
            .await
            .unwrap();
        assert_eq!(*from_parent, *from_child);
    }

    #[tokio::test]
    async fn stranger_cannot_resolve_child_domain() {
        let fx = setup().await;
        let registry = KeyDomainRegistry::new(&fx.db, &fx.kdf);

        let result = registry
            .resolve(&caller(fx.stranger), DomainRef::Child(fx.child))
            .await;
        assert!(matches!(result, Err(CofreError::Forbidden)));
    }

    #[tokio::test]
    async fn child_domain_of_a_non_child_is_forbidden() {
        let fx = setup().await;
        let registry = KeyDomainRegistry::new(&fx.db, &fx.kdf);

        // parent has no parent_id; treating it as a child domain is refused.
        let result = registry
            .resolve(&caller(fx.parent), DomainRef::Child(fx.parent))
            .await;
        assert!(matches!(result, Err(CofreError::Forbidden)));
    }

    #[tokio::test]
    async fn group_membership_gates_the_group_key() {
        let fx = setup().await;
        let registry = KeyDomainRegistry::new(&fx.db, &fx.kdf);

        let group_key = cofre_crypto::generate_key().unwrap();
        let group_id = groups::create_group(
            &fx.db,
            fx.parent.0,
            &cofre_crypto::key_to_b64(&group_key),
        )
        .await
        .unwrap();
        let domain = DomainRef::Group(GroupId(group_id));

        let resolved = registry.resolve(&caller(fx.parent), domain).await.unwrap();
        assert_eq!(*resolved, *group_key);

        let denied = registry.resolve(&caller(fx.stranger), domain).await;
        assert!(matches!(denied, Err(CofreError::Forbidden)));

        groups::add_member(&fx.db, group_id, fx.stranger.0)
            .await
            .unwrap();
        let now_allowed = registry.resolve(&caller(fx.stranger), domain).await.unwrap();
        assert_eq!(*now_allowed, *group_key);

        groups::remove_member(&fx.db, group_id, fx.stranger.0)
            .await
            .unwrap();
        let denied_again = registry.resolve(&caller(fx.stranger), domain).await;
        assert!(matches!(denied_again, Err(CofreError::Forbidden)));
    }

    #[tokio::test]
    async fn missing_group_is_not_found() {
        let fx = setup().await;
        let registry = KeyDomainRegistry::new(&fx.db, &fx.kdf);
        let result = registry
            .resolve(&caller(fx.parent), DomainRef::Group(GroupId(999)))
            .await;
        assert!(matches!(result, Err(CofreError::NotFound { .. })));
    }
}
