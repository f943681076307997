// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The vault service facade.
//!
//! Every external operation enters here. The service authenticates the
//! session, takes the per-principal lock (read side for normal traffic,
//! write side for re-key and deletion), and delegates key resolution to
//! the domain registry. Plaintext crosses this boundary only as
//! `SecretString`.

use cofre_config::CofreConfig;
use cofre_core::{CofreError, DomainRef, EncryptedField, EntryId, GroupId, PrincipalId, SessionToken};
use cofre_crypto::{
    derive_key, generate_recovery_code, generate_salt, hash_for_recovery, hash_for_verification,
    key_to_b64, open_field, salt_to_b64, seal_field, verify,
};
use cofre_storage::Database;
use cofre_storage::models::EntryRow;
use cofre_storage::queries::{entries, groups, principals};
use rusqlite::params;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::{KeyDomainRegistry, domain_from_parts, domain_id, domain_kind};
use crate::locks::PrincipalLocks;
use crate::rekey;
use crate::session::{Caller, SessionKeyCache};

/// Minimum passphrase length accepted at register, change, and recover.
pub const MIN_PASSPHRASE_LEN: usize = 8;

/// A stored encrypted entry as the service exposes it.
#[derive(Debug, Clone)]
pub struct VaultEntry {
    pub id: EntryId,
    pub domain: DomainRef,
    pub label: String,
    pub field: EncryptedField,
    pub created_at: String,
    pub updated_at: String,
}

impl VaultEntry {
    fn from_row(row: EntryRow) -> Result<Self, CofreError> {
        Ok(Self {
            id: EntryId(row.id),
            domain: domain_from_parts(&row.domain_kind, row.domain_id)?,
            label: row.label,
            field: EncryptedField {
                ciphertext: row.ciphertext,
                nonce: row.nonce,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// The key lifecycle service over one vault database.
pub struct VaultService {
    db: Database,
    config: CofreConfig,
    locks: PrincipalLocks,
}

impl VaultService {
    pub fn new(db: Database, config: CofreConfig) -> Self {
        Self {
            db,
            config,
            locks: PrincipalLocks::new(),
        }
    }

    /// Open the database named by the configuration and build the service.
    pub async fn open(config: CofreConfig) -> Result<Self, CofreError> {
        let db = Database::open(&config.storage.database_path).await?;
        Ok(Self::new(db, config))
    }

    fn cache(&self) -> SessionKeyCache<'_> {
        SessionKeyCache::new(&self.db, &self.config.session)
    }

    fn registry(&self) -> KeyDomainRegistry<'_> {
        KeyDomainRegistry::new(&self.db, &self.config.kdf)
    }

    async fn authenticate(&self, token: &SessionToken) -> Result<Caller, CofreError> {
        self.cache().resolve(token).await
    }

    fn check_passphrase_policy(passphrase: &SecretString) -> Result<(), CofreError> {
        if passphrase.expose_secret().len() < MIN_PASSPHRASE_LEN {
            return Err(CofreError::InvalidInput(format!(
                "passphrase must be at least {MIN_PASSPHRASE_LEN} characters"
            )));
        }
        Ok(())
    }

    async fn create_principal_with_credentials(
        &self,
        username: &str,
        passphrase: &SecretString,
        parent_id: Option<i64>,
    ) -> Result<(i64, Zeroizing<String>, Zeroizing<[u8; 32]>), CofreError> {
        if username.trim().is_empty() {
            return Err(CofreError::InvalidInput("username must not be empty".into()));
        }
        Self::check_passphrase_policy(passphrase)?;
        if principals::get_principal_by_username(&self.db, username)
            .await?
            .is_some()
        {
            return Err(CofreError::InvalidInput("username is already taken".into()));
        }

        let salt = generate_salt()?;
        let kdf = &self.config.kdf;
        let verification_hash =
            hash_for_verification(passphrase.expose_secret().as_bytes(), &salt, kdf)?;
        let recovery_code = generate_recovery_code()?;
        let recovery_hash = hash_for_recovery(recovery_code.as_bytes(), &salt, kdf)?;
        let key = derive_key(passphrase.expose_secret().as_bytes(), &salt, kdf)?;

        let id = principals::create_principal(
            &self.db,
            username,
            &verification_hash,
            &salt_to_b64(&salt),
            Some(&recovery_hash),
            parent_id,
        )
        .await?;

        Ok((id, recovery_code, key))
    }

    /// Register a new principal.
    ///
    /// Returns a live session plus the recovery code, which is shown to
    /// the user exactly once; only its hash is stored.
    pub async fn register(
        &self,
        username: &str,
        passphrase: &SecretString,
    ) -> Result<(SessionToken, Zeroizing<String>), CofreError> {
        let (id, recovery_code, key) = self
            .create_principal_with_credentials(username, passphrase, None)
            .await?;
        let token = self.cache().create(PrincipalId(id), &key).await?;
        info!(principal = id, username = %username, "principal registered");
        Ok((token, recovery_code))
    }

    /// Register a child sub-account under the calling principal.
    ///
    /// Children cannot have children of their own. The child logs in with
    /// its own passphrase; the shared child-domain key is derived, not
    /// stored, so no session is issued to the parent here.
    pub async fn register_child(
        &self,
        parent_token: &SessionToken,
        username: &str,
        passphrase: &SecretString,
    ) -> Result<(PrincipalId, Zeroizing<String>), CofreError> {
        let caller = self.authenticate(parent_token).await?;
        let parent = principals::get_principal(&self.db, caller.principal_id.0)
            .await?
            .ok_or_else(|| CofreError::not_found("principal"))?;
        if parent.parent_id.is_some() {
            return Err(CofreError::Forbidden);
        }

        let (id, recovery_code, _key) = self
            .create_principal_with_credentials(username, passphrase, Some(parent.id))
            .await?;
        info!(parent = parent.id, child = id, "child account registered");
        Ok((PrincipalId(id), recovery_code))
    }

    /// Authenticate with username and passphrase, creating a session.
    ///
    /// Unknown usernames and wrong passphrases are indistinguishable.
    pub async fn login(
        &self,
        username: &str,
        passphrase: &SecretString,
    ) -> Result<SessionToken, CofreError> {
        let principal = principals::get_principal_by_username(&self.db, username)
            .await?
            .ok_or(CofreError::InvalidCredentials)?;
        let _guard = self.locks.read(PrincipalId(principal.id)).await;

        let salt = cofre_crypto::salt_from_b64(&principal.salt)?;
        let kdf = &self.config.kdf;
        if !verify(
            passphrase.expose_secret().as_bytes(),
            &salt,
            kdf,
            &principal.verification_hash,
        )? {
            return Err(CofreError::InvalidCredentials);
        }

        let key = derive_key(passphrase.expose_secret().as_bytes(), &salt, kdf)?;
        let token = self.cache().create(PrincipalId(principal.id), &key).await?;
        info!(principal = principal.id, "login");
        Ok(token)
    }

    /// Change the caller's passphrase, re-keying the personal domain.
    ///
    /// All existing sessions are revoked; the returned session is the
    /// only live one. A fresh recovery code comes back with it and the
    /// previous code stops working, since the stored recovery hash is
    /// bound to the rotated salt.
    pub async fn change_passphrase(
        &self,
        token: &SessionToken,
        old_passphrase: &SecretString,
        new_passphrase: &SecretString,
    ) -> Result<(SessionToken, Zeroizing<String>), CofreError> {
        let caller = self.authenticate(token).await?;
        Self::check_passphrase_policy(new_passphrase)?;
        let _guard = self.locks.write(caller.principal_id).await;

        let principal = principals::get_principal(&self.db, caller.principal_id.0)
            .await?
            .ok_or_else(|| CofreError::not_found("principal"))?;
        rekey::change_passphrase(&self.db, &self.config.kdf, &principal, old_passphrase, new_passphrase)
            .await
    }

    /// Recover an account with its recovery code.
    ///
    /// Destroys all personal-domain ciphertext (the old key is gone for
    /// good), rotates credentials and the recovery code, and returns the
    /// new session plus the new code.
    pub async fn recover(
        &self,
        username: &str,
        recovery_code: &SecretString,
        new_passphrase: &SecretString,
    ) -> Result<(SessionToken, Zeroizing<String>), CofreError> {
        Self::check_passphrase_policy(new_passphrase)?;
        let principal = principals::get_principal_by_username(&self.db, username)
            .await?
            .ok_or(CofreError::InvalidCredentials)?;
        let _guard = self.locks.write(PrincipalId(principal.id)).await;

        // Re-read under the lock; a concurrent re-key may have rotated
        // the credentials since the lookup.
        let principal = principals::get_principal(&self.db, principal.id)
            .await?
            .ok_or(CofreError::InvalidCredentials)?;
        rekey::recover(&self.db, &self.config.kdf, &principal, recovery_code, new_passphrase).await
    }

    /// The principal behind a session token.
    pub async fn whoami(&self, token: &SessionToken) -> Result<PrincipalId, CofreError> {
        Ok(self.authenticate(token).await?.principal_id)
    }

    /// End one session.
    pub async fn logout(&self, token: &SessionToken) -> Result<(), CofreError> {
        self.cache().revoke(token).await
    }

    /// Delete the caller's account and everything it owns.
    ///
    /// Destroys personal- and child-domain ciphertext for the caller and
    /// its children, the ciphertext of every group the caller or a child
    /// owns, and the principal row itself. Entries carry no foreign key
    /// (the domain reference is polymorphic), so they are cleaned up
    /// explicitly; one transaction keeps a mid-sequence failure from
    /// leaving ciphertext gone while the account lives on.
    pub async fn delete_account(&self, token: &SessionToken) -> Result<(), CofreError> {
        let caller = self.authenticate(token).await?;
        let _guard = self.locks.write(caller.principal_id).await;
        let id = caller.principal_id.0;

        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                let tx = conn.transaction()?;
                tx.execute(
                    "DELETE FROM entries
                     WHERE domain_kind IN ('personal', 'child')
                       AND domain_id IN (SELECT id FROM principals
                                         WHERE id = ?1 OR parent_id = ?1)",
                    params![id],
                )?;
                tx.execute(
                    "DELETE FROM entries
                     WHERE domain_kind = 'group'
                       AND domain_id IN (SELECT id FROM group_domains
                                         WHERE owner_id IN (SELECT id FROM principals
                                                            WHERE id = ?1 OR parent_id = ?1))",
                    params![id],
                )?;
                // Sessions, memberships, group rows and child principal
                // rows cascade from here.
                tx.execute("DELETE FROM principals WHERE id = ?1", params![id])?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(CofreError::storage)?;

        info!(principal = id, "account deleted");
        Ok(())
    }

    /// Encrypt a value into a domain the caller is authorized for.
    pub async fn encrypt_for_domain(
        &self,
        token: &SessionToken,
        domain: DomainRef,
        label: &str,
        plaintext: &SecretString,
    ) -> Result<VaultEntry, CofreError> {
        let caller = self.authenticate(token).await?;
        let _guard = self.locks.read(caller.principal_id).await;

        let key = self.registry().resolve(&caller, domain).await?;
        let field = seal_field(&key, plaintext.expose_secret().as_bytes())?;
        let id = entries::insert_entry(
            &self.db,
            domain_kind(domain),
            domain_id(domain),
            label,
            &field.ciphertext,
            &field.nonce,
        )
        .await?;
        let row = entries::get_entry(&self.db, id)
            .await?
            .ok_or_else(|| CofreError::not_found("entry"))?;
        debug!(entry = id, kind = domain_kind(domain), "entry encrypted");
        VaultEntry::from_row(row)
    }

    /// Decrypt a detached field under a domain's key.
    pub async fn decrypt_for_domain(
        &self,
        token: &SessionToken,
        domain: DomainRef,
        field: &EncryptedField,
    ) -> Result<SecretString, CofreError> {
        let caller = self.authenticate(token).await?;
        let _guard = self.locks.read(caller.principal_id).await;

        let key = self.registry().resolve(&caller, domain).await?;
        let plaintext = open_field(&key, field)?;
        let text = std::str::from_utf8(&plaintext)
            .map_err(|_| CofreError::Fatal("decrypted value is not valid UTF-8".into()))?;
        Ok(SecretString::from(text.to_string()))
    }

    /// Decrypt a stored entry by id.
    pub async fn decrypt_entry(
        &self,
        token: &SessionToken,
        entry: EntryId,
    ) -> Result<SecretString, CofreError> {
        let row = entries::get_entry(&self.db, entry.0)
            .await?
            .ok_or_else(|| CofreError::not_found("entry"))?;
        let domain = domain_from_parts(&row.domain_kind, row.domain_id)?;
        let field = EncryptedField {
            ciphertext: row.ciphertext,
            nonce: row.nonce,
        };
        self.decrypt_for_domain(token, domain, &field).await
    }

    /// Delete a stored entry. Requires the same authorization as
    /// decrypting it.
    pub async fn delete_entry(
        &self,
        token: &SessionToken,
        entry: EntryId,
    ) -> Result<(), CofreError> {
        let caller = self.authenticate(token).await?;
        let _guard = self.locks.read(caller.principal_id).await;

        let row = entries::get_entry(&self.db, entry.0)
            .await?
            .ok_or_else(|| CofreError::not_found("entry"))?;
        let domain = domain_from_parts(&row.domain_kind, row.domain_id)?;
        // Authorization only; the key is discarded.
        let _key = self.registry().resolve(&caller, domain).await?;
        if !entries::delete_entry(&self.db, entry.0).await? {
            return Err(CofreError::not_found("entry"));
        }
        debug!(entry = entry.0, kind = %row.domain_kind, "entry deleted");
        Ok(())
    }

    /// List a domain's entries. Requires the same authorization as
    /// decryption; the entries come back still encrypted.
    pub async fn list_entries(
        &self,
        token: &SessionToken,
        domain: DomainRef,
    ) -> Result<Vec<VaultEntry>, CofreError> {
        let caller = self.authenticate(token).await?;
        let _guard = self.locks.read(caller.principal_id).await;

        // Authorization only; the key is discarded.
        let _key = self.registry().resolve(&caller, domain).await?;
        let rows = entries::list_entries_for_domain(&self.db, domain_kind(domain), domain_id(domain))
            .await?;
        rows.into_iter().map(VaultEntry::from_row).collect()
    }

    /// Create a group domain owned by the caller, with a fresh random key.
    pub async fn create_group_domain(&self, token: &SessionToken) -> Result<GroupId, CofreError> {
        let caller = self.authenticate(token).await?;
        let key = cofre_crypto::generate_key()?;
        let id = groups::create_group(&self.db, caller.principal_id.0, &key_to_b64(&key)).await?;
        info!(group = id, owner = caller.principal_id.0, "group domain created");
        Ok(GroupId(id))
    }

    async fn owned_group(
        &self,
        caller: &Caller,
        group: GroupId,
    ) -> Result<cofre_storage::models::GroupDomainRow, CofreError> {
        let record = groups::get_group(&self.db, group.0)
            .await?
            .ok_or_else(|| CofreError::not_found("group"))?;
        if record.owner_id != caller.principal_id.0 {
            return Err(CofreError::Forbidden);
        }
        Ok(record)
    }

    /// Add a member to a group the caller owns.
    pub async fn add_group_member(
        &self,
        token: &SessionToken,
        group: GroupId,
        member: PrincipalId,
    ) -> Result<(), CofreError> {
        let caller = self.authenticate(token).await?;
        self.owned_group(&caller, group).await?;
        principals::get_principal(&self.db, member.0)
            .await?
            .ok_or_else(|| CofreError::not_found("principal"))?;
        groups::add_member(&self.db, group.0, member.0).await?;
        info!(group = group.0, member = member.0, "group member added");
        Ok(())
    }

    /// Remove a member from a group the caller owns.
    ///
    /// The group key is not rotated; removal only revokes future access
    /// through the registry.
    pub async fn remove_group_member(
        &self,
        token: &SessionToken,
        group: GroupId,
        member: PrincipalId,
    ) -> Result<(), CofreError> {
        let caller = self.authenticate(token).await?;
        let record = self.owned_group(&caller, group).await?;
        if member.0 == record.owner_id {
            return Err(CofreError::InvalidInput(
                "the group owner cannot be removed".into(),
            ));
        }
        if !groups::remove_member(&self.db, group.0, member.0).await? {
            return Err(CofreError::not_found("group membership"));
        }
        info!(group = group.0, member = member.0, "group member removed");
        Ok(())
    }

    /// Delete a group the caller owns, destroying its key and ciphertext.
    pub async fn delete_group_domain(
        &self,
        token: &SessionToken,
        group: GroupId,
    ) -> Result<(), CofreError> {
        let caller = self.authenticate(token).await?;
        self.owned_group(&caller, group).await?;
        groups::delete_group(&self.db, group.0).await?;
        info!(group = group.0, "group domain deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cofre_config::{KdfConfig, SessionConfig, StorageConfig};
    use tempfile::tempdir;

    fn test_config(dir: &tempfile::TempDir) -> CofreConfig {
        CofreConfig {
            kdf: KdfConfig::insecure_for_tests(),
            storage: StorageConfig {
                database_path: dir.path().join("vault.db").to_str().unwrap().to_string(),
            },
            session: SessionConfig::default(),
        }
    }

    async fn setup() -> (VaultService, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let config = test_config(&dir);
        let db = Database::open(&config.storage.database_path).await.unwrap();
        (VaultService::new(db, config), dir)
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn register_issues_usable_session() {
        let (service, _dir) = setup().await;
        let (token, recovery) = service
            .register("alice", &secret("correct horse"))
            .await
            .unwrap();
        assert!(!recovery.is_empty());

        let me = service.authenticate(&token).await.unwrap();
        let entry = service
            .encrypt_for_domain(
                &token,
                DomainRef::Personal(me.principal_id),
                "email",
                &secret("hunter2-mail"),
            )
            .await
            .unwrap();
        let plain = service.decrypt_entry(&token, entry.id).await.unwrap();
        assert_eq!(plain.expose_secret(), "hunter2-mail");
    }

    #[tokio::test]
    async fn short_passphrase_is_rejected() {
        let (service, _dir) = setup().await;
        let result = service.register("bob", &secret("short")).await;
        assert!(matches!(result, Err(CofreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn duplicate_username_is_invalid_input() {
        let (service, _dir) = setup().await;
        service.register("carol", &secret("passphrase")).await.unwrap();
        let result = service.register("carol", &secret("passphrase")).await;
        assert!(matches!(result, Err(CofreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn login_with_wrong_passphrase_fails_uniformly() {
        let (service, _dir) = setup().await;
        service.register("dave", &secret("right-pass")).await.unwrap();

        let wrong_pass = service.login("dave", &secret("wrong-pass")).await;
        let wrong_user = service.login("nobody", &secret("right-pass")).await;
        assert!(matches!(wrong_pass, Err(CofreError::InvalidCredentials)));
        assert!(matches!(wrong_user, Err(CofreError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn logout_invalidates_the_session() {
        let (service, _dir) = setup().await;
        let (token, _) = service.register("erin", &secret("passphrase")).await.unwrap();
        service.logout(&token).await.unwrap();
        let result = service.authenticate(&token).await;
        assert!(matches!(result, Err(CofreError::Unauthenticated)));
    }

    #[tokio::test]
    async fn child_cannot_register_children() {
        let (service, _dir) = setup().await;
        let (parent_token, _) = service.register("parent", &secret("passphrase")).await.unwrap();
        service
            .register_child(&parent_token, "kid", &secret("kid-pass-1"))
            .await
            .unwrap();

        let kid_token = service.login("kid", &secret("kid-pass-1")).await.unwrap();
        let result = service
            .register_child(&kid_token, "grandkid", &secret("passphrase"))
            .await;
        assert!(matches!(result, Err(CofreError::Forbidden)));
    }

    #[tokio::test]
    async fn parent_and_child_share_the_child_domain() {
        let (service, _dir) = setup().await;
        let (parent_token, _) = service.register("parent", &secret("passphrase")).await.unwrap();
        let (child_id, _) = service
            .register_child(&parent_token, "kid", &secret("kid-pass-1"))
            .await
            .unwrap();
        let child_domain = DomainRef::Child(child_id);

        let entry = service
            .encrypt_for_domain(&parent_token, child_domain, "wifi", &secret("kid-wifi-pw"))
            .await
            .unwrap();

        let kid_token = service.login("kid", &secret("kid-pass-1")).await.unwrap();
        let plain = service.decrypt_entry(&kid_token, entry.id).await.unwrap();
        assert_eq!(plain.expose_secret(), "kid-wifi-pw");
    }

    #[tokio::test]
    async fn group_lifecycle_with_membership_checks() {
        let (service, _dir) = setup().await;
        let (owner_token, _) = service.register("owner", &secret("passphrase")).await.unwrap();
        let (member_token, _) = service.register("member", &secret("passphrase")).await.unwrap();
        let member = service.authenticate(&member_token).await.unwrap().principal_id;

        let group = service.create_group_domain(&owner_token).await.unwrap();
        let domain = DomainRef::Group(group);

        // Not yet a member.
        let denied = service
            .encrypt_for_domain(&member_token, domain, "x", &secret("nope"))
            .await;
        assert!(matches!(denied, Err(CofreError::Forbidden)));

        service.add_group_member(&owner_token, group, member).await.unwrap();
        let entry = service
            .encrypt_for_domain(&member_token, domain, "shared", &secret("team-secret"))
            .await
            .unwrap();
        let plain = service.decrypt_entry(&owner_token, entry.id).await.unwrap();
        assert_eq!(plain.expose_secret(), "team-secret");

        // Only the owner may mutate membership.
        let not_owner = service.remove_group_member(&member_token, group, member).await;
        assert!(matches!(not_owner, Err(CofreError::Forbidden)));

        service
            .remove_group_member(&owner_token, group, member)
            .await
            .unwrap();
        let after_removal = service.decrypt_entry(&member_token, entry.id).await;
        assert!(matches!(after_removal, Err(CofreError::Forbidden)));

        service.delete_group_domain(&owner_token, group).await.unwrap();
        let gone = service.decrypt_entry(&owner_token, entry.id).await;
        assert!(matches!(gone, Err(CofreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn owner_cannot_be_removed_from_group() {
        let (service, _dir) = setup().await;
        let (owner_token, _) = service.register("owner", &secret("passphrase")).await.unwrap();
        let owner = service.authenticate(&owner_token).await.unwrap().principal_id;
        let group = service.create_group_domain(&owner_token).await.unwrap();

        let result = service.remove_group_member(&owner_token, group, owner).await;
        assert!(matches!(result, Err(CofreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn delete_entry_requires_domain_authorization() {
        let (service, _dir) = setup().await;
        let (alice, _) = service.register("alice", &secret("passphrase")).await.unwrap();
        let (mallory, _) = service.register("mallory", &secret("passphrase")).await.unwrap();
        let me = service.authenticate(&alice).await.unwrap().principal_id;
        let entry = service
            .encrypt_for_domain(&alice, DomainRef::Personal(me), "a", &secret("v"))
            .await
            .unwrap();

        let denied = service.delete_entry(&mallory, entry.id).await;
        assert!(matches!(denied, Err(CofreError::Forbidden)));

        service.delete_entry(&alice, entry.id).await.unwrap();
        assert!(matches!(
            service.decrypt_entry(&alice, entry.id).await,
            Err(CofreError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete_entry(&alice, entry.id).await,
            Err(CofreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn delete_account_removes_principal_and_ciphertext() {
        let (service, _dir) = setup().await;
        let (token, _) = service.register("frank", &secret("passphrase")).await.unwrap();
        let me = service.authenticate(&token).await.unwrap().principal_id;
        service
            .encrypt_for_domain(&token, DomainRef::Personal(me), "a", &secret("value"))
            .await
            .unwrap();

        service.delete_account(&token).await.unwrap();

        assert!(matches!(
            service.authenticate(&token).await,
            Err(CofreError::Unauthenticated)
        ));
        assert!(matches!(
            service.login("frank", &secret("passphrase")).await,
            Err(CofreError::InvalidCredentials)
        ));
    }
}
