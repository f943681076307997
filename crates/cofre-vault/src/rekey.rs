// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Re-key protocol: passphrase change and recovery.
//!
//! Both operations run in three phases. A read phase collects the rows
//! they will touch; a pure in-memory phase does every derivation,
//! decryption and re-encryption (any failure here aborts with zero
//! writes); a write phase applies the whole outcome in one SQLite
//! transaction. There is no observable intermediate state.
//!
//! Group- and child-domain ciphertext is never touched: group keys do not
//! depend on any passphrase, and child-domain keys depend only on the
//! child's salt, which is deliberately kept stable.

use cofre_config::KdfConfig;
use cofre_core::{CofreError, EncryptedField, SessionToken};
use cofre_crypto::{
    derive_key, generate_recovery_code, generate_salt, hash_for_recovery, hash_for_verification,
    key_to_b64, open_field, salt_from_b64, salt_to_b64, seal_field, verify, verify_recovery,
};
use cofre_storage::models::PrincipalRow;
use cofre_storage::queries::entries;
use cofre_storage::Database;
use rusqlite::params;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};
use zeroize::Zeroizing;

/// Change a principal's passphrase, re-encrypting the personal domain.
///
/// Verifies the old passphrase, decrypts every personal entry under the
/// old key, re-encrypts under the new key with fresh nonces, and swaps
/// credentials, entries and sessions in one transaction. One fresh
/// session is issued; every other session dies.
///
/// The stored recovery hash is bound to the salt, so a fresh recovery
/// code is issued with the change and returned in plaintext exactly
/// once. The previous code stops working.
///
/// A single entry that fails to decrypt aborts the whole change with
/// [`CofreError::AuthenticationFailure`] and no writes.
pub async fn change_passphrase(
    db: &Database,
    kdf: &KdfConfig,
    principal: &PrincipalRow,
    old_passphrase: &SecretString,
    new_passphrase: &SecretString,
) -> Result<(SessionToken, Zeroizing<String>), CofreError> {
    let salt = salt_from_b64(&principal.salt)?;
    if !verify(
        old_passphrase.expose_secret().as_bytes(),
        &salt,
        kdf,
        &principal.verification_hash,
    )? {
        return Err(CofreError::Forbidden);
    }

    let old_key = derive_key(old_passphrase.expose_secret().as_bytes(), &salt, kdf)?;

    // Child principals keep their creation salt: the child-domain key is
    // derived from it and must stay stable across passphrase changes.
    let new_salt = if principal.parent_id.is_some() {
        salt
    } else {
        generate_salt()?
    };
    let new_hash = hash_for_verification(new_passphrase.expose_secret().as_bytes(), &new_salt, kdf)?;
    let new_key = derive_key(new_passphrase.expose_secret().as_bytes(), &new_salt, kdf)?;
    let new_code = generate_recovery_code()?;
    let new_recovery_hash = hash_for_recovery(new_code.as_bytes(), &new_salt, kdf)?;

    let rows = entries::list_entries_for_domain(db, "personal", principal.id).await?;
    let mut rewritten: Vec<(i64, EncryptedField)> = Vec::with_capacity(rows.len());
    for row in &rows {
        let field = EncryptedField {
            ciphertext: row.ciphertext.clone(),
            nonce: row.nonce.clone(),
        };
        let plaintext = open_field(&old_key, &field).map_err(|e| {
            if matches!(e, CofreError::AuthenticationFailure) {
                warn!(
                    principal = principal.id,
                    entry = row.id,
                    "entry failed to decrypt during passphrase change; aborting with no writes"
                );
            }
            e
        })?;
        rewritten.push((row.id, seal_field(&new_key, &plaintext)?));
    }

    let token = cofre_crypto::generate_session_token()?;
    apply_rekey(
        db,
        RekeyWrite {
            principal_id: principal.id,
            salt_b64: salt_to_b64(&new_salt),
            verification_hash: new_hash,
            recovery_hash: new_recovery_hash,
            rewritten_entries: rewritten,
            delete_personal_entries: false,
            session_token: token.as_str().to_string(),
            session_key_b64: key_to_b64(&new_key),
        },
    )
    .await?;

    info!(
        principal = principal.id,
        entries = rows.len(),
        "passphrase changed; personal domain re-keyed, recovery code rotated"
    );
    Ok((token, new_code))
}

/// Recover an account with its recovery code.
///
/// The old key is unrecoverable by construction, so every personal-domain
/// entry is deleted; this is explicit, documented data loss rather than
/// ciphertext that can never again be read. Credentials are rotated, a
/// new recovery code is issued (returned in plaintext exactly once), all
/// sessions are revoked and one fresh session is created.
pub async fn recover(
    db: &Database,
    kdf: &KdfConfig,
    principal: &PrincipalRow,
    recovery_code: &SecretString,
    new_passphrase: &SecretString,
) -> Result<(SessionToken, Zeroizing<String>), CofreError> {
    let salt = salt_from_b64(&principal.salt)?;
    let stored = principal
        .recovery_hash
        .as_deref()
        .ok_or(CofreError::InvalidCredentials)?;
    if !verify_recovery(recovery_code.expose_secret().as_bytes(), &salt, kdf, stored)? {
        return Err(CofreError::InvalidCredentials);
    }

    let new_salt = if principal.parent_id.is_some() {
        salt
    } else {
        generate_salt()?
    };
    let new_hash = hash_for_verification(new_passphrase.expose_secret().as_bytes(), &new_salt, kdf)?;
    let new_key = derive_key(new_passphrase.expose_secret().as_bytes(), &new_salt, kdf)?;
    let new_code = generate_recovery_code()?;
    let new_recovery_hash = hash_for_recovery(new_code.as_bytes(), &new_salt, kdf)?;

    let token = cofre_crypto::generate_session_token()?;
    apply_rekey(
        db,
        RekeyWrite {
            principal_id: principal.id,
            salt_b64: salt_to_b64(&new_salt),
            verification_hash: new_hash,
            recovery_hash: new_recovery_hash,
            rewritten_entries: Vec::new(),
            delete_personal_entries: true,
            session_token: token.as_str().to_string(),
            session_key_b64: key_to_b64(&new_key),
        },
    )
    .await?;

    warn!(
        principal = principal.id,
        "account recovered; personal-domain entries destroyed"
    );
    Ok((token, new_code))
}

/// The complete outcome of a re-key, applied in one transaction.
struct RekeyWrite {
    principal_id: i64,
    salt_b64: String,
    verification_hash: String,
    /// Both re-key paths rotate the recovery hash; it is bound to the salt.
    recovery_hash: String,
    rewritten_entries: Vec<(i64, EncryptedField)>,
    delete_personal_entries: bool,
    session_token: String,
    session_key_b64: String,
}

async fn apply_rekey(db: &Database, write: RekeyWrite) -> Result<(), CofreError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute(
                "UPDATE principals
                 SET salt = ?1, verification_hash = ?2, recovery_hash = ?3
                 WHERE id = ?4",
                params![
                    write.salt_b64,
                    write.verification_hash,
                    write.recovery_hash,
                    write.principal_id
                ],
            )?;
            if write.delete_personal_entries {
                tx.execute(
                    "DELETE FROM entries WHERE domain_kind = 'personal' AND domain_id = ?1",
                    params![write.principal_id],
                )?;
            }
            for (entry_id, field) in &write.rewritten_entries {
                tx.execute(
                    "UPDATE entries
                     SET ciphertext = ?1, nonce = ?2,
                         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     WHERE id = ?3",
                    params![field.ciphertext, field.nonce, entry_id],
                )?;
            }
            tx.execute(
                "DELETE FROM sessions WHERE principal_id = ?1",
                params![write.principal_id],
            )?;
            tx.execute(
                "INSERT INTO sessions (token, principal_id, key_b64) VALUES (?1, ?2, ?3)",
                params![write.session_token, write.principal_id, write.session_key_b64],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> CofreError {
    CofreError::Storage {
        source: Box::new(e),
    }
}
