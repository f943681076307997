// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id key derivation from a passphrase.
//!
//! One salt per principal feeds three domain-separated derivations:
//!
//! - `derive_key`: the raw salt; output is the 32-byte vault key.
//! - `hash_for_verification`: salt with a `_verify` suffix; output is the
//!   stored login check value.
//! - `hash_for_recovery`: salt with a `_recover` suffix; hashes the
//!   recovery code.
//!
//! The suffixes guarantee that possession of a stored hash never yields
//! the encryption key, and vice versa, even though all three share the
//! same stored salt.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cofre_config::KdfConfig;
use cofre_core::CofreError;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Size of derived keys and hashes in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Size of the per-principal salt in bytes.
pub const SALT_SIZE: usize = 32;

/// Suffix appended to the salt when hashing for login verification.
const VERIFY_TAG: &[u8] = b"_verify";

/// Suffix appended to the salt when hashing a recovery code.
const RECOVER_TAG: &[u8] = b"_recover";

/// Derive the 32-byte vault key from a secret using Argon2id.
///
/// Deterministic: the same (secret, salt, params) always yields the same
/// key. The returned key is wrapped in [`Zeroizing`] for automatic memory
/// zeroing on drop.
pub fn derive_key(
    secret: &[u8],
    salt: &[u8; SALT_SIZE],
    params: &KdfConfig,
) -> Result<Zeroizing<[u8; KEY_SIZE]>, CofreError> {
    argon2id(secret, salt, params)
}

/// Hash a passphrase for login verification (base64 output).
///
/// Domain-separated from [`derive_key`] via the `_verify` salt suffix.
pub fn hash_for_verification(
    secret: &[u8],
    salt: &[u8; SALT_SIZE],
    params: &KdfConfig,
) -> Result<String, CofreError> {
    let tagged = tagged_salt(salt, VERIFY_TAG);
    let hash = argon2id(secret, &tagged, params)?;
    Ok(STANDARD.encode(hash.as_ref()))
}

/// Hash a recovery code for storage (base64 output).
///
/// Uses its own `_recover` salt suffix so a recovery-code hash can never
/// be confused with a verification hash or a key.
pub fn hash_for_recovery(
    secret: &[u8],
    salt: &[u8; SALT_SIZE],
    params: &KdfConfig,
) -> Result<String, CofreError> {
    let tagged = tagged_salt(salt, RECOVER_TAG);
    let hash = argon2id(secret, &tagged, params)?;
    Ok(STANDARD.encode(hash.as_ref()))
}

/// Verify a passphrase against a stored verification hash.
///
/// Recomputes the hash and compares in constant time. A stored hash that
/// fails to decode compares as a mismatch, not an error.
pub fn verify(
    secret: &[u8],
    salt: &[u8; SALT_SIZE],
    params: &KdfConfig,
    stored_hash: &str,
) -> Result<bool, CofreError> {
    let computed = hash_for_verification(secret, salt, params)?;
    Ok(constant_time_eq(computed.as_bytes(), stored_hash.as_bytes()))
}

/// Verify a recovery code against its stored hash.
pub fn verify_recovery(
    secret: &[u8],
    salt: &[u8; SALT_SIZE],
    params: &KdfConfig,
    stored_hash: &str,
) -> Result<bool, CofreError> {
    let computed = hash_for_recovery(secret, salt, params)?;
    Ok(constant_time_eq(computed.as_bytes(), stored_hash.as_bytes()))
}

/// Derive the vault key for a child principal.
///
/// Child vaults have no passphrase of their own. Their key is derived
/// from a deterministic identity string plus the child's own salt, so
/// both the child and its parent can compute it, and it survives parent
/// passphrase changes. The child's salt never rotates.
pub fn derive_child_key(
    parent_id: i64,
    child_id: i64,
    salt: &[u8; SALT_SIZE],
    params: &KdfConfig,
) -> Result<Zeroizing<[u8; KEY_SIZE]>, CofreError> {
    let identity = format!("cofre-child:{parent_id}:{child_id}");
    argon2id(identity.as_bytes(), salt, params)
}

/// Generate a fresh random 32-byte salt (one per principal, at creation).
pub fn generate_salt() -> Result<[u8; SALT_SIZE], CofreError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_SIZE];
    rng.fill(&mut salt)
        .map_err(|_| CofreError::Fatal("failed to generate random salt".to_string()))?;
    Ok(salt)
}

/// Encode a salt for at-rest storage.
pub fn salt_to_b64(salt: &[u8; SALT_SIZE]) -> String {
    STANDARD.encode(salt)
}

/// Decode a stored salt.
///
/// A stored salt that does not decode to exactly 32 bytes is corrupt
/// state, surfaced as [`CofreError::Fatal`].
pub fn salt_from_b64(encoded: &str) -> Result<[u8; SALT_SIZE], CofreError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| CofreError::Fatal(format!("corrupted stored salt: {e}")))?;
    bytes
        .try_into()
        .map_err(|_| CofreError::Fatal("corrupted stored salt: wrong length".to_string()))
}

fn argon2id(
    secret: &[u8],
    salt: &[u8],
    params: &KdfConfig,
) -> Result<Zeroizing<[u8; KEY_SIZE]>, CofreError> {
    let argon_params = Params::new(
        params.memory_cost,
        params.iterations,
        params.parallelism,
        Some(KEY_SIZE),
    )
    .map_err(|e| CofreError::Config(format!("invalid Argon2id parameters: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut output = Zeroizing::new([0u8; KEY_SIZE]);
    argon2
        .hash_password_into(secret, salt, output.as_mut())
        .map_err(|e| CofreError::Fatal(format!("Argon2id derivation failed: {e}")))?;

    Ok(output)
}

fn tagged_salt(salt: &[u8; SALT_SIZE], tag: &[u8]) -> Vec<u8> {
    let mut tagged = Vec::with_capacity(SALT_SIZE + tag.len());
    tagged.extend_from_slice(salt);
    tagged.extend_from_slice(tag);
    tagged
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    ring::constant_time::verify_slices_are_equal(a, b).is_ok()
}
