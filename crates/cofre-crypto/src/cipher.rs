// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the
//! system CSPRNG. Nonce reuse would be catastrophic for GCM security, so
//! nonces are never accepted from callers on the encrypt path.
//!
//! Any bit flip in ciphertext or nonce makes [`open`] fail closed with
//! [`CofreError::AuthenticationFailure`]; corrupted plaintext is never
//! returned.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cofre_core::{CofreError, EncryptedField};
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::kdf::KEY_SIZE;

/// Size of the AES-GCM nonce in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Encrypt plaintext with AES-256-GCM using a random 96-bit nonce.
///
/// Returns `(ciphertext_with_tag, nonce)`. The caller must keep both to
/// decrypt later; they are always stored as a pair.
pub fn seal(key: &[u8; KEY_SIZE], plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_SIZE]), CofreError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| CofreError::Fatal("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| CofreError::Fatal("failed to generate random nonce".to_string()))?;

    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    // Seal in place: plaintext buffer is extended with the authentication tag.
    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| CofreError::Fatal("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt ciphertext with AES-256-GCM.
///
/// `ciphertext` must include the 16-byte authentication tag appended by
/// [`seal`]. Fails with [`CofreError::AuthenticationFailure`] if the key
/// is wrong or the data was tampered with.
pub fn open(
    key: &[u8; KEY_SIZE],
    nonce_bytes: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CofreError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| CofreError::Fatal("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let nonce = Nonce::assume_unique_for_key(*nonce_bytes);

    let mut in_out = ciphertext.to_vec();
    let plaintext = less_safe
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| CofreError::AuthenticationFailure)?;

    Ok(Zeroizing::new(plaintext.to_vec()))
}

/// Encrypt plaintext and package the result as a base64
/// ciphertext/nonce pair, the at-rest representation.
pub fn seal_field(key: &[u8; KEY_SIZE], plaintext: &[u8]) -> Result<EncryptedField, CofreError> {
    let (ciphertext, nonce) = seal(key, plaintext)?;
    Ok(EncryptedField {
        ciphertext: STANDARD.encode(&ciphertext),
        nonce: STANDARD.encode(nonce),
    })
}

/// Decrypt a stored base64 ciphertext/nonce pair.
///
/// A malformed base64 payload or wrong-sized nonce means the stored record
/// is corrupt. That is a [`CofreError::Fatal`] invariant violation, not
/// an authentication failure.
pub fn open_field(key: &[u8; KEY_SIZE], field: &EncryptedField) -> Result<Zeroizing<Vec<u8>>, CofreError> {
    let ciphertext = STANDARD
        .decode(&field.ciphertext)
        .map_err(|e| CofreError::Fatal(format!("corrupted stored ciphertext: {e}")))?;
    let nonce_vec = STANDARD
        .decode(&field.nonce)
        .map_err(|e| CofreError::Fatal(format!("corrupted stored nonce: {e}")))?;
    let nonce: [u8; NONCE_SIZE] = nonce_vec
        .try_into()
        .map_err(|_| CofreError::Fatal("corrupted stored nonce: wrong length".to_string()))?;

    open(key, &nonce, &ciphertext)
}
