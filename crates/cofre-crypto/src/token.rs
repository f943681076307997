// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random material: session tokens, recovery codes, and symmetric keys.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use cofre_core::{CofreError, SessionToken};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::kdf::KEY_SIZE;

/// Entropy of a session token in bytes.
const TOKEN_SIZE: usize = 32;

/// Entropy of a recovery code in bytes.
const RECOVERY_CODE_SIZE: usize = 16;

/// Generate an opaque session token (256 bits, URL-safe base64).
pub fn generate_session_token() -> Result<SessionToken, CofreError> {
    let mut bytes = [0u8; TOKEN_SIZE];
    fill_random(&mut bytes)?;
    Ok(SessionToken::new(URL_SAFE_NO_PAD.encode(bytes)))
}

/// Generate a human-transcribable recovery code.
///
/// 128 bits of entropy rendered as hex in dash-separated groups of four,
/// e.g. `3f9a-1c0e-77b2-...`. The code is shown to the user exactly once;
/// only its hash is stored.
pub fn generate_recovery_code() -> Result<Zeroizing<String>, CofreError> {
    let mut bytes = [0u8; RECOVERY_CODE_SIZE];
    fill_random(&mut bytes)?;
    let hex_str = hex::encode(bytes);
    let grouped = hex_str
        .as_bytes()
        .chunks(4)
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("-");
    Ok(Zeroizing::new(grouped))
}

/// Generate a fresh random 256-bit symmetric key.
pub fn generate_key() -> Result<Zeroizing<[u8; KEY_SIZE]>, CofreError> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    fill_random(key.as_mut())?;
    Ok(key)
}

/// Encode a symmetric key for at-rest storage.
pub fn key_to_b64(key: &[u8; KEY_SIZE]) -> String {
    STANDARD.encode(key)
}

/// Decode a stored symmetric key.
///
/// A stored key that does not decode to exactly 32 bytes is corrupt
/// state, surfaced as [`CofreError::Fatal`].
pub fn key_from_b64(encoded: &str) -> Result<Zeroizing<[u8; KEY_SIZE]>, CofreError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| CofreError::Fatal(format!("corrupted stored key: {e}")))?;
    let array: [u8; KEY_SIZE] = bytes
        .try_into()
        .map_err(|_| CofreError::Fatal("corrupted stored key: wrong length".to_string()))?;
    Ok(Zeroizing::new(array))
}

fn fill_random(buf: &mut [u8]) -> Result<(), CofreError> {
    SystemRandom::new()
        .fill(buf)
        .map_err(|_| CofreError::Fatal("system RNG failure".to_string()))
}
