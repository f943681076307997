// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cryptographic primitives for the Cofre credential vault.
//!
//! Three concerns live here:
//!
//! - [`kdf`]: Argon2id derivation of vault keys and domain-separated
//!   verification/recovery hashes from a per-principal salt.
//! - [`cipher`]: AES-256-GCM authenticated encryption with random
//!   96-bit nonces, plus the base64 at-rest field representation.
//! - [`token`]: random session tokens, recovery codes, and group keys.
//!
//! All key material crosses API boundaries wrapped in
//! [`zeroize::Zeroizing`] so it is scrubbed from memory on drop.

pub mod cipher;
pub mod kdf;
pub mod token;

pub use cipher::{NONCE_SIZE, open, open_field, seal, seal_field};
pub use kdf::{
    KEY_SIZE, SALT_SIZE, derive_child_key, derive_key, generate_salt, hash_for_recovery,
    hash_for_verification, salt_from_b64, salt_to_b64, verify, verify_recovery,
};
pub use token::{
    generate_key, generate_recovery_code, generate_session_token, key_from_b64, key_to_b64,
};
