// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password, passphrase and PIN generation plus strength estimation.
//!
//! Pure functions over plaintext candidates; nothing here touches the
//! vault, its keys, or its storage.

pub mod generator;
pub mod strength;

pub use generator::{PassphraseOptions, PasswordOptions, passphrase, pin, random_password};
pub use strength::{StrengthLabel, StrengthReport, analyze, entropy, estimate_crack_time};
