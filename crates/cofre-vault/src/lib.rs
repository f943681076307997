// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key lifecycle core for the Cofre credential vault.
//!
//! Wires the crypto primitives and the storage layer into the four
//! lifecycle components:
//!
//! - [`domain::KeyDomainRegistry`] turns a `DomainRef` into key
//!   material, with authorization fused in.
//! - [`session::SessionKeyCache`] is the token-to-key cache so one login
//!   derivation serves a whole session.
//! - [`rekey`] holds atomic passphrase change and destructive recovery.
//! - [`service::VaultService`] is the facade external callers use.

pub mod domain;
pub mod locks;
pub mod rekey;
pub mod service;
pub mod session;

pub use domain::KeyDomainRegistry;
pub use service::{MIN_PASSPHRASE_LEN, VaultEntry, VaultService};
pub use session::{Caller, SessionKeyCache};
