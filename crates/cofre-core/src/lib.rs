// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Cofre credential vault.
//!
//! This crate provides the error taxonomy and the shared identifier and
//! field types used throughout the Cofre workspace. It has no knowledge
//! of storage or cryptography; those live in `cofre-storage` and
//! `cofre-crypto`.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CofreError;
pub use types::{DomainRef, EncryptedField, EntryId, GroupId, PrincipalId, SessionToken};
