// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./cofre.toml` > `~/.config/cofre/cofre.toml` >
//! `/etc/cofre/cofre.toml` with environment variable overrides via the
//! `COFRE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CofreConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/cofre/cofre.toml` (system-wide)
/// 3. `~/.config/cofre/cofre.toml` (user XDG config)
/// 4. `./cofre.toml` (local directory)
/// 5. `COFRE_*` environment variables
pub fn load_config() -> Result<CofreConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CofreConfig::default()))
        .merge(Toml::file("/etc/cofre/cofre.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("cofre/cofre.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("cofre.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<CofreConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CofreConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CofreConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CofreConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `COFRE_SESSION_IDLE_TIMEOUT_SECS` must
/// map to `session.idle_timeout_secs`, not `session.idle.timeout.secs`.
/// Environment names arrive uppercase and are lowercased before the
/// section prefixes are rewritten.
fn env_provider() -> Env {
    Env::prefixed("COFRE_").map(|key| {
        let lowered = key.as_str().to_lowercase();
        let mapped = lowered
            .replacen("kdf_", "kdf.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("session_", "session.", 1);
        mapped.into()
    })
}
