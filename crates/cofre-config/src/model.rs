// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Cofre credential vault.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Cofre configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CofreConfig {
    /// Argon2id work-factor settings.
    #[serde(default)]
    pub kdf: KdfConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Session cache settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Argon2id key-derivation configuration.
///
/// Defaults follow the OWASP recommendation for Argon2id. Increasing the
/// work factors is safe for new credentials; stored hashes keep working
/// because each principal's hash is recomputed on passphrase change.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KdfConfig {
    /// Argon2id memory cost in KiB (default: 65536 = 64 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub memory_cost: u32,

    /// Argon2id iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub iterations: u32,

    /// Argon2id parallelism lanes (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub parallelism: u32,
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            memory_cost: default_kdf_memory_cost(),
            iterations: default_kdf_iterations(),
            parallelism: default_kdf_parallelism(),
        }
    }
}

impl KdfConfig {
    /// Low-cost parameters for tests. Never use outside tests: these are
    /// far below the interactive-security floor.
    pub fn insecure_for_tests() -> Self {
        Self {
            memory_cost: 8192,
            iterations: 1,
            parallelism: 1,
        }
    }
}

fn default_kdf_memory_cost() -> u32 {
    65536 // 64 MiB per OWASP recommendation
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("cofre").join("cofre.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("cofre.db"))
        .to_string_lossy()
        .into_owned()
}

/// Session cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Idle timeout in seconds before a session stops resolving
    /// (default: 1800 = 30 minutes). 0 disables idle expiry.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

fn default_idle_timeout_secs() -> u64 {
    1800
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_owasp_floor() {
        let kdf = KdfConfig::default();
        assert_eq!(kdf.memory_cost, 65536);
        assert_eq!(kdf.iterations, 3);
        assert_eq!(kdf.parallelism, 4);
    }

    #[test]
    fn empty_toml_deserializes_to_defaults() {
        let config: CofreConfig = toml::from_str("").unwrap();
        assert_eq!(config.kdf.memory_cost, 65536);
        assert_eq!(config.session.idle_timeout_secs, 1800);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<CofreConfig, _> = toml::from_str("[kdf]\nmemory_costt = 1024\n");
        assert!(result.is_err());
    }

    #[test]
    fn partial_section_fills_remaining_defaults() {
        let config: CofreConfig = toml::from_str("[session]\nidle_timeout_secs = 300\n").unwrap();
        assert_eq!(config.session.idle_timeout_secs, 300);
        assert_eq!(config.kdf.iterations, 3);
    }
}
