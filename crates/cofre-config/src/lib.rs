// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Cofre credential vault.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! use cofre_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("database: {}", config.storage.database_path);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

use cofre_core::CofreError;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{CofreConfig, KdfConfig, SessionConfig, StorageConfig};
pub use validation::validate_config;

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<CofreConfig, CofreError> {
    let config = loader::load_config().map_err(|e| CofreError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<CofreConfig, CofreError> {
    let config =
        loader::load_config_from_str(toml_content).map_err(|e| CofreError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_validate_str_accepts_defaults() {
        let config = load_and_validate_str("").unwrap();
        assert_eq!(config.kdf.iterations, 3);
    }

    #[test]
    fn load_and_validate_str_rejects_weak_kdf() {
        let result = load_and_validate_str("[kdf]\nmemory_cost = 16\n");
        assert!(matches!(result, Err(CofreError::Config(_))));
    }
}
