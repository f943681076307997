// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation.
//!
//! Figment guarantees the shapes; this module enforces the values that
//! serde cannot: KDF work factors must not fall below the interactive
//! floor and the database path must be set.

use cofre_core::CofreError;

use crate::model::CofreConfig;

/// Minimum Argon2id memory cost (KiB) accepted outside tests: 19 MiB,
/// the low end of the OWASP Argon2id parameter table.
pub const MIN_KDF_MEMORY_COST: u32 = 19 * 1024;

/// Minimum Argon2id iteration count.
pub const MIN_KDF_ITERATIONS: u32 = 2;

/// Validate a loaded configuration.
pub fn validate_config(config: &CofreConfig) -> Result<(), CofreError> {
    if config.kdf.memory_cost < MIN_KDF_MEMORY_COST {
        return Err(CofreError::Config(format!(
            "kdf.memory_cost = {} is below the minimum of {} KiB",
            config.kdf.memory_cost, MIN_KDF_MEMORY_COST
        )));
    }
    if config.kdf.iterations < MIN_KDF_ITERATIONS {
        return Err(CofreError::Config(format!(
            "kdf.iterations = {} is below the minimum of {}",
            config.kdf.iterations, MIN_KDF_ITERATIONS
        )));
    }
    if config.kdf.parallelism == 0 {
        return Err(CofreError::Config(
            "kdf.parallelism must be at least 1".to_string(),
        ));
    }
    if config.storage.database_path.is_empty() {
        return Err(CofreError::Config(
            "storage.database_path must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&CofreConfig::default()).is_ok());
    }

    #[test]
    fn undersized_memory_cost_is_rejected() {
        let mut config = CofreConfig::default();
        config.kdf.memory_cost = 64;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("memory_cost"));
    }

    #[test]
    fn zero_parallelism_is_rejected() {
        let mut config = CofreConfig::default();
        config.kdf.parallelism = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn empty_database_path_is_rejected() {
        let mut config = CofreConfig::default();
        config.storage.database_path.clear();
        assert!(validate_config(&config).is_err());
    }
}
