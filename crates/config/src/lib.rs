//! Larum Configuration Module
//!
//! This module provides the default resource limits and the file-backed
//! settings used to size a Larum virtual machine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default memory capacity in words
pub const DEFAULT_RAM_SIZE: usize = 4096;
/// Default data stack capacity in words
pub const DEFAULT_DATA_STACK_SIZE: usize = 100;
/// Default return stack capacity in words
pub const DEFAULT_RETURN_STACK_SIZE: usize = 100;
/// Largest memory capacity addressable by a signed 32-bit word
pub const MAX_RAM_SIZE: usize = i32::MAX as usize;
/// Largest capacity accepted for either stack
pub const MAX_STACK_SIZE: usize = 1 << 20;
/// Smallest data stack that can hold the two boot arguments
pub const MIN_DATA_STACK_SIZE: usize = 2;

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Resource settings for one VM instance.
///
/// Every field is optional in the TOML file; missing keys take the defaults
/// of the reference host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmSettings {
    /// Memory capacity in words
    pub ram_size: usize,
    /// Data stack capacity in words
    pub data_stack_size: usize,
    /// Return stack capacity in words
    pub return_stack_size: usize,
    /// Upper bound on executed opcodes, unbounded when absent
    pub max_steps: Option<u64>,
}

impl Default for VmSettings {
    fn default() -> Self {
        Self {
            ram_size: DEFAULT_RAM_SIZE,
            data_stack_size: DEFAULT_DATA_STACK_SIZE,
            return_stack_size: DEFAULT_RETURN_STACK_SIZE,
            max_steps: None,
        }
    }
}

impl VmSettings {
    /// Loads settings from a TOML file and validates them.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses settings from TOML text and validates them.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every capacity is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.ram_size == 0 {
            return Err(ConfigError::Invalid("ram_size must be positive".to_string()));
        }
        if self.ram_size > MAX_RAM_SIZE {
            return Err(ConfigError::Invalid(format!(
                "ram_size {} exceeds the addressable maximum {}",
                self.ram_size, MAX_RAM_SIZE
            )));
        }
        if self.data_stack_size < MIN_DATA_STACK_SIZE {
            return Err(ConfigError::Invalid(format!(
                "data_stack_size must be at least {MIN_DATA_STACK_SIZE} to hold the boot arguments"
            )));
        }
        if self.return_stack_size == 0 {
            return Err(ConfigError::Invalid(
                "return_stack_size must be positive".to_string(),
            ));
        }
        for (name, size) in [
            ("data_stack_size", self.data_stack_size),
            ("return_stack_size", self.return_stack_size),
        ] {
            if size > MAX_STACK_SIZE {
                return Err(ConfigError::Invalid(format!(
                    "{name} {size} exceeds the maximum {MAX_STACK_SIZE}"
                )));
            }
        }
        if self.max_steps == Some(0) {
            return Err(ConfigError::Invalid("max_steps must be positive".to_string()));
        }
        Ok(())
    }
}
