//! Device table loading
//!
//! Reads the TOML device table from a file or from the copy embedded at
//! build time, and validates it into a [`DeviceRegistry`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use planetproj_core::{DeviceRegistry, RegistryError, WatchdogConfig};
use thiserror::Error;
use tracing::{debug, info};

/// Reference device table, validated by the build script
pub const EMBEDDED_DEVICES: &str = include_str!("../../devices.toml");

/// Name used for the embedded table in messages
const EMBEDDED_ORIGIN: &str = "embedded devices.toml";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid device table in {origin}: {reason}")]
    Invalid { origin: String, reason: String },
}

/// A parsed configuration together with its validated registry
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: WatchdogConfig,
    pub registry: DeviceRegistry,
    /// Where the configuration came from
    pub origin: String,
}

/// Parse and validate a TOML device table
///
/// `origin` names the source in error messages.
pub fn parse_config(text: &str, origin: &str) -> Result<LoadedConfig, ConfigError> {
    let config: WatchdogConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source,
    })?;

    let registry = config.registry().map_err(|e| ConfigError::Invalid {
        origin: origin.to_string(),
        reason: describe_registry_error(e),
    })?;

    debug!(origin, devices = registry.len(), settle_ms = config.settle_ms, "device table loaded");
    Ok(LoadedConfig {
        config,
        registry,
        origin: origin.to_string(),
    })
}

/// Load the device table from `path`, or the embedded one when `None`
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading device table");
            let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            parse_config(&text, &path.display().to_string())
        }
        None => parse_config(EMBEDDED_DEVICES, EMBEDDED_ORIGIN),
    }
}

fn describe_registry_error(error: RegistryError) -> String {
    match error {
        RegistryError::Empty => "no devices configured".to_string(),
        RegistryError::TooManyDevices => "too many devices".to_string(),
        RegistryError::InvalidAddress(addr) => {
            format!("address 0x{addr:02x} is outside 0x08-0x77")
        }
        RegistryError::DuplicateAddress(addr) => format!("address 0x{addr:02x} is used twice"),
        RegistryError::DuplicateLine(line) => format!("line {line} is used twice"),
    }
}
