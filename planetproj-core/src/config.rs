//! Watchdog configuration types
//!
//! Board-agnostic configuration deserialized from TOML by the host
//! application.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::registry::{reference_devices, DeviceDescriptor, DeviceRegistry, RegistryError, MAX_DEVICES};
use crate::watchdog::DEFAULT_SETTLE_MS;

/// Complete watchdog configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WatchdogConfig {
    /// Delay between preparing lines and configuring them (ms)
    #[cfg_attr(feature = "serde", serde(default = "default_settle_ms"))]
    pub settle_ms: u32,
    /// Supervised devices, in probe order
    #[cfg_attr(feature = "serde", serde(rename = "device", default))]
    pub devices: Vec<DeviceDescriptor, MAX_DEVICES>,
}

#[cfg(feature = "serde")]
fn default_settle_ms() -> u32 {
    DEFAULT_SETTLE_MS
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl WatchdogConfig {
    /// Configuration of the reference deployment
    pub fn reference() -> Self {
        let mut devices = Vec::new();
        for device in reference_devices() {
            let _ = devices.push(device);
        }
        Self {
            settle_ms: DEFAULT_SETTLE_MS,
            devices,
        }
    }

    /// Validate the device table and build the registry
    pub fn registry(&self) -> Result<DeviceRegistry, RegistryError> {
        DeviceRegistry::new(&self.devices)
    }
}
