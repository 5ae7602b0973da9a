//! Device registry
//!
//! The fixed, ordered table of supervised peripherals. Built once at startup
//! from configuration and only ever read afterwards.

use heapless::{String, Vec};
use planetproj_hal::{is_valid_address, LineId};
use planetproj_protocol::messages::{ADDR_LED_1, ADDR_LED_2, ADDR_MOTOR_1, ADDR_MOTOR_2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum devices per registry
pub const MAX_DEVICES: usize = 8;

/// Maximum device name length
pub const MAX_NAME_LEN: usize = 16;

/// Kind of peripheral controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DeviceKind {
    /// LED brightness controller
    #[default]
    Led,
    /// Stepper motor controller
    Motor,
}

/// One supervised peripheral and its health indicator lines
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceDescriptor {
    /// Short name used in reports (e.g. "led1")
    pub name: String<MAX_NAME_LEN>,
    /// Controller kind
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: DeviceKind,
    /// 7-bit bus address
    pub address: u8,
    /// Line asserted while the device is alive (green)
    pub ok_line: LineId,
    /// Line asserted while the device is dead (red)
    pub fault_line: LineId,
}

impl DeviceDescriptor {
    /// Create a descriptor; names longer than [`MAX_NAME_LEN`] are truncated
    pub fn new(
        name: &str,
        kind: DeviceKind,
        address: u8,
        ok_line: LineId,
        fault_line: LineId,
    ) -> Self {
        let mut short = String::new();
        for c in name.chars() {
            if short.push(c).is_err() {
                break;
            }
        }
        Self {
            name: short,
            kind,
            address,
            ok_line,
            fault_line,
        }
    }

    /// Both indicator lines, ok line first
    pub fn lines(&self) -> [LineId; 2] {
        [self.ok_line, self.fault_line]
    }
}

/// Registry validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// No devices configured
    Empty,
    /// More than [`MAX_DEVICES`] devices
    TooManyDevices,
    /// Address outside the usable 7-bit range
    InvalidAddress(u8),
    /// Two devices share an address
    DuplicateAddress(u8),
    /// A line id is used more than once
    DuplicateLine(LineId),
}

/// Ordered, immutable table of supervised devices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRegistry {
    devices: Vec<DeviceDescriptor, MAX_DEVICES>,
}

impl DeviceRegistry {
    /// Build a registry, validating addresses and line assignments
    pub fn new(devices: &[DeviceDescriptor]) -> Result<Self, RegistryError> {
        if devices.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut table: Vec<DeviceDescriptor, MAX_DEVICES> = Vec::new();
        for device in devices {
            if !is_valid_address(device.address) {
                return Err(RegistryError::InvalidAddress(device.address));
            }
            if device.ok_line == device.fault_line {
                return Err(RegistryError::DuplicateLine(device.ok_line));
            }
            for seen in table.iter() {
                if seen.address == device.address {
                    return Err(RegistryError::DuplicateAddress(device.address));
                }
                for line in device.lines() {
                    if seen.lines().contains(&line) {
                        return Err(RegistryError::DuplicateLine(line));
                    }
                }
            }
            table
                .push(device.clone())
                .map_err(|_| RegistryError::TooManyDevices)?;
        }

        Ok(Self { devices: table })
    }

    /// The reference deployment: two LED and two motor controllers
    pub fn reference() -> Self {
        let mut devices = Vec::new();
        for device in reference_devices() {
            // Four entries always fit
            let _ = devices.push(device);
        }
        Self { devices }
    }

    /// Iterate devices in registry order
    pub fn iter(&self) -> core::slice::Iter<'_, DeviceDescriptor> {
        self.devices.iter()
    }

    /// Visit every device in registry order
    pub fn for_each<F: FnMut(&DeviceDescriptor)>(&self, f: F) {
        self.devices.iter().for_each(f);
    }

    /// Every indicator line, in registry order
    pub fn lines(&self) -> impl Iterator<Item = LineId> + '_ {
        self.devices.iter().flat_map(|d| d.lines())
    }

    /// Find a device by bus address
    pub fn find(&self, address: u8) -> Option<&DeviceDescriptor> {
        self.devices.iter().find(|d| d.address == address)
    }

    /// Number of devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether the registry has no devices (never true once built)
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl<'a> IntoIterator for &'a DeviceRegistry {
    type Item = &'a DeviceDescriptor;
    type IntoIter = core::slice::Iter<'a, DeviceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}

/// Descriptors of the reference deployment
pub fn reference_devices() -> [DeviceDescriptor; 4] {
    [
        DeviceDescriptor::new("led1", DeviceKind::Led, ADDR_LED_1, 10, 22),
        DeviceDescriptor::new("led2", DeviceKind::Led, ADDR_LED_2, 5, 11),
        DeviceDescriptor::new("motor1", DeviceKind::Motor, ADDR_MOTOR_1, 13, 6),
        DeviceDescriptor::new("motor2", DeviceKind::Motor, ADDR_MOTOR_2, 26, 19),
    ]
}
