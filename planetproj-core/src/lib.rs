//! Board-agnostic core logic for the projector host tools
//!
//! This crate contains all supervision and command logic that does not
//! depend on a specific bus or GPIO implementation:
//!
//! - Device registry (bus address to indicator line mapping)
//! - Liveness prober and its classification
//! - Per-device probe state machine and the watchdog cycle
//! - Command sender with bounded resend on transient status
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod indicator;
pub mod probe;
pub mod registry;
pub mod sender;
pub mod state;
pub mod watchdog;

#[cfg(test)]
pub(crate) mod mock;

pub use config::WatchdogConfig;
pub use indicator::IndicatorState;
pub use probe::{probe, Liveness};
pub use registry::{DeviceDescriptor, DeviceKind, DeviceRegistry, RegistryError};
pub use sender::{CommandSender, SendError};
pub use watchdog::{CycleReport, ProbeObserver, Watchdog, WatchdogError};
