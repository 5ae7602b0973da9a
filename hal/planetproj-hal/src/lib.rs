//! Planetproj Hardware Abstraction Layer
//!
//! This crate defines the narrow hardware interfaces the host tools need
//! to supervise and command the projector peripherals. Platform crates
//! implement them; the core logic only ever sees these traits, so it can be
//! exercised against simulated buses and lines.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  planetproj-core / planetproj-drivers   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  planetproj-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!         ┌───────────────────────┐
//!         │ planetproj-hal-linux  │
//!         │ (i2c-dev, sysfs gpio) │
//!         └───────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::IndicatorLines`] - Two-state indicator output lines
//! - [`i2c::ProbeBus`] - Target selection and presence probing
//! - [`i2c::I2cBus`] - Addressed byte transfers for framed commands

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use gpio::{IndicatorLines, LineId, LineOp};
pub use i2c::{is_valid_address, I2cBus, ProbeBus, SelectError};
