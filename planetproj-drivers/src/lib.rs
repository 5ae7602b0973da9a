//! Peripheral drivers
//!
//! Host-side views of the projector peripherals, built on the framed
//! command sender from planetproj-core:
//!
//! - LED controllers (per-LED brightness)
//! - Stepper motor controllers (relative rotation, coil power)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod error;
pub mod led;
pub mod motor;

#[cfg(test)]
pub(crate) mod mock;

pub use error::DriverError;
pub use led::LedBank;
pub use motor::MotorPair;
