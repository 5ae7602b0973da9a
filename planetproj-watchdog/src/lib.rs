//! Host application support for the projector peripherals
//!
//! Shared by the two binaries of this crate:
//!
//! - `planetproj-watchdog`: one probe cycle over the device table, lighting
//!   each device's health indicator
//! - `planetproj-ctl`: CRC calculator and manual LED/motor commands

pub mod config;
pub mod dry_run;
pub mod error;
pub mod logging;
pub mod report;

pub use config::{load_config, LoadedConfig};
pub use error::AppError;
pub use report::ConsoleReporter;
