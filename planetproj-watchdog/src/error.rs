//! Application error type

use std::convert::Infallible;
use std::io;

use planetproj_core::{SendError, WatchdogError};
use planetproj_drivers::DriverError;
use planetproj_hal::{LineId, LineOp};
use planetproj_hal_linux::LinuxHalError;
use thiserror::Error;

use crate::config::ConfigError;

/// Anything that makes a binary exit with a failure status
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Hal(#[from] LinuxHalError),

    #[error("cannot {op} indicator line {line}")]
    Indicator {
        line: LineId,
        op: &'static str,
        #[source]
        source: LinuxHalError,
    },

    #[error("cannot select 0x{address:02x} on the bus")]
    Bus {
        address: u8,
        #[source]
        source: LinuxHalError,
    },

    #[error("command to 0x{address:02x} failed: {reason}")]
    Command { address: u8, reason: String },

    #[error("{0}")]
    Invalid(String),

    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}

fn op_name(op: LineOp) -> &'static str {
    match op {
        LineOp::Prepare => "export",
        LineOp::ConfigureOutput => "configure",
        LineOp::Set => "drive",
    }
}

impl From<WatchdogError<LinuxHalError, LinuxHalError>> for AppError {
    fn from(e: WatchdogError<LinuxHalError, LinuxHalError>) -> Self {
        match e {
            WatchdogError::Indicator(failure) => AppError::Indicator {
                line: failure.line,
                op: op_name(failure.op),
                source: failure.error,
            },
            WatchdogError::Bus { address, error } => AppError::Bus {
                address,
                source: error,
            },
        }
    }
}

impl From<Infallible> for AppError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

impl<E: Into<AppError>> From<DriverError<E>> for AppError {
    fn from(e: DriverError<E>) -> Self {
        match e {
            DriverError::Send { address, error } => match error {
                SendError::Bus(e) => e.into(),
                SendError::Encode(e) => AppError::Command {
                    address,
                    reason: format!("cannot encode frame ({e:?})"),
                },
                SendError::Rejected(status) => AppError::Command {
                    address,
                    reason: format!("peripheral answered {status:?}"),
                },
                SendError::RetriesExhausted { attempts, last } => AppError::Command {
                    address,
                    reason: format!("no success after {attempts} attempts, last {last:?}"),
                },
            },
            DriverError::NoDevices => AppError::Invalid("no peripherals configured".into()),
            DriverError::TooManyDevices => AppError::Invalid("too many peripherals".into()),
            DriverError::InvalidLedCount(n) => {
                AppError::Invalid(format!("unsupported LED count per controller: {n}"))
            }
            DriverError::InvalidLed(led) => AppError::Invalid(format!("no LED {led}")),
            DriverError::InvalidMotor(motor) => AppError::Invalid(format!("no motor {motor}")),
            DriverError::StepsOutOfRange(steps) => {
                AppError::Invalid(format!("{steps} steps exceeds the 16-bit step range"))
            }
        }
    }
}
