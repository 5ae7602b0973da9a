//! Errors raised by the Linux backends

use std::io;
use std::path::PathBuf;

use planetproj_hal::LineId;
use thiserror::Error;

/// Error from an i2c-dev or sysfs GPIO operation
#[derive(Debug, Error)]
pub enum LinuxHalError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} does not support plain I2C and SMBus quick transfers (funcs {funcs:#x})", path.display())]
    Unsupported { path: PathBuf, funcs: u64 },

    #[error("{request} ioctl failed: {source}")]
    Ioctl {
        request: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("address 0x{0:02x} is claimed by another driver")]
    Busy(u8),

    #[error("transfer with 0x{address:02x} failed: {source}")]
    Transfer {
        address: u8,
        #[source]
        source: io::Error,
    },

    #[error("gpio{line}: cannot write {}: {source}", path.display())]
    Gpio {
        line: LineId,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
