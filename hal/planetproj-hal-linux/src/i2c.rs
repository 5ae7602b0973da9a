//! I2C bus access through the Linux i2c-dev interface
//!
//! The adapter is opened once as a character device (`/dev/i2c-N`). Target
//! selection uses the `I2C_SLAVE` ioctl, presence checks use an SMBus quick
//! write and command frames go through plain `read`/`write` calls.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::ptr;

use planetproj_hal::{I2cBus, ProbeBus, SelectError};
use tracing::{debug, trace};

use crate::error::LinuxHalError;

// <linux/i2c-dev.h>
const I2C_SLAVE: libc::c_ulong = 0x0703;
const I2C_FUNCS: libc::c_ulong = 0x0705;
const I2C_SMBUS: libc::c_ulong = 0x0720;

// <linux/i2c.h>
const I2C_FUNC_I2C: libc::c_ulong = 0x0000_0001;
const I2C_FUNC_SMBUS_QUICK: libc::c_ulong = 0x0001_0000;
const I2C_SMBUS_WRITE: u8 = 0;
const I2C_SMBUS_QUICK: u32 = 0;

/// Capabilities the adapter must advertise
const REQUIRED_FUNCS: libc::c_ulong = I2C_FUNC_I2C | I2C_FUNC_SMBUS_QUICK;

/// Argument block of the `I2C_SMBUS` ioctl (`struct i2c_smbus_ioctl_data`)
#[repr(C)]
struct SmbusIoctlData {
    read_write: u8,
    command: u8,
    size: u32,
    data: *mut libc::c_void,
}

/// An opened i2c-dev adapter
#[derive(Debug)]
pub struct LinuxI2c {
    file: File,
    path: PathBuf,
    /// Address currently bound with `I2C_SLAVE`
    selected: Option<u8>,
}

impl LinuxI2c {
    /// Open an adapter device and check its capabilities
    ///
    /// The device is opened read/write in non-blocking mode. Adapters that
    /// cannot do both plain I2C transfers and SMBus quick writes are
    /// rejected with [`LinuxHalError::Unsupported`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LinuxHalError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&path)
            .map_err(|source| LinuxHalError::Open {
                path: path.clone(),
                source,
            })?;

        let bus = Self {
            file,
            path,
            selected: None,
        };

        let funcs = bus.functionality()?;
        if funcs & REQUIRED_FUNCS != REQUIRED_FUNCS {
            return Err(LinuxHalError::Unsupported {
                path: bus.path,
                funcs: u64::from(funcs),
            });
        }

        debug!(path = %bus.path.display(), funcs = format_args!("{funcs:#x}"), "opened I2C adapter");
        Ok(bus)
    }

    /// Path the adapter was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn functionality(&self) -> Result<libc::c_ulong, LinuxHalError> {
        let mut funcs: libc::c_ulong = 0;
        // SAFETY: I2C_FUNCS writes a single unsigned long through the pointer,
        // which refers to a live local of that type.
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), I2C_FUNCS as _, &mut funcs) };
        if rc < 0 {
            return Err(LinuxHalError::Ioctl {
                request: "I2C_FUNCS",
                source: io::Error::last_os_error(),
            });
        }
        Ok(funcs)
    }

    /// Bind `address` with `I2C_SLAVE`, always issuing the ioctl
    fn set_target(&mut self, address: u8) -> io::Result<()> {
        // SAFETY: I2C_SLAVE takes the address by value; no memory is shared.
        let rc = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                I2C_SLAVE as _,
                libc::c_ulong::from(address),
            )
        };
        if rc < 0 {
            self.selected = None;
            return Err(io::Error::last_os_error());
        }
        trace!(address = format_args!("0x{address:02x}"), "selected target");
        self.selected = Some(address);
        Ok(())
    }

    /// Bind `address` for a command transfer unless it is already bound
    fn select_for_transfer(&mut self, address: u8) -> Result<(), LinuxHalError> {
        if self.selected == Some(address) {
            return Ok(());
        }
        self.set_target(address).map_err(|source| {
            if source.raw_os_error() == Some(libc::EBUSY) {
                LinuxHalError::Busy(address)
            } else {
                LinuxHalError::Ioctl {
                    request: "I2C_SLAVE",
                    source,
                }
            }
        })
    }
}

impl ProbeBus for LinuxI2c {
    type Error = LinuxHalError;

    fn select_target(&mut self, address: u8) -> Result<(), SelectError<LinuxHalError>> {
        self.set_target(address).map_err(|source| {
            if source.raw_os_error() == Some(libc::EBUSY) {
                SelectError::Busy
            } else {
                SelectError::Bus(LinuxHalError::Ioctl {
                    request: "I2C_SLAVE",
                    source,
                })
            }
        })
    }

    fn quick_probe(&mut self) -> Result<(), LinuxHalError> {
        let mut args = SmbusIoctlData {
            read_write: I2C_SMBUS_WRITE,
            command: 0,
            size: I2C_SMBUS_QUICK,
            data: ptr::null_mut(),
        };
        // SAFETY: `args` matches struct i2c_smbus_ioctl_data and outlives the
        // call. A quick transfer never dereferences `data`.
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), I2C_SMBUS as _, &mut args) };
        if rc < 0 {
            return Err(LinuxHalError::Transfer {
                address: self.selected.unwrap_or_default(),
                source: io::Error::last_os_error(),
            });
        }
        Ok(())
    }
}

impl I2cBus for LinuxI2c {
    type Error = LinuxHalError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), LinuxHalError> {
        self.select_for_transfer(address)?;
        (&self.file)
            .write_all(data)
            .map_err(|source| LinuxHalError::Transfer { address, source })
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), LinuxHalError> {
        self.select_for_transfer(address)?;
        (&self.file)
            .read_exact(buf)
            .map_err(|source| LinuxHalError::Transfer { address, source })
    }
}
