//! Indicator lines on the sysfs GPIO interface
//!
//! Lines are exported through `<root>/export` and then driven through the
//! `direction` and `value` attributes of `<root>/gpioN`. The root defaults to
//! `/sys/class/gpio` and can be pointed elsewhere for testing.

use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use planetproj_hal::{IndicatorLines, LineId};
use tracing::{debug, trace};

use crate::error::LinuxHalError;

/// Standard location of the sysfs GPIO class
pub const DEFAULT_GPIO_ROOT: &str = "/sys/class/gpio";

/// Sysfs GPIO lines with export tracking
#[derive(Debug)]
pub struct SysfsGpio {
    root: PathBuf,
    /// Lines known to be exported
    prepared: BTreeSet<LineId>,
}

impl Default for SysfsGpio {
    fn default() -> Self {
        Self::new(DEFAULT_GPIO_ROOT)
    }
}

impl SysfsGpio {
    /// Create a backend rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prepared: BTreeSet::new(),
        }
    }

    /// Root directory of the GPIO class
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if a line has been prepared by this backend
    pub fn is_prepared(&self, line: LineId) -> bool {
        self.prepared.contains(&line)
    }

    fn line_dir(&self, line: LineId) -> PathBuf {
        self.root.join(format!("gpio{line}"))
    }

    fn write_attr(&self, line: LineId, path: PathBuf, value: &str) -> Result<(), LinuxHalError> {
        trace!(path = %path.display(), value, "sysfs write");
        OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .and_then(|mut file| file.write_all(value.as_bytes()))
            .map_err(|source| LinuxHalError::Gpio { line, path, source })
    }
}

impl IndicatorLines for SysfsGpio {
    type Error = LinuxHalError;

    fn prepare(&mut self, line: LineId) -> Result<(), LinuxHalError> {
        if self.prepared.contains(&line) || self.line_dir(line).is_dir() {
            self.prepared.insert(line);
            return Ok(());
        }

        match self.write_attr(line, self.root.join("export"), &line.to_string()) {
            Ok(()) => debug!(line, "exported"),
            // Raced with another exporter; the line is there either way
            Err(LinuxHalError::Gpio { ref source, .. })
                if source.raw_os_error() == Some(libc::EBUSY) =>
            {
                debug!(line, "already exported");
            }
            Err(e) => return Err(e),
        }
        self.prepared.insert(line);
        Ok(())
    }

    fn configure_as_output(&mut self, line: LineId) -> Result<(), LinuxHalError> {
        self.write_attr(line, self.line_dir(line).join("direction"), "out")
    }

    fn set(&mut self, line: LineId, asserted: bool) -> Result<(), LinuxHalError> {
        let value = if asserted { "1" } else { "0" };
        self.write_attr(line, self.line_dir(line).join("value"), value)
    }
}
