//! Console reporting of probe results

use std::io::{self, Write};

use planetproj_core::{DeviceDescriptor, Liveness, ProbeObserver};
use tracing::{info, warn};

/// Prints one line per probed device and mirrors it to tracing
pub struct ConsoleReporter<W> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Flush the output and surface the first write error, if any
    pub fn finish(&mut self) -> io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()
    }

    /// Release the output
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProbeObserver for ConsoleReporter<W> {
    fn on_result(&mut self, device: &DeviceDescriptor, liveness: Liveness) {
        let name = device.name.as_str();
        let address = format!("0x{:02x}", device.address);
        match liveness {
            Liveness::Alive => info!(name, %address, "device alive"),
            Liveness::AmbiguousBusy => info!(name, %address, "device busy, counted as alive"),
            Liveness::Dead => warn!(name, %address, "device not responding"),
        }

        if self.error.is_none() {
            if let Err(e) = writeln!(
                self.out,
                "Slave 0x{:02x} is {}",
                device.address,
                liveness.describe()
            ) {
                self.error = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use planetproj_core::{DeviceRegistry, Watchdog};
    use planetproj_hal::{ProbeBus, SelectError};
    use planetproj_hal_linux::{StdDelay, SysfsGpio};

    /// Bus where 0x30 is busy, 0x31 and 0x40 answer and the rest are absent
    struct BenchBus {
        selected: u8,
    }

    impl ProbeBus for BenchBus {
        type Error = ();

        fn select_target(&mut self, address: u8) -> Result<(), SelectError<()>> {
            if address == 0x30 {
                return Err(SelectError::Busy);
            }
            self.selected = address;
            Ok(())
        }

        fn quick_probe(&mut self) -> Result<(), ()> {
            match self.selected {
                0x31 | 0x40 => Ok(()),
                _ => Err(()),
            }
        }
    }

    fn gpio_tree(registry: &DeviceRegistry) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("export"), "").unwrap();
        for line in registry.lines() {
            let line_dir = dir.path().join(format!("gpio{line}"));
            fs::create_dir(&line_dir).unwrap();
            fs::write(line_dir.join("direction"), "in").unwrap();
            fs::write(line_dir.join("value"), "0").unwrap();
        }
        dir
    }

    fn value(root: &Path, line: u16) -> String {
        fs::read_to_string(root.join(format!("gpio{line}/value"))).unwrap()
    }

    #[test]
    fn test_reference_cycle_on_fake_sysfs() {
        let registry = DeviceRegistry::reference();
        let root = gpio_tree(&registry);

        let mut watchdog = Watchdog::new(
            &registry,
            BenchBus { selected: 0 },
            SysfsGpio::new(root.path()),
            StdDelay,
        )
        .with_settle_ms(0);
        let mut reporter = ConsoleReporter::new(Vec::new());
        let report = watchdog.run_cycle(&mut reporter).unwrap();
        reporter.finish().unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();

        assert_eq!(
            out,
            "Slave 0x30 is busy (maybe alive)\n\
             Slave 0x31 is alive\n\
             Slave 0x40 is alive\n\
             Slave 0x41 is dead\n"
        );
        assert_eq!(report.alive_count(), 3);

        for device in &registry {
            let alive = device.address != 0x41;
            let (lit, dark) = if alive {
                (device.ok_line, device.fault_line)
            } else {
                (device.fault_line, device.ok_line)
            };
            assert_eq!(value(root.path(), lit), "1", "{}", device.name);
            assert_eq!(value(root.path(), dark), "0", "{}", device.name);
            let direction = root.path().join(format!("gpio{}/direction", device.ok_line));
            assert_eq!(fs::read_to_string(direction).unwrap(), "out");
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_surfaces_on_finish() {
        let registry = DeviceRegistry::reference();
        let device = registry.iter().next().unwrap();
        let mut reporter = ConsoleReporter::new(BrokenPipe);
        reporter.on_result(device, Liveness::Alive);
        reporter.on_result(device, Liveness::Dead);
        let err = reporter.finish().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        reporter.finish().unwrap();
    }
}
