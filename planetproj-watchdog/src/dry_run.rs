//! Bus stand-in for `--dry-run`
//!
//! Prints every frame instead of putting it on the bus and acknowledges it
//! with a SUCCESS status reply.

use std::io::{self, Write};

use planetproj_hal::I2cBus;
use planetproj_protocol::{Status, StatusReply};
use tracing::debug;

/// [`I2cBus`] that logs writes and always succeeds
pub struct DryRunBus<W> {
    out: W,
}

impl<W: Write> DryRunBus<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> I2cBus for DryRunBus<W> {
    type Error = io::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> io::Result<()> {
        debug!(address = format!("0x{address:02x}"), len = data.len(), "dry-run write");
        write!(self.out, "Writing to 0x{address:02x}:")?;
        for byte in data {
            write!(self.out, " {byte:02x}")?;
        }
        writeln!(self.out)
    }

    fn read(&mut self, _address: u8, buf: &mut [u8]) -> io::Result<()> {
        let reply = StatusReply {
            status: Status::Success,
        }
        .to_frame()
        .encode()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{e:?}")))?;
        let n = buf.len().min(reply.len());
        buf[..n].copy_from_slice(&reply[..n]);
        Ok(())
    }
}
