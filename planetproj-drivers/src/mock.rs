//! Command bus double for driver tests

use std::vec::Vec;

use planetproj_hal::I2cBus;
use planetproj_protocol::{Status, StatusReply, STATUS_REPLY_LEN};

/// Bus that records writes and answers every read with a fixed status
pub struct ReplyingBus {
    pub writes: Vec<(u8, Vec<u8>)>,
    status: Status,
}

impl ReplyingBus {
    pub fn new() -> Self {
        Self::answering(Status::Success)
    }

    pub fn answering(status: Status) -> Self {
        Self {
            writes: Vec::new(),
            status,
        }
    }

    /// Payloads written to `address`, opcode first
    pub fn frames_to(&self, address: u8) -> Vec<&[u8]> {
        self.writes
            .iter()
            .filter(|(a, _)| *a == address)
            .map(|(_, bytes)| &bytes[..bytes.len() - 2])
            .collect()
    }
}

impl I2cBus for ReplyingBus {
    type Error = ();

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), ()> {
        self.writes.push((address, data.to_vec()));
        Ok(())
    }

    fn read(&mut self, _address: u8, buf: &mut [u8]) -> Result<(), ()> {
        let reply = StatusReply {
            status: self.status,
        }
        .to_frame()
        .encode()
        .map_err(|_| ())?;
        assert_eq!(reply.len(), STATUS_REPLY_LEN);
        buf.copy_from_slice(&reply[..buf.len()]);
        Ok(())
    }
}
