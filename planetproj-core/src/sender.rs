//! Framed command sender
//!
//! Writes a CRC-protected frame to a peripheral, reads back its STATUS
//! reply and resends on transient failures. This path is never used for
//! liveness checks.

use planetproj_hal::I2cBus;
use planetproj_protocol::{Command, Frame, FrameError, ReplyError, Status, StatusReply, STATUS_REPLY_LEN};

/// Default number of transmissions per command
pub const DEFAULT_MAX_ATTEMPTS: u8 = 3;

/// Why a single transmission did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttemptFailure {
    /// Peripheral answered with a transient status
    Status(Status),
    /// Reply was corrupted or malformed
    Reply(ReplyError),
}

/// Errors sending a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError<E> {
    /// Command could not be encoded
    Encode(FrameError),
    /// Bus transfer failed
    Bus(E),
    /// Peripheral refused the command outright
    Rejected(Status),
    /// Every attempt failed transiently
    RetriesExhausted { attempts: u8, last: AttemptFailure },
}

/// Sends framed commands over an [`I2cBus`]
pub struct CommandSender<B> {
    bus: B,
    max_attempts: u8,
}

impl<B: I2cBus> CommandSender<B> {
    /// Create a sender with [`DEFAULT_MAX_ATTEMPTS`]
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the number of transmissions per command (at least one)
    pub fn with_max_attempts(mut self, max_attempts: u8) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Access the underlying bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Release the underlying bus
    pub fn into_inner(self) -> B {
        self.bus
    }

    /// Encode and send a command
    ///
    /// Returns the number of transmissions it took.
    pub fn send(&mut self, address: u8, command: &Command<'_>) -> Result<u8, SendError<B::Error>> {
        let frame = command.to_frame().map_err(SendError::Encode)?;
        self.send_frame(address, &frame)
    }

    /// Send a prepared frame until it is acknowledged with SUCCESS
    pub fn send_frame(&mut self, address: u8, frame: &Frame) -> Result<u8, SendError<B::Error>> {
        let bytes = frame.encode().map_err(SendError::Encode)?;

        let mut last = AttemptFailure::Status(Status::NotReady);
        for attempt in 1..=self.max_attempts {
            self.bus.write(address, &bytes).map_err(SendError::Bus)?;

            let mut reply = [0u8; STATUS_REPLY_LEN];
            self.bus.read(address, &mut reply).map_err(SendError::Bus)?;

            match StatusReply::parse(&reply) {
                Ok(StatusReply {
                    status: Status::Success,
                }) => return Ok(attempt),
                Ok(StatusReply { status }) if status.is_transient() => {
                    last = AttemptFailure::Status(status);
                }
                Ok(StatusReply { status }) => return Err(SendError::Rejected(status)),
                Err(e) => last = AttemptFailure::Reply(e),
            }
        }

        Err(SendError::RetriesExhausted {
            attempts: self.max_attempts,
            last,
        })
    }
}
