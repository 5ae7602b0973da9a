//! Protocol vocabulary shared with the peripheral firmware
//!
//! Opcodes, status codes and bus addresses are fixed constants compiled into
//! both sides; changing any of them requires reflashing every controller.

use crate::crc16;
use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use heapless::Vec;

// Opcodes
pub const CMD_STATUS: u8 = 0x10;
pub const CMD_SET_BRIGHTNESS: u8 = 0x20;
pub const CMD_SET_ROTATE: u8 = 0x30;
pub const CMD_SET_POWER: u8 = 0x31;
pub const CMD_SET_MAX_IDX: u8 = 0x32;
pub const CMD_SET_IDX_STEP: u8 = 0x33;

// Status codes carried by a STATUS reply
pub const STATUS_SUCCESS: u8 = 0x00;
pub const STATUS_WRONG_CHECKSUM: u8 = 0x01;
pub const STATUS_UNKNOWN_COMMAND: u8 = 0x02;
pub const STATUS_NOT_READY: u8 = 0x03;

// Peripheral bus addresses
pub const ADDR_LED_1: u8 = 0x30;
pub const ADDR_LED_2: u8 = 0x31;
pub const ADDR_MOTOR_1: u8 = 0x40;
pub const ADDR_MOTOR_2: u8 = 0x41;

/// Length of a STATUS reply: opcode, status, checksum
pub const STATUS_REPLY_LEN: usize = 2 + crc16::CRC_LEN;

/// Command and reply opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Opcode {
    /// Reply carrying a [`Status`]
    Status,
    /// LED brightness for one or more channels
    SetBrightness,
    /// Rotate a motor by a step count
    SetRotate,
    /// Drive strength of one motor coil
    SetPower,
    /// Upper bound of the motor step-interval index
    SetMaxIdx,
    /// Increment of the motor step-interval index
    SetIdxStep,
}

impl Opcode {
    /// Parse an opcode from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_STATUS => Some(Opcode::Status),
            CMD_SET_BRIGHTNESS => Some(Opcode::SetBrightness),
            CMD_SET_ROTATE => Some(Opcode::SetRotate),
            CMD_SET_POWER => Some(Opcode::SetPower),
            CMD_SET_MAX_IDX => Some(Opcode::SetMaxIdx),
            CMD_SET_IDX_STEP => Some(Opcode::SetIdxStep),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Opcode::Status => CMD_STATUS,
            Opcode::SetBrightness => CMD_SET_BRIGHTNESS,
            Opcode::SetRotate => CMD_SET_ROTATE,
            Opcode::SetPower => CMD_SET_POWER,
            Opcode::SetMaxIdx => CMD_SET_MAX_IDX,
            Opcode::SetIdxStep => CMD_SET_IDX_STEP,
        }
    }
}

/// Result code returned by a peripheral for each command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Command accepted
    Success,
    /// Command frame failed its checksum and was discarded
    WrongChecksum,
    /// Opcode not understood by this controller
    UnknownCommand,
    /// Controller is busy with a previous command
    NotReady,
}

impl Status {
    /// Parse a status from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            STATUS_SUCCESS => Some(Status::Success),
            STATUS_WRONG_CHECKSUM => Some(Status::WrongChecksum),
            STATUS_UNKNOWN_COMMAND => Some(Status::UnknownCommand),
            STATUS_NOT_READY => Some(Status::NotReady),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Status::Success => STATUS_SUCCESS,
            Status::WrongChecksum => STATUS_WRONG_CHECKSUM,
            Status::UnknownCommand => STATUS_UNKNOWN_COMMAND,
            Status::NotReady => STATUS_NOT_READY,
        }
    }

    /// Whether resending the same command may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Status::WrongChecksum | Status::NotReady)
    }
}

impl From<FrameError> for Status {
    /// How a receiver answers a frame it could not accept
    fn from(_: FrameError) -> Self {
        Status::WrongChecksum
    }
}

/// Errors parsing a STATUS reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplyError {
    /// Reply failed checksum or framing
    Frame(FrameError),
    /// Reply opcode was not STATUS
    UnexpectedOpcode(u8),
    /// Status byte outside the known vocabulary
    UnknownStatus(u8),
}

impl From<FrameError> for ReplyError {
    fn from(e: FrameError) -> Self {
        ReplyError::Frame(e)
    }
}

/// A STATUS reply read back after sending a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReply {
    pub status: Status,
}

impl StatusReply {
    /// Parse a reply, checking the checksum before anything else
    pub fn parse(bytes: &[u8]) -> Result<Self, ReplyError> {
        if bytes.len() != STATUS_REPLY_LEN {
            return Err(ReplyError::Frame(FrameError::InvalidFrame));
        }
        let body = crc16::verify(bytes)?;
        if body[0] != CMD_STATUS {
            return Err(ReplyError::UnexpectedOpcode(body[0]));
        }
        let status = Status::from_byte(body[1]).ok_or(ReplyError::UnknownStatus(body[1]))?;
        Ok(Self { status })
    }

    /// Build the reply frame a peripheral sends for `status`
    pub fn to_frame(&self) -> Frame {
        Frame {
            opcode: CMD_STATUS,
            payload: Vec::from_slice(&[self.status.to_byte()]).unwrap_or_default(),
        }
    }
}

/// Motor coil selector for [`Command::SetPower`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Coil {
    A = 0,
    B = 1,
}

/// Commands sent from the host to a peripheral
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Brightness levels as `(led_index, level)` pairs
    SetBrightness(&'a [(u8, u8)]),
    /// Rotate by `steps`, backwards when `reverse` is set
    SetRotate { reverse: bool, steps: u16 },
    /// Drive power of one coil
    SetPower { coil: Coil, power: u8 },
    /// Maximum step-interval index
    SetMaxIdx(u16),
    /// Step-interval index increment
    SetIdxStep(u16),
}

impl<'a> Command<'a> {
    /// Opcode this command is sent with
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::SetBrightness(_) => Opcode::SetBrightness,
            Command::SetRotate { .. } => Opcode::SetRotate,
            Command::SetPower { .. } => Opcode::SetPower,
            Command::SetMaxIdx(_) => Opcode::SetMaxIdx,
            Command::SetIdxStep(_) => Opcode::SetIdxStep,
        }
    }

    /// Encode this command into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let opcode = self.opcode().to_byte();
        match self {
            Command::SetBrightness(pairs) => {
                // Payload: [led][level][led][level]...
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                for &(led, level) in pairs.iter() {
                    payload
                        .extend_from_slice(&[led, level])
                        .map_err(|_| FrameError::PayloadTooLarge)?;
                }
                Frame::new(opcode, &payload)
            }
            Command::SetRotate { reverse, steps } => {
                let [lo, hi] = steps.to_le_bytes();
                Frame::new(opcode, &[*reverse as u8, lo, hi])
            }
            Command::SetPower { coil, power } => Frame::new(opcode, &[*coil as u8, *power]),
            Command::SetMaxIdx(value) | Command::SetIdxStep(value) => {
                Frame::new(opcode, &value.to_le_bytes())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip() {
        for byte in 0..=u8::MAX {
            if let Some(op) = Opcode::from_byte(byte) {
                assert_eq!(op.to_byte(), byte);
            }
        }
        assert_eq!(Opcode::from_byte(0x00), None);
    }

    #[test]
    fn test_status_vocabulary() {
        assert_eq!(Status::from_byte(0x00), Some(Status::Success));
        assert_eq!(Status::from_byte(0x01), Some(Status::WrongChecksum));
        assert_eq!(Status::from_byte(0x02), Some(Status::UnknownCommand));
        assert_eq!(Status::from_byte(0x03), Some(Status::NotReady));
        assert_eq!(Status::from_byte(0x04), None);
    }

    #[test]
    fn test_frame_errors_answer_wrong_checksum() {
        assert_eq!(Status::from(FrameError::WrongChecksum), Status::WrongChecksum);
        assert_eq!(Status::from(FrameError::InvalidFrame), Status::WrongChecksum);
    }

    #[test]
    fn test_status_reply_parse() {
        let frame = StatusReply { status: Status::NotReady }.to_frame();
        let bytes = frame.encode().unwrap();
        assert_eq!(bytes.len(), STATUS_REPLY_LEN);
        assert_eq!(
            StatusReply::parse(&bytes),
            Ok(StatusReply { status: Status::NotReady })
        );
    }

    #[test]
    fn test_status_reply_bad_checksum() {
        let mut bytes = StatusReply { status: Status::Success }
            .to_frame()
            .encode()
            .unwrap();
        bytes[3] ^= 0xFF;
        assert_eq!(
            StatusReply::parse(&bytes),
            Err(ReplyError::Frame(FrameError::WrongChecksum))
        );
    }

    #[test]
    fn test_status_reply_wrong_opcode() {
        let bytes = Frame::new(CMD_SET_POWER, &[0]).unwrap().encode().unwrap();
        assert_eq!(
            StatusReply::parse(&bytes),
            Err(ReplyError::UnexpectedOpcode(CMD_SET_POWER))
        );
    }

    #[test]
    fn test_status_reply_unknown_status() {
        let bytes = Frame::new(CMD_STATUS, &[0x7F]).unwrap().encode().unwrap();
        assert_eq!(StatusReply::parse(&bytes), Err(ReplyError::UnknownStatus(0x7F)));
    }

    #[test]
    fn test_brightness_payload() {
        let frame = Command::SetBrightness(&[(0, 255), (5, 128)]).to_frame().unwrap();
        assert_eq!(frame.opcode, CMD_SET_BRIGHTNESS);
        assert_eq!(frame.payload.as_slice(), &[0, 255, 5, 128]);
    }

    #[test]
    fn test_brightness_payload_too_large() {
        let pairs = [(0u8, 0u8); MAX_PAYLOAD_SIZE / 2 + 1];
        assert_eq!(
            Command::SetBrightness(&pairs).to_frame(),
            Err(FrameError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_rotate_payload() {
        let frame = Command::SetRotate { reverse: true, steps: 0x0164 }
            .to_frame()
            .unwrap();
        assert_eq!(frame.opcode, CMD_SET_ROTATE);
        assert_eq!(frame.payload.as_slice(), &[1, 0x64, 0x01]);
    }

    #[test]
    fn test_power_payload() {
        let frame = Command::SetPower { coil: Coil::B, power: 200 }
            .to_frame()
            .unwrap();
        assert_eq!(frame.opcode, CMD_SET_POWER);
        assert_eq!(frame.payload.as_slice(), &[1, 200]);
    }

    #[test]
    fn test_index_payloads() {
        let frame = Command::SetMaxIdx(300).to_frame().unwrap();
        assert_eq!(frame.opcode, CMD_SET_MAX_IDX);
        assert_eq!(frame.payload.as_slice(), &[0x2C, 0x01]);
        let frame = Command::SetIdxStep(2).to_frame().unwrap();
        assert_eq!(frame.opcode, CMD_SET_IDX_STEP);
        assert_eq!(frame.payload.as_slice(), &[2, 0]);
    }
}
