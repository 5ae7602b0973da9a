//! Frame encoding and decoding for the peripheral command protocol.
//!
//! Frame format:
//! - OPCODE (1 byte): command or reply identifier
//! - PAYLOAD (0-32 bytes): opcode-specific data
//! - CHECKSUM (2 bytes): XMODEM-CRC16 of OPCODE and PAYLOAD, little-endian

use heapless::Vec;

use crate::crc16;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 32;

/// Maximum complete frame size (OPCODE + MAX_PAYLOAD + CHECKSUM)
pub const MAX_FRAME_SIZE: usize = 1 + MAX_PAYLOAD_SIZE + crc16::CRC_LEN;

/// Smallest decodable frame (OPCODE + CHECKSUM)
pub const MIN_FRAME_SIZE: usize = 1 + crc16::CRC_LEN;

/// Encoded frame bytes
pub type FrameBytes = Vec<u8, MAX_FRAME_SIZE>;

/// Errors that can occur during frame encoding or validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Trailing checksum does not match the frame contents
    WrongChecksum,
    /// Buffer too short to hold the frame structure
    InvalidFrame,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Opcode byte
    pub opcode: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given opcode and payload
    pub fn new(opcode: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            opcode,
            payload: payload_vec,
        })
    }

    /// Create a frame with no payload
    pub fn empty(opcode: u8) -> Self {
        Self {
            opcode,
            payload: Vec::new(),
        }
    }

    /// Encoded length of this frame
    pub fn encoded_len(&self) -> usize {
        1 + self.payload.len() + crc16::CRC_LEN
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode_into(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::PayloadTooLarge);
        }

        let body_len = 1 + self.payload.len();
        buffer[0] = self.opcode;
        buffer[1..body_len].copy_from_slice(&self.payload);
        let crc = crc16::compute(&buffer[..body_len]);
        buffer[body_len..frame_len].copy_from_slice(&crc.to_le_bytes());

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode(&self) -> Result<FrameBytes, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode_into(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(vec)
    }

    /// Decode a complete frame, validating its checksum first
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < MIN_FRAME_SIZE {
            return Err(FrameError::InvalidFrame);
        }
        if bytes.len() > MAX_FRAME_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }
        let body = crc16::verify(bytes)?;
        Self::new(body[0], &body[1..])
    }
}
