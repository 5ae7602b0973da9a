//! XMODEM-CRC16 codec
//!
//! Polynomial 0x1021, initial register 0, no reflection, no final XOR.
//! The checksum trails the protected bytes in little-endian order.

use crate::frame::{FrameBytes, FrameError};

/// Generator polynomial
pub const POLYNOMIAL: u16 = 0x1021;

/// Initial register value
pub const INIT: u16 = 0x0000;

/// Size of the trailing checksum field
pub const CRC_LEN: usize = 2;

/// Feed one byte into a running checksum register
pub const fn update(crc: u16, byte: u8) -> u16 {
    let mut crc = crc ^ ((byte as u16) << 8);
    let mut i = 0;
    while i < 8 {
        if crc & 0x8000 != 0 {
            crc = (crc << 1) ^ POLYNOMIAL;
        } else {
            crc <<= 1;
        }
        i += 1;
    }
    crc
}

/// Compute the checksum of a byte buffer
pub fn compute(data: &[u8]) -> u16 {
    data.iter().fold(INIT, |crc, &byte| update(crc, byte))
}

/// Return `data` followed by its checksum (low byte first)
pub fn append(data: &[u8]) -> Result<FrameBytes, FrameError> {
    let mut out = FrameBytes::new();
    out.extend_from_slice(data)
        .map_err(|_| FrameError::PayloadTooLarge)?;
    out.extend_from_slice(&compute(data).to_le_bytes())
        .map_err(|_| FrameError::PayloadTooLarge)?;
    Ok(out)
}

/// Check the trailing little-endian checksum of a buffer
///
/// Returns `Err(FrameError::InvalidFrame)` when the buffer is too short to
/// contain a checksum at all.
pub fn check(data: &[u8]) -> Result<bool, FrameError> {
    let (body, stored) = split(data)?;
    Ok(compute(body) == stored)
}

/// Verify a buffer and return the bytes covered by its checksum
///
/// A mismatch is always [`FrameError::WrongChecksum`].
pub fn verify(data: &[u8]) -> Result<&[u8], FrameError> {
    let (body, stored) = split(data)?;
    if compute(body) != stored {
        return Err(FrameError::WrongChecksum);
    }
    Ok(body)
}

fn split(data: &[u8]) -> Result<(&[u8], u16), FrameError> {
    if data.len() < CRC_LEN {
        return Err(FrameError::InvalidFrame);
    }
    let (body, tail) = data.split_at(data.len() - CRC_LEN);
    Ok((body, u16::from_le_bytes([tail[0], tail[1]])))
}
