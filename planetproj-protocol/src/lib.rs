//! Planetproj Peripheral Command Protocol
//!
//! This crate defines the I2C command protocol between the host (a Linux
//! single-board computer) and the LED and motor controllers sharing its bus.
//!
//! # Protocol Overview
//!
//! Every command is a single frame:
//! ```text
//! ┌────────┬─────────────┬────────┬────────┐
//! │ OPCODE │ PAYLOAD     │ CRC_LO │ CRC_HI │
//! │ 1B     │ 0–32B       │ 1B     │ 1B     │
//! └────────┴─────────────┴────────┴────────┘
//! ```
//!
//! The checksum is XMODEM-CRC16 (polynomial 0x1021, zero initial value, no
//! final XOR) over every byte before it, stored little-endian. Peripherals
//! answer with a status frame of the same shape carrying a [`Status`] code.
//! A frame whose checksum does not match is never acted upon.

#![no_std]
#![deny(unsafe_code)]

pub mod crc16;
pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameBytes, FrameError, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{Coil, Command, Opcode, ReplyError, Status, StatusReply, STATUS_REPLY_LEN};
