//! Driver error type

use planetproj_core::SendError;

/// Errors returned by the peripheral drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError<E> {
    /// Command could not be delivered
    Send { address: u8, error: SendError<E> },
    /// No peripherals were given
    NoDevices,
    /// More peripherals than the driver can track
    TooManyDevices,
    /// Unsupported number of LEDs per controller
    InvalidLedCount(usize),
    /// LED index beyond the bank
    InvalidLed(usize),
    /// Motor index beyond the pair
    InvalidMotor(usize),
    /// Step count does not fit the 16-bit wire field
    StepsOutOfRange(i32),
}
