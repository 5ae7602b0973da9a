//! I2C bus abstractions
//!
//! Two views of the same shared bus: [`ProbeBus`] for the minimal presence
//! check used by the watchdog, and [`I2cBus`] for sending framed commands.

/// Lowest non-reserved 7-bit address
pub const MIN_ADDRESS: u8 = 0x08;

/// Highest non-reserved 7-bit address
pub const MAX_ADDRESS: u8 = 0x77;

/// Check that an address is a usable 7-bit peripheral address
///
/// Addresses 0x00-0x07 and 0x78-0x7F are reserved by the bus specification.
pub const fn is_valid_address(address: u8) -> bool {
    address >= MIN_ADDRESS && address <= MAX_ADDRESS
}

/// Outcome of a failed target selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SelectError<E> {
    /// The address is claimed by another owner (e.g. a kernel driver)
    ///
    /// This is an arbitration condition, not evidence of absence.
    Busy,
    /// Any other failure; the bus itself is unusable
    Bus(E),
}

/// Bus able to select a target and check for its presence
pub trait ProbeBus {
    /// Error type for bus operations
    type Error;

    /// Make `address` the target of subsequent transactions
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    fn select_target(&mut self, address: u8) -> Result<(), SelectError<Self::Error>>;

    /// Issue a zero-length write ("quick" transaction) to the selected target
    ///
    /// `Ok` means the target acknowledged its address. No peripheral state is
    /// touched either way.
    fn quick_probe(&mut self) -> Result<(), Self::Error>;
}

/// I2C bus master
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}
