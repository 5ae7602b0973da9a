//! Indicator line abstractions
//!
//! An indicator line is a single digital output identified by a small
//! positive integer. Each supervised peripheral owns two of them: one that
//! signals "ok" and one that signals "fault".

/// Identifier of an indicator output line (e.g. a GPIO number)
pub type LineId = u16;

/// Operation performed on an indicator line, used in error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineOp {
    /// Making the line available to this process
    Prepare,
    /// Switching the line to output mode
    ConfigureOutput,
    /// Driving the line high or low
    Set,
}

/// A set of two-state output lines addressed by [`LineId`]
///
/// Implementations own whatever OS or register resources back the lines.
/// Every failure is reported to the caller; the watchdog treats all of them
/// as unrecoverable since it cannot signal health without its lines.
pub trait IndicatorLines {
    /// Error type for line operations
    type Error;

    /// Make the line available for use by this process
    ///
    /// Must be idempotent: preparing an already prepared line succeeds.
    /// The line may need a settle interval before it can be configured.
    fn prepare(&mut self, line: LineId) -> Result<(), Self::Error>;

    /// Configure a prepared line as a digital output
    fn configure_as_output(&mut self, line: LineId) -> Result<(), Self::Error>;

    /// Drive the line high (`true`) or low (`false`)
    fn set(&mut self, line: LineId, asserted: bool) -> Result<(), Self::Error>;

    /// Drive the line high
    fn assert(&mut self, line: LineId) -> Result<(), Self::Error> {
        self.set(line, true)
    }

    /// Drive the line low
    fn clear(&mut self, line: LineId) -> Result<(), Self::Error> {
        self.set(line, false)
    }
}
