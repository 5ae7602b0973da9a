//! Liveness prober
//!
//! Establishes presence purely from bus-level acknowledgment. No command
//! frame is ever sent, so a health check cannot change peripheral state.

use planetproj_hal::{ProbeBus, SelectError};

/// Result of probing one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Liveness {
    /// Device acknowledged the quick probe
    Alive,
    /// Device did not acknowledge
    Dead,
    /// Address is claimed by another owner; the device is probably alive
    AmbiguousBusy,
}

impl Liveness {
    /// Whether the ok indicator should be lit
    ///
    /// A claimed address is evidence of an active owner, so
    /// [`Liveness::AmbiguousBusy`] counts as alive.
    pub fn is_alive_for_indicator(&self) -> bool {
        matches!(self, Liveness::Alive | Liveness::AmbiguousBusy)
    }

    /// Human-readable summary
    pub fn describe(&self) -> &'static str {
        match self {
            Liveness::Alive => "alive",
            Liveness::Dead => "dead",
            Liveness::AmbiguousBusy => "busy (maybe alive)",
        }
    }
}

/// Probe the peripheral at `address`
///
/// Returns `Err` only when target selection fails for a reason other than
/// the address being busy. That means the bus itself is broken and the
/// caller must stop probing.
pub fn probe<B: ProbeBus>(bus: &mut B, address: u8) -> Result<Liveness, B::Error> {
    match bus.select_target(address) {
        Ok(()) => {}
        Err(SelectError::Busy) => return Ok(Liveness::AmbiguousBusy),
        Err(SelectError::Bus(e)) => return Err(e),
    }

    match bus.quick_probe() {
        Ok(()) => Ok(Liveness::Alive),
        Err(_) => Ok(Liveness::Dead),
    }
}
