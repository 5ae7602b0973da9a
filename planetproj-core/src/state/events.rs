//! Events that trigger probe state transitions

use crate::probe::Liveness;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// The device's lines are configured and the probe is about to run
    ProbeStarted,
    /// The prober produced a classification
    Classified(Liveness),
}
