//! State machine definition

use super::events::Event;
use crate::indicator::IndicatorState;
use crate::probe::Liveness;

/// Probe states of one device within a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeState {
    /// Not yet visited in this cycle
    #[default]
    Start,
    /// Probe in progress
    Probing,
    /// Probed and found alive (or busy)
    Alive,
    /// Probed and found absent
    Dead,
}

impl ProbeState {
    /// Check if the cycle is finished for this device
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProbeState::Alive | ProbeState::Dead)
    }

    /// Indicator levels for this state, once terminal
    pub fn indicator(&self) -> Option<IndicatorState> {
        match self {
            ProbeState::Alive => Some(IndicatorState::OK),
            ProbeState::Dead => Some(IndicatorState::FAULT),
            _ => None,
        }
    }

    /// Process an event and return the next state
    ///
    /// Events that do not apply to the current state leave it unchanged.
    pub fn transition(self, event: Event) -> Self {
        use ProbeState::*;

        match (self, event) {
            (Start, Event::ProbeStarted) => Probing,
            (Probing, Event::Classified(Liveness::Alive | Liveness::AmbiguousBusy)) => Alive,
            (Probing, Event::Classified(Liveness::Dead)) => Dead,
            (state, _) => state,
        }
    }
}
