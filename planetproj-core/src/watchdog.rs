//! Watchdog cycle
//!
//! One cycle prepares every indicator line, waits once for the lines to
//! settle, then probes each device in registry order and lights its
//! indicator. The cycle is a point-in-time sample: no history, no retry,
//! no debounce.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use planetproj_hal::{IndicatorLines, LineOp, ProbeBus};

use crate::indicator::{self, LineFailure};
use crate::probe::{probe, Liveness};
use crate::registry::{DeviceDescriptor, DeviceRegistry, MAX_DEVICES};
use crate::state::{Event, ProbeState};

/// Wait after preparing lines before configuring them
pub const DEFAULT_SETTLE_MS: u32 = 100;

/// Receives the classification of every probed device
pub trait ProbeObserver {
    /// Called once per device, after its indicator has been updated
    fn on_result(&mut self, device: &DeviceDescriptor, liveness: Liveness);
}

impl ProbeObserver for () {
    fn on_result(&mut self, _device: &DeviceDescriptor, _liveness: Liveness) {}
}

/// Conditions that abort a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchdogError<BE, LE> {
    /// An indicator line could not be prepared, configured or driven
    Indicator(LineFailure<LE>),
    /// Target selection failed for a reason other than busy
    Bus { address: u8, error: BE },
}

impl<BE, LE> From<LineFailure<LE>> for WatchdogError<BE, LE> {
    fn from(failure: LineFailure<LE>) -> Self {
        WatchdogError::Indicator(failure)
    }
}

/// Classifications of one completed cycle, in registry order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    results: Vec<(u8, Liveness), MAX_DEVICES>,
}

impl CycleReport {
    fn record(&mut self, address: u8, liveness: Liveness) {
        // One entry per registry device, which is itself bounded
        let _ = self.results.push((address, liveness));
    }

    /// Classification of the device at `address`
    pub fn get(&self, address: u8) -> Option<Liveness> {
        self.results
            .iter()
            .find(|(a, _)| *a == address)
            .map(|(_, l)| *l)
    }

    /// All `(address, classification)` pairs
    pub fn iter(&self) -> impl Iterator<Item = &(u8, Liveness)> {
        self.results.iter()
    }

    /// Number of devices classified
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no device was classified
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of devices lit as alive
    pub fn alive_count(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, l)| l.is_alive_for_indicator())
            .count()
    }
}

/// Drives the probe/indicator cycle over a registry
pub struct Watchdog<'r, B, L, D> {
    registry: &'r DeviceRegistry,
    bus: B,
    lines: L,
    delay: D,
    settle_ms: u32,
}

impl<'r, B, L, D> Watchdog<'r, B, L, D>
where
    B: ProbeBus,
    L: IndicatorLines,
    D: DelayNs,
{
    /// Create a watchdog with the default settle delay
    pub fn new(registry: &'r DeviceRegistry, bus: B, lines: L, delay: D) -> Self {
        Self {
            registry,
            bus,
            lines,
            delay,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }

    /// Override the settle delay
    pub fn with_settle_ms(mut self, settle_ms: u32) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    /// Registry this watchdog walks
    pub fn registry(&self) -> &'r DeviceRegistry {
        self.registry
    }

    /// Indicator lines, for inspection
    pub fn lines(&self) -> &L {
        &self.lines
    }

    /// Release the owned resources
    pub fn into_parts(self) -> (B, L, D) {
        (self.bus, self.lines, self.delay)
    }

    /// Prepare every line of every device, then wait once for them to settle
    pub fn prepare_lines(&mut self) -> Result<(), WatchdogError<B::Error, L::Error>> {
        for line in self.registry.lines() {
            self.lines.prepare(line).map_err(|error| LineFailure {
                line,
                op: LineOp::Prepare,
                error,
            })?;
        }
        self.delay.delay_ms(self.settle_ms);
        Ok(())
    }

    /// Run one full cycle
    ///
    /// A fatal condition returns immediately; devices after the failing one
    /// keep whatever indicator state they already had.
    pub fn run_cycle<O: ProbeObserver>(
        &mut self,
        observer: &mut O,
    ) -> Result<CycleReport, WatchdogError<B::Error, L::Error>> {
        self.prepare_lines()?;

        let registry = self.registry;
        let mut report = CycleReport::default();
        for device in registry.iter() {
            let liveness = self.check_device(device)?;
            observer.on_result(device, liveness);
            report.record(device.address, liveness);
        }
        Ok(report)
    }

    fn check_device(
        &mut self,
        device: &DeviceDescriptor,
    ) -> Result<Liveness, WatchdogError<B::Error, L::Error>> {
        let mut state = ProbeState::Start;

        indicator::configure(&mut self.lines, device)?;
        state = state.transition(Event::ProbeStarted);

        let liveness = probe(&mut self.bus, device.address).map_err(|error| WatchdogError::Bus {
            address: device.address,
            error,
        })?;
        state = state.transition(Event::Classified(liveness));

        if let Some(levels) = state.indicator() {
            indicator::drive(&mut self.lines, device, levels)?;
        }
        Ok(liveness)
    }
}
