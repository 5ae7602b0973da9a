//! Simulated bus and indicator lines for unit tests

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::vec::Vec;

use planetproj_hal::{I2cBus, IndicatorLines, LineId, LineOp, ProbeBus, SelectError};

/// Error returned by the mocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    /// Line used before prepare/configure
    NotReady(LineId),
    /// Failure injected by the test
    Injected,
    /// No device acknowledged
    Nack,
}

/// How a simulated address responds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusBehavior {
    Ack,
    Nack,
    Busy,
    SelectFails,
}

/// Probe bus with fixed per-address behavior
pub struct MockBus {
    behaviors: BTreeMap<u8, BusBehavior>,
    selected: Option<u8>,
    selects: Vec<u8>,
    quick_probes: usize,
}

impl MockBus {
    pub fn new(behaviors: &[(u8, BusBehavior)]) -> Self {
        Self {
            behaviors: behaviors.iter().copied().collect(),
            selected: None,
            selects: Vec::new(),
            quick_probes: 0,
        }
    }

    fn behavior(&self, address: u8) -> BusBehavior {
        self.behaviors
            .get(&address)
            .copied()
            .unwrap_or(BusBehavior::Nack)
    }

    pub fn selects(&self) -> &[u8] {
        &self.selects
    }

    pub fn quick_probes(&self) -> usize {
        self.quick_probes
    }
}

impl ProbeBus for MockBus {
    type Error = MockError;

    fn select_target(&mut self, address: u8) -> Result<(), SelectError<MockError>> {
        self.selects.push(address);
        match self.behavior(address) {
            BusBehavior::Busy => Err(SelectError::Busy),
            BusBehavior::SelectFails => Err(SelectError::Bus(MockError::Injected)),
            _ => {
                self.selected = Some(address);
                Ok(())
            }
        }
    }

    fn quick_probe(&mut self) -> Result<(), MockError> {
        self.quick_probes += 1;
        match self.selected.map(|a| self.behavior(a)) {
            Some(BusBehavior::Ack) => Ok(()),
            _ => Err(MockError::Nack),
        }
    }
}

/// Indicator lines that enforce prepare → configure → set ordering
#[derive(Default)]
pub struct MockLines {
    prepared: BTreeSet<LineId>,
    outputs: BTreeSet<LineId>,
    levels: BTreeMap<LineId, bool>,
    history: Vec<(LineId, bool)>,
    prepare_calls: usize,
    failures: Vec<(LineId, LineOp)>,
}

impl MockLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&mut self, line: LineId, op: LineOp) {
        self.failures.push((line, op));
    }

    fn check_failure(&self, line: LineId, op: LineOp) -> Result<(), MockError> {
        if self.failures.contains(&(line, op)) {
            return Err(MockError::Injected);
        }
        Ok(())
    }

    pub fn level(&self, line: LineId) -> Option<bool> {
        self.levels.get(&line).copied()
    }

    pub fn levels(&self) -> &BTreeMap<LineId, bool> {
        &self.levels
    }

    pub fn is_prepared(&self, line: LineId) -> bool {
        self.prepared.contains(&line)
    }

    pub fn prepare_calls(&self) -> usize {
        self.prepare_calls
    }

    /// Replay the write history and report whether both lines were ever high
    pub fn ever_both_lit(&self, a: LineId, b: LineId) -> bool {
        let mut state: BTreeMap<LineId, bool> = BTreeMap::new();
        self.history.iter().any(|&(line, level)| {
            state.insert(line, level);
            state.get(&a) == Some(&true) && state.get(&b) == Some(&true)
        })
    }
}

impl IndicatorLines for MockLines {
    type Error = MockError;

    fn prepare(&mut self, line: LineId) -> Result<(), MockError> {
        self.check_failure(line, LineOp::Prepare)?;
        self.prepare_calls += 1;
        self.prepared.insert(line);
        Ok(())
    }

    fn configure_as_output(&mut self, line: LineId) -> Result<(), MockError> {
        self.check_failure(line, LineOp::ConfigureOutput)?;
        if !self.prepared.contains(&line) {
            return Err(MockError::NotReady(line));
        }
        self.outputs.insert(line);
        Ok(())
    }

    fn set(&mut self, line: LineId, asserted: bool) -> Result<(), MockError> {
        self.check_failure(line, LineOp::Set)?;
        if !self.outputs.contains(&line) {
            return Err(MockError::NotReady(line));
        }
        self.levels.insert(line, asserted);
        self.history.push((line, asserted));
        Ok(())
    }
}

/// Delay that records the requested time instead of sleeping
#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

/// Command bus answering each write with the next scripted reply
#[derive(Default)]
pub struct ScriptedI2c {
    pub writes: Vec<(u8, Vec<u8>)>,
    replies: VecDeque<Result<Vec<u8>, MockError>>,
    fail_writes: bool,
}

impl ScriptedI2c {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, bytes: &[u8]) -> Self {
        self.replies.push_back(Ok(bytes.to_vec()));
        self
    }

    pub fn reply_err(mut self) -> Self {
        self.replies.push_back(Err(MockError::Nack));
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }
}

impl I2cBus for ScriptedI2c {
    type Error = MockError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), MockError> {
        if self.fail_writes {
            return Err(MockError::Injected);
        }
        self.writes.push((address, data.to_vec()));
        Ok(())
    }

    fn read(&mut self, _address: u8, buf: &mut [u8]) -> Result<(), MockError> {
        let reply = self.replies.pop_front().unwrap_or(Err(MockError::Nack))?;
        let n = buf.len().min(reply.len());
        buf[..n].copy_from_slice(&reply[..n]);
        Ok(())
    }
}
