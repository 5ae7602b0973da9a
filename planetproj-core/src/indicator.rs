//! Indicator state mapping
//!
//! Each device shows exactly one of its two lines once probed: ok (green)
//! for alive, fault (red) for dead.

use planetproj_hal::{IndicatorLines, LineId, LineOp};

use crate::probe::Liveness;
use crate::registry::DeviceDescriptor;

/// Desired levels of a device's two indicator lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorState {
    /// Ok line asserted
    pub ok: bool,
    /// Fault line asserted
    pub fault: bool,
}

impl IndicatorState {
    /// Ok lit, fault dark
    pub const OK: Self = Self {
        ok: true,
        fault: false,
    };

    /// Fault lit, ok dark
    pub const FAULT: Self = Self {
        ok: false,
        fault: true,
    };
}

impl From<Liveness> for IndicatorState {
    fn from(liveness: Liveness) -> Self {
        if liveness.is_alive_for_indicator() {
            Self::OK
        } else {
            Self::FAULT
        }
    }
}

/// A line operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineFailure<E> {
    /// Line the operation was applied to
    pub line: LineId,
    /// Operation that failed
    pub op: LineOp,
    /// Error reported by the line backend
    pub error: E,
}

/// Configure both lines of `device` as outputs
pub fn configure<L: IndicatorLines>(
    lines: &mut L,
    device: &DeviceDescriptor,
) -> Result<(), LineFailure<L::Error>> {
    for line in device.lines() {
        lines
            .configure_as_output(line)
            .map_err(|error| LineFailure {
                line,
                op: LineOp::ConfigureOutput,
                error,
            })?;
    }
    Ok(())
}

/// Drive both lines of `device` to `state`
///
/// The line being cleared is written first so the two are never lit
/// together.
pub fn drive<L: IndicatorLines>(
    lines: &mut L,
    device: &DeviceDescriptor,
    state: IndicatorState,
) -> Result<(), LineFailure<L::Error>> {
    let writes = if state.ok {
        [(device.fault_line, state.fault), (device.ok_line, state.ok)]
    } else {
        [(device.ok_line, state.ok), (device.fault_line, state.fault)]
    };

    for (line, level) in writes {
        lines.set(line, level).map_err(|error| LineFailure {
            line,
            op: LineOp::Set,
            error,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockError, MockLines};
    use crate::registry::DeviceKind;

    fn device() -> DeviceDescriptor {
        DeviceDescriptor::new("led1", DeviceKind::Led, 0x30, 10, 22)
    }

    /// Mock lines with both lines of `device()` prepared
    fn ready_lines() -> MockLines {
        let mut lines = MockLines::new();
        for line in device().lines() {
            lines.prepare(line).unwrap();
        }
        lines
    }

    #[test]
    fn test_mapping() {
        assert_eq!(IndicatorState::from(Liveness::Alive), IndicatorState::OK);
        assert_eq!(IndicatorState::from(Liveness::AmbiguousBusy), IndicatorState::OK);
        assert_eq!(IndicatorState::from(Liveness::Dead), IndicatorState::FAULT);
    }

    #[test]
    fn test_drive_alive() {
        let mut lines = ready_lines();
        configure(&mut lines, &device()).unwrap();
        drive(&mut lines, &device(), IndicatorState::OK).unwrap();
        assert_eq!(lines.level(10), Some(true));
        assert_eq!(lines.level(22), Some(false));
    }

    #[test]
    fn test_drive_dead() {
        let mut lines = ready_lines();
        configure(&mut lines, &device()).unwrap();
        drive(&mut lines, &device(), IndicatorState::FAULT).unwrap();
        assert_eq!(lines.level(10), Some(false));
        assert_eq!(lines.level(22), Some(true));
    }

    #[test]
    fn test_never_both_lit() {
        let mut lines = ready_lines();
        configure(&mut lines, &device()).unwrap();
        drive(&mut lines, &device(), IndicatorState::OK).unwrap();
        drive(&mut lines, &device(), IndicatorState::FAULT).unwrap();
        drive(&mut lines, &device(), IndicatorState::OK).unwrap();
        assert!(!lines.ever_both_lit(10, 22));
    }

    #[test]
    fn test_set_failure_reports_line() {
        let mut lines = ready_lines();
        lines.fail_on(22, LineOp::Set);
        configure(&mut lines, &device()).unwrap();
        let err = drive(&mut lines, &device(), IndicatorState::OK).unwrap_err();
        assert_eq!(err.line, 22);
        assert_eq!(err.op, LineOp::Set);
    }

    #[test]
    fn test_configure_requires_prepared_lines() {
        let mut lines = MockLines::new();
        let err = configure(&mut lines, &device()).unwrap_err();
        assert_eq!(err.line, 10);
        assert_eq!(err.op, LineOp::ConfigureOutput);
        assert_eq!(err.error, MockError::NotReady(10));
    }
}
