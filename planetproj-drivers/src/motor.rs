//! Stepper motor controller driver
//!
//! Each controller drives one two-coil stepper. Rotation is relative: the
//! host sends a direction and a step count, and keeps its own record of
//! the accumulated position since start-up.

use heapless::Vec;

use planetproj_core::CommandSender;
use planetproj_hal::I2cBus;
use planetproj_protocol::messages::{ADDR_MOTOR_1, ADDR_MOTOR_2};
use planetproj_protocol::{Coil, Command};

use crate::error::DriverError;

/// Maximum number of motor controllers
pub const MAX_MOTOR_DEVICES: usize = 4;

/// Rotation and power control for a set of stepper controllers
pub struct MotorPair<B> {
    sender: CommandSender<B>,
    addresses: Vec<u8, MAX_MOTOR_DEVICES>,
    /// Accumulated steps per motor, negative is backwards
    positions: Vec<i64, MAX_MOTOR_DEVICES>,
}

impl<B: I2cBus> MotorPair<B> {
    /// Create a driver over the controllers at `addresses`
    pub fn new(sender: CommandSender<B>, addresses: &[u8]) -> Result<Self, DriverError<B::Error>> {
        if addresses.is_empty() {
            return Err(DriverError::NoDevices);
        }
        let addresses: Vec<u8, MAX_MOTOR_DEVICES> =
            Vec::from_slice(addresses).map_err(|_| DriverError::TooManyDevices)?;
        let mut positions = Vec::new();
        positions
            .resize(addresses.len(), 0)
            .map_err(|_| DriverError::TooManyDevices)?;

        Ok(Self {
            sender,
            addresses,
            positions,
        })
    }

    /// The two motors of the reference hardware
    pub fn reference(sender: CommandSender<B>) -> Result<Self, DriverError<B::Error>> {
        Self::new(sender, &[ADDR_MOTOR_1, ADDR_MOTOR_2])
    }

    /// Number of motors
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Check if the driver has no motors
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Accumulated position of a motor in steps
    pub fn position(&self, motor: usize) -> Option<i64> {
        self.positions.get(motor).copied()
    }

    fn address(&self, motor: usize) -> Result<u8, DriverError<B::Error>> {
        self.addresses
            .get(motor)
            .copied()
            .ok_or(DriverError::InvalidMotor(motor))
    }

    /// Rotate a motor by `steps`; negative counts turn it backwards
    ///
    /// The magnitude must fit the 16-bit step field. The recorded position
    /// only changes once the controller has accepted the command.
    pub fn rotate(&mut self, motor: usize, steps: i32) -> Result<(), DriverError<B::Error>> {
        let address = self.address(motor)?;
        let magnitude =
            u16::try_from(steps.unsigned_abs()).map_err(|_| DriverError::StepsOutOfRange(steps))?;

        let command = Command::SetRotate {
            reverse: steps < 0,
            steps: magnitude,
        };
        self.sender
            .send(address, &command)
            .map_err(|error| DriverError::Send { address, error })?;

        self.positions[motor] += i64::from(steps);
        Ok(())
    }

    /// Set the drive power of both coils of a motor
    pub fn set_power(&mut self, motor: usize, power: u8) -> Result<(), DriverError<B::Error>> {
        let address = self.address(motor)?;
        for coil in [Coil::A, Coil::B] {
            self.sender
                .send(address, &Command::SetPower { coil, power })
                .map_err(|error| DriverError::Send { address, error })?;
        }
        Ok(())
    }

    /// Tune the step-interval profile of a motor
    pub fn set_speed_profile(
        &mut self,
        motor: usize,
        max_idx: u16,
        idx_step: u16,
    ) -> Result<(), DriverError<B::Error>> {
        let address = self.address(motor)?;
        for command in [Command::SetMaxIdx(max_idx), Command::SetIdxStep(idx_step)] {
            self.sender
                .send(address, &command)
                .map_err(|error| DriverError::Send { address, error })?;
        }
        Ok(())
    }

    /// Release the command sender
    pub fn into_inner(self) -> CommandSender<B> {
        self.sender
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ReplyingBus;
    use planetproj_core::SendError;
    use planetproj_protocol::messages::{
        CMD_SET_IDX_STEP, CMD_SET_MAX_IDX, CMD_SET_POWER, CMD_SET_ROTATE,
    };
    use planetproj_protocol::Status;

    fn motors() -> MotorPair<ReplyingBus> {
        MotorPair::reference(CommandSender::new(ReplyingBus::new())).unwrap()
    }

    #[test]
    fn test_rotate_forward_and_back() {
        let mut motors = motors();
        motors.rotate(0, 1000).unwrap();
        motors.rotate(0, -300).unwrap();
        assert_eq!(motors.position(0), Some(700));
        assert_eq!(motors.position(1), Some(0));

        let bus = motors.into_inner().into_inner();
        assert_eq!(
            bus.frames_to(ADDR_MOTOR_1),
            [
                &[CMD_SET_ROTATE, 0, 0xE8, 0x03][..],
                &[CMD_SET_ROTATE, 1, 0x2C, 0x01][..],
            ]
        );
    }

    #[test]
    fn test_rotate_limits() {
        let mut motors = motors();
        motors.rotate(1, -65535).unwrap();
        assert_eq!(motors.position(1), Some(-65535));
        assert_eq!(
            motors.rotate(1, 65536),
            Err(DriverError::StepsOutOfRange(65536))
        );
        assert_eq!(
            motors.rotate(1, i32::MIN),
            Err(DriverError::StepsOutOfRange(i32::MIN))
        );
        assert_eq!(motors.rotate(2, 1), Err(DriverError::InvalidMotor(2)));
        assert_eq!(motors.into_inner().into_inner().writes.len(), 1);
    }

    #[test]
    fn test_power_sets_both_coils() {
        let mut motors = motors();
        motors.set_power(1, 128).unwrap();

        let bus = motors.into_inner().into_inner();
        assert_eq!(
            bus.frames_to(ADDR_MOTOR_2),
            [&[CMD_SET_POWER, 0, 128][..], &[CMD_SET_POWER, 1, 128][..]]
        );
    }

    #[test]
    fn test_speed_profile() {
        let mut motors = motors();
        motors.set_speed_profile(0, 0x0200, 4).unwrap();

        let bus = motors.into_inner().into_inner();
        assert_eq!(
            bus.frames_to(ADDR_MOTOR_1),
            [&[CMD_SET_MAX_IDX, 0x00, 0x02][..], &[CMD_SET_IDX_STEP, 4, 0][..]]
        );
    }

    #[test]
    fn test_failed_rotate_keeps_position() {
        let sender = CommandSender::new(ReplyingBus::answering(Status::NotReady));
        let mut motors = MotorPair::reference(sender).unwrap();
        assert!(matches!(
            motors.rotate(0, 10),
            Err(DriverError::Send {
                address: ADDR_MOTOR_1,
                error: SendError::RetriesExhausted { attempts: 3, .. }
            })
        ));
        assert_eq!(motors.position(0), Some(0));
    }

    #[test]
    fn test_construction_limits() {
        let sender = || CommandSender::new(ReplyingBus::new());
        assert!(matches!(MotorPair::new(sender(), &[]), Err(DriverError::NoDevices)));
        assert!(matches!(
            MotorPair::new(sender(), &[0x40, 0x41, 0x42, 0x43, 0x44]),
            Err(DriverError::TooManyDevices)
        ));
        assert_eq!(motors().len(), 2);
    }
}
