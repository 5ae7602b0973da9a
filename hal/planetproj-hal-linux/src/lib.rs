//! Linux HAL for the planetarium projector host tools
//!
//! Implements the `planetproj-hal` traits on top of:
//! - `/dev/i2c-N` character devices (i2c-dev ioctls)
//! - the sysfs GPIO interface (`/sys/class/gpio`)
//! - `std::thread::sleep` for delays

pub mod delay;
pub mod error;
pub mod gpio;
pub mod i2c;

pub use delay::StdDelay;
pub use error::LinuxHalError;
pub use gpio::{SysfsGpio, DEFAULT_GPIO_ROOT};
pub use i2c::LinuxI2c;
