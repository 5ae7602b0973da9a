//! LED controller driver
//!
//! A bank spans one or more LED controllers, each driving the same number
//! of LEDs. LEDs are numbered across the whole bank: with six LEDs per
//! controller, LED 7 is LED 1 of the second controller.
//!
//! Brightness is a raw 8-bit level (0 = off, 255 = full).

use heapless::Vec;

use planetproj_core::CommandSender;
use planetproj_hal::I2cBus;
use planetproj_protocol::messages::{ADDR_LED_1, ADDR_LED_2};
use planetproj_protocol::{Command, MAX_PAYLOAD_SIZE};

use crate::error::DriverError;

/// LEDs on each controller of the reference hardware
pub const DEFAULT_LEDS_PER_DEVICE: usize = 6;

/// Maximum number of controllers in a bank
pub const MAX_LED_DEVICES: usize = 4;

/// Maximum LEDs per controller (one brightness frame per controller)
pub const MAX_LEDS_PER_DEVICE: usize = MAX_PAYLOAD_SIZE / 2;

const MAX_LEDS: usize = MAX_LED_DEVICES * MAX_LEDS_PER_DEVICE;

/// Brightness control for a bank of LED controllers
pub struct LedBank<B> {
    sender: CommandSender<B>,
    addresses: Vec<u8, MAX_LED_DEVICES>,
    leds_per_device: usize,
    /// Last level acknowledged per LED
    levels: Vec<u8, MAX_LEDS>,
}

impl<B: I2cBus> LedBank<B> {
    /// Create a bank over the controllers at `addresses`
    pub fn new(
        sender: CommandSender<B>,
        addresses: &[u8],
        leds_per_device: usize,
    ) -> Result<Self, DriverError<B::Error>> {
        if addresses.is_empty() {
            return Err(DriverError::NoDevices);
        }
        if leds_per_device == 0 || leds_per_device > MAX_LEDS_PER_DEVICE {
            return Err(DriverError::InvalidLedCount(leds_per_device));
        }
        let addresses = Vec::from_slice(addresses).map_err(|_| DriverError::TooManyDevices)?;

        let mut levels = Vec::new();
        levels
            .resize(addresses.len() * leds_per_device, 0)
            .map_err(|_| DriverError::TooManyDevices)?;

        Ok(Self {
            sender,
            addresses,
            leds_per_device,
            levels,
        })
    }

    /// Bank of the reference hardware: two controllers with six LEDs each
    pub fn reference(sender: CommandSender<B>) -> Result<Self, DriverError<B::Error>> {
        Self::new(sender, &[ADDR_LED_1, ADDR_LED_2], DEFAULT_LEDS_PER_DEVICE)
    }

    /// Total number of LEDs in the bank
    pub fn led_count(&self) -> usize {
        self.levels.len()
    }

    /// Last acknowledged level of an LED
    pub fn brightness(&self, led: usize) -> Option<u8> {
        self.levels.get(led).copied()
    }

    /// Set a single LED
    pub fn set_brightness(&mut self, led: usize, level: u8) -> Result<(), DriverError<B::Error>> {
        self.set_brightness_multi(&[(led, level)])
    }

    /// Set several LEDs, one command per controller involved
    ///
    /// Every index is checked before anything is sent. Controllers are
    /// addressed in bank order; if one fails, earlier controllers keep
    /// their new levels.
    pub fn set_brightness_multi(
        &mut self,
        settings: &[(usize, u8)],
    ) -> Result<(), DriverError<B::Error>> {
        if let Some(&(led, _)) = settings.iter().find(|(led, _)| *led >= self.led_count()) {
            return Err(DriverError::InvalidLed(led));
        }

        for (device, &address) in self.addresses.iter().enumerate() {
            let mut pairs: Vec<(u8, u8), MAX_LEDS_PER_DEVICE> = Vec::new();
            for &(led, level) in settings {
                if led / self.leds_per_device != device {
                    continue;
                }
                let local = (led % self.leds_per_device) as u8;
                // A repeated LED keeps its last requested level
                match pairs.iter_mut().find(|(l, _)| *l == local) {
                    Some(pair) => pair.1 = level,
                    None => {
                        let _ = pairs.push((local, level));
                    }
                }
            }
            if pairs.is_empty() {
                continue;
            }

            self.sender
                .send(address, &Command::SetBrightness(&pairs))
                .map_err(|error| DriverError::Send { address, error })?;

            let base = device * self.leds_per_device;
            for &(local, level) in &pairs {
                self.levels[base + usize::from(local)] = level;
            }
        }
        Ok(())
    }

    /// Turn every LED off
    pub fn all_off(&mut self) -> Result<(), DriverError<B::Error>> {
        let mut settings: Vec<(usize, u8), MAX_LEDS> = Vec::new();
        for led in 0..self.led_count() {
            let _ = settings.push((led, 0));
        }
        self.set_brightness_multi(&settings)
    }

    /// Release the command sender
    pub fn into_inner(self) -> CommandSender<B> {
        self.sender
    }
}
