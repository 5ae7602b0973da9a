//! planetproj-ctl - manual control of the projector peripherals
//!
//! Sends framed commands to the LED and motor controllers, and doubles as a
//! CRC calculator for hand-building frames.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use planetproj_core::CommandSender;
use planetproj_drivers::{LedBank, MotorPair};
use planetproj_hal::I2cBus;
use planetproj_hal_linux::LinuxI2c;
use planetproj_protocol::crc16;
use planetproj_watchdog::dry_run::DryRunBus;
use planetproj_watchdog::{logging, AppError};

#[derive(Parser)]
#[command(name = "planetproj-ctl")]
#[command(about = "Send commands to the projector LED and motor controllers")]
#[command(version)]
struct Cli {
    /// I2C adapter device
    #[arg(long, global = true, value_name = "PATH", default_value = "/dev/i2c-1")]
    bus: PathBuf,

    /// Print frames instead of sending them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Transmissions per command before giving up
    #[arg(long, global = true, default_value_t = planetproj_core::sender::DEFAULT_MAX_ATTEMPTS)]
    attempts: u8,

    /// Verbose logging (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the frame checksum of a byte sequence
    Crc {
        /// Byte values (decimal, 0x hex or 0 octal)
        #[arg(required = true, value_parser = parse_byte)]
        values: Vec<u8>,
    },

    /// Set LED brightness, numbering LEDs across both controllers
    Brightness {
        /// LED=LEVEL pairs, level 0-255
        #[arg(required = true, value_parser = parse_led_level)]
        settings: Vec<(usize, u8)>,
    },

    /// Rotate a motor by a relative step count
    Rotate {
        /// Motor index (0 or 1)
        motor: usize,
        /// Steps, negative to turn backwards
        #[arg(allow_negative_numbers = true)]
        steps: i32,
    },

    /// Set the drive power of both coils of a motor
    Power {
        /// Motor index (0 or 1)
        motor: usize,
        /// Power level 0-255
        power: u8,
    },

    /// Set the acceleration profile of a motor
    Speed {
        /// Motor index (0 or 1)
        motor: usize,
        /// Maximum step-interval index
        max_idx: u16,
        /// Step-interval index increment
        idx_step: u16,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("planetproj-ctl: {e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    if let Commands::Crc { values } = &cli.command {
        let mut out = io::stdout().lock();
        write_crc_report(&mut out, crc16::compute(values))?;
        return Ok(());
    }

    if cli.dry_run {
        let sender = CommandSender::new(DryRunBus::new(io::stdout().lock()))
            .with_max_attempts(cli.attempts);
        execute(&cli.command, sender)
    } else {
        let sender = CommandSender::new(LinuxI2c::open(&cli.bus)?).with_max_attempts(cli.attempts);
        execute(&cli.command, sender)
    }
}

fn execute<B>(command: &Commands, sender: CommandSender<B>) -> Result<(), AppError>
where
    B: I2cBus,
    B::Error: Into<AppError>,
{
    match command {
        Commands::Crc { .. } => Ok(()),
        Commands::Brightness { settings } => {
            let mut leds = LedBank::reference(sender)?;
            leds.set_brightness_multi(settings)?;
            info!(count = settings.len(), "brightness set");
            Ok(())
        }
        Commands::Rotate { motor, steps } => {
            let mut motors = MotorPair::reference(sender)?;
            motors.rotate(*motor, *steps)?;
            info!(motor, steps, "rotation sent");
            Ok(())
        }
        Commands::Power { motor, power } => {
            let mut motors = MotorPair::reference(sender)?;
            motors.set_power(*motor, *power)?;
            info!(motor, power, "power set");
            Ok(())
        }
        Commands::Speed {
            motor,
            max_idx,
            idx_step,
        } => {
            let mut motors = MotorPair::reference(sender)?;
            motors.set_speed_profile(*motor, *max_idx, *idx_step)?;
            info!(motor, max_idx, idx_step, "speed profile set");
            Ok(())
        }
    }
}

/// Print a checksum in the forms needed to hand-assemble a frame
fn write_crc_report<W: Write>(out: &mut W, crc: u16) -> io::Result<()> {
    let [lo, hi] = crc.to_le_bytes();
    writeln!(out, "CRC is")?;
    writeln!(out, "  in hex:               0x{crc:04x}")?;
    writeln!(out, "  in little-endian hex: 0x{lo:02x} 0x{hi:02x}")?;
    writeln!(out, "  in dec:               {crc}")?;
    writeln!(out, "  in little-endian dec: {lo} {hi}")
}

/// Parse an integer with C-style radix prefixes
fn parse_integer(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        u64::from_str_radix(&s[1..], 8)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("invalid number '{s}': {e}"))
}

fn parse_byte(s: &str) -> Result<u8, String> {
    let value = parse_integer(s)?;
    u8::try_from(value).map_err(|_| format!("{value} does not fit in a byte"))
}

fn parse_led_level(s: &str) -> Result<(usize, u8), String> {
    let (led, level) = s
        .split_once('=')
        .ok_or_else(|| format!("expected LED=LEVEL, got '{s}'"))?;
    let led = parse_integer(led)?;
    let led = usize::try_from(led).map_err(|_| format!("LED index {led} too large"))?;
    Ok((led, parse_byte(level)?))
}
