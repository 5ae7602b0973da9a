//! planetproj-watchdog - peripheral liveness watchdog
//!
//! Runs one probe cycle over the device table: every device is probed on
//! the I2C bus and its ok/fault indicator lines are driven accordingly.
//! Meant to be started periodically (cron, systemd timer).

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use planetproj_core::Watchdog;
use planetproj_hal_linux::{LinuxI2c, StdDelay, SysfsGpio, DEFAULT_GPIO_ROOT};
use planetproj_watchdog::{load_config, logging, AppError, ConsoleReporter};

#[derive(Parser)]
#[command(name = "planetproj-watchdog")]
#[command(about = "Probe the projector peripherals and light their health indicators")]
#[command(version)]
struct Cli {
    /// I2C adapter device, e.g. /dev/i2c-1
    i2c_dev: PathBuf,

    /// Device table to use instead of the built-in one
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Root of the sysfs GPIO class
    #[arg(long, value_name = "PATH", default_value = DEFAULT_GPIO_ROOT)]
    gpio_root: PathBuf,

    /// Verbose logging (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("planetproj-watchdog: {e}");
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
    let loaded = load_config(cli.config.as_deref())?;
    info!(origin = %loaded.origin, devices = loaded.registry.len(), "device table ready");

    let bus = LinuxI2c::open(&cli.i2c_dev)?;
    let lines = SysfsGpio::new(&cli.gpio_root);

    let mut watchdog = Watchdog::new(&loaded.registry, bus, lines, StdDelay)
        .with_settle_ms(loaded.config.settle_ms);

    let mut reporter = ConsoleReporter::new(io::stdout().lock());
    let report = watchdog.run_cycle(&mut reporter)?;
    reporter.finish()?;

    info!(
        alive = report.alive_count(),
        total = report.len(),
        "probe cycle complete"
    );
    Ok(())
}
