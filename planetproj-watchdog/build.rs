//! Build script for planetproj-watchdog
//!
//! Validates the embedded devices.toml at compile time so a broken device
//! table never makes it into a binary.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

const MAX_DEVICES: usize = 8;
const MAX_NAME_LEN: usize = 16;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    validate_devices();
}

/// Validate devices.toml
fn validate_devices() {
    println!("cargo:rerun-if-changed=devices.toml");

    let config_path = Path::new("devices.toml");

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read devices.toml", &[e.to_string()]),
    };

    let config: toml::Table = match toml::from_str(&content) {
        Ok(table) => table,
        Err(e) => fail(
            "Invalid TOML syntax in devices.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();

    match config.get("settle_ms") {
        None => {}
        Some(toml::Value::Integer(ms)) if (0..=i64::from(u32::MAX)).contains(ms) => {}
        Some(_) => errors.push("settle_ms must be a non-negative integer".to_string()),
    }

    let devices = match config.get("device") {
        Some(toml::Value::Array(devices)) => devices.as_slice(),
        Some(_) => fail("Invalid device table", &["[[device]] must be an array of tables".into()]),
        None => fail("Invalid device table", &["at least one [[device]] is required".into()]),
    };

    if devices.is_empty() {
        errors.push("at least one [[device]] is required".to_string());
    }
    if devices.len() > MAX_DEVICES {
        errors.push(format!("at most {} devices are supported", MAX_DEVICES));
    }

    let mut addresses = BTreeSet::new();
    let mut lines = BTreeSet::new();

    for (i, device) in devices.iter().enumerate() {
        let device = match device.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("device {} must be a table", i));
                continue;
            }
        };

        match device.get("name") {
            Some(toml::Value::String(name)) if !name.is_empty() && name.len() <= MAX_NAME_LEN => {}
            Some(_) => errors.push(format!(
                "device {} name must be 1-{} characters",
                i, MAX_NAME_LEN
            )),
            None => errors.push(format!("device {} missing 'name'", i)),
        }

        if let Some(kind) = device.get("kind") {
            if !matches!(kind.as_str(), Some("led") | Some("motor")) {
                errors.push(format!("device {} kind must be 'led' or 'motor'", i));
            }
        }

        match device.get("address") {
            Some(toml::Value::Integer(addr)) => {
                if !(0x08..=0x77).contains(addr) {
                    errors.push(format!("device {} address must be 0x08-0x77", i));
                } else if !addresses.insert(*addr) {
                    errors.push(format!("device {} reuses address 0x{:02x}", i, addr));
                }
            }
            _ => errors.push(format!("device {} missing integer 'address'", i)),
        }

        for key in ["ok_line", "fault_line"] {
            match device.get(key) {
                Some(toml::Value::Integer(line)) => {
                    if !(0..=i64::from(u16::MAX)).contains(line) {
                        errors.push(format!("device {} {} out of range", i, key));
                    } else if !lines.insert(*line) {
                        errors.push(format!("device {} reuses line {}", i, line));
                    }
                }
                _ => errors.push(format!("device {} missing integer '{}'", i, key)),
            }
        }
    }

    if !errors.is_empty() {
        fail("Invalid device table in devices.toml", &errors);
    }
}

/// Abort the build with a boxed error report
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| {
                let truncated = if e.chars().count() > 62 {
                    format!("{}...", e.chars().take(59).collect::<String>())
                } else {
                    e.clone()
                };
                format!("║  • {:<62} ║", truncated)
            })
            .collect::<Vec<_>>()
            .join("\n")
    );
}
