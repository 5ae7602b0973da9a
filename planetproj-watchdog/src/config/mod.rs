//! Configuration loading
//!
//! The device table is TOML. A reference table is compiled into the binary
//! and can be replaced at run time with `--config`.

pub mod loader;

pub use loader::{load_config, parse_config, ConfigError, LoadedConfig, EMBEDDED_DEVICES};
