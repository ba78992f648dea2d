//! TOML configuration loading
//!
//! Reads the `[accel_endstop]` table:
//!
//! ```toml
//! [accel_endstop]
//! accel_chip = "adxl345"
//! int_type = "int1"
//! int_pin = "^PA1"
//! tap_thresh = 5000.0   # optional, mm/s^2
//! tap_dur = 0.01        # optional, s
//! activate_gcode = ""   # optional
//! deactivate_gcode = "" # optional
//! ```
//!
//! Other tables are ignored so the section can live in a larger machine
//! config file.

use serde::Deserialize;

use super::endstop::{AccelEndstopConfig, EndstopSettings};
use crate::error::ConfigError;

#[derive(Deserialize)]
struct Document {
    accel_endstop: AccelEndstopConfig,
}

/// Parse the `[accel_endstop]` section without validating it
pub fn parse_config(input: &str) -> Result<AccelEndstopConfig, ConfigError> {
    let doc: Document = ::toml::from_str(input).map_err(|_| ConfigError::Parse)?;
    Ok(doc.accel_endstop)
}

/// Parse and validate the `[accel_endstop]` section
pub fn load_settings(input: &str) -> Result<EndstopSettings, ConfigError> {
    parse_config(input)?.validate()
}
