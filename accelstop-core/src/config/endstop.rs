//! Accelerometer endstop configuration
//!
//! [`AccelEndstopConfig`] mirrors the `[accel_endstop]` config section as
//! written by the user. [`AccelEndstopConfig::validate`] turns it into
//! [`EndstopSettings`], which only holds checked values.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::tap::{TapConfig, DEFAULT_TAP_DUR, DEFAULT_TAP_THRESH};
use crate::error::ConfigError;
use crate::pins::{label, PinParams, MAX_PIN_NAME_LEN};

/// Maximum chip object name length (e.g. "adxl345 hotend")
pub const MAX_LABEL_LEN: usize = 32;

/// Maximum interrupt line selector length
pub const MAX_INT_TYPE_LEN: usize = 8;

/// Maximum pin description length (modifiers plus `chip:pin`)
pub const MAX_PIN_DESC_LEN: usize = 2 * MAX_PIN_NAME_LEN + 4;

/// Maximum activation/deactivation script length
pub const MAX_SCRIPT_LEN: usize = 256;

/// Supported accelerometer chips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChipKind {
    Adxl345,
}

impl ChipKind {
    /// Identify the chip from its object name
    ///
    /// Only the first word counts, so `adxl345 hotend` is an ADXL345.
    pub fn from_chip_name(name: &str) -> Result<Self, ConfigError> {
        match name.split_whitespace().next() {
            Some("adxl345") => Ok(ChipKind::Adxl345),
            _ => Err(ConfigError::UnsupportedChip),
        }
    }
}

/// Accelerometer interrupt output the tap event is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InterruptLine {
    #[default]
    Int1,
    Int2,
}

impl InterruptLine {
    /// Parse `int1` / `int2`
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim() {
            "int1" => Ok(InterruptLine::Int1),
            "int2" => Ok(InterruptLine::Int2),
            _ => Err(ConfigError::InvalidInterruptLine),
        }
    }
}

/// Interrupt line selection plus output polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterruptRouting {
    /// INT1 or INT2
    pub line: InterruptLine,
    /// Interrupt output is active low (pin configured with `!`)
    pub active_low: bool,
}

/// Raw `[accel_endstop]` section
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccelEndstopConfig {
    /// Accelerometer object name, e.g. "adxl345"
    pub accel_chip: String<MAX_LABEL_LEN>,
    /// Interrupt line selector ("int1" or "int2")
    pub int_type: String<MAX_INT_TYPE_LEN>,
    /// MCU pin wired to the selected interrupt line
    pub int_pin: String<MAX_PIN_DESC_LEN>,
    /// Tap threshold (mm/s^2)
    #[cfg_attr(feature = "serde", serde(default = "default_tap_thresh"))]
    pub tap_thresh: f64,
    /// Tap duration (s)
    #[cfg_attr(feature = "serde", serde(default = "default_tap_dur"))]
    pub tap_dur: f64,
    /// G-code run before the tap interrupt is armed
    #[cfg_attr(feature = "serde", serde(default))]
    pub activate_gcode: String<MAX_SCRIPT_LEN>,
    /// G-code run after the tap interrupt is disarmed
    #[cfg_attr(feature = "serde", serde(default))]
    pub deactivate_gcode: String<MAX_SCRIPT_LEN>,
}

#[cfg(feature = "serde")]
fn default_tap_thresh() -> f64 {
    DEFAULT_TAP_THRESH
}

#[cfg(feature = "serde")]
fn default_tap_dur() -> f64 {
    DEFAULT_TAP_DUR
}

impl AccelEndstopConfig {
    /// Create a config with default tap settings and no scripts
    pub fn new(accel_chip: &str, int_type: &str, int_pin: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            accel_chip: label(accel_chip)?,
            int_type: label(int_type)?,
            int_pin: label(int_pin)?,
            tap_thresh: DEFAULT_TAP_THRESH,
            tap_dur: DEFAULT_TAP_DUR,
            activate_gcode: String::new(),
            deactivate_gcode: String::new(),
        })
    }

    /// Check every field and resolve it into typed settings
    pub fn validate(&self) -> Result<EndstopSettings, ConfigError> {
        let chip = ChipKind::from_chip_name(&self.accel_chip)?;
        let line = InterruptLine::parse(&self.int_type)?;
        let int_pin = PinParams::parse(&self.int_pin, true, true)?;
        let tap = TapConfig::new(self.tap_thresh, self.tap_dur)?;

        Ok(EndstopSettings {
            chip,
            chip_name: self.accel_chip.clone(),
            routing: InterruptRouting {
                line,
                active_low: int_pin.invert,
            },
            int_pin,
            tap,
            activate_gcode: self.activate_gcode.clone(),
            deactivate_gcode: self.deactivate_gcode.clone(),
        })
    }
}

/// Validated endstop settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EndstopSettings {
    /// Accelerometer type
    pub chip: ChipKind,
    /// Accelerometer object name (also the pin chip name)
    pub chip_name: String<MAX_LABEL_LEN>,
    /// Interrupt line and polarity
    pub routing: InterruptRouting,
    /// Physical interrupt pin on the MCU
    pub int_pin: PinParams,
    /// Tap threshold and duration
    pub tap: TapConfig,
    /// Script text for the activation hook (empty for none)
    pub activate_gcode: String<MAX_SCRIPT_LEN>,
    /// Script text for the deactivation hook (empty for none)
    pub deactivate_gcode: String<MAX_SCRIPT_LEN>,
}

impl EndstopSettings {
    /// Check if either script hook has anything to run
    pub fn has_scripts(&self) -> bool {
        !self.activate_gcode.trim().is_empty() || !self.deactivate_gcode.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::Pull;

    #[test]
    fn test_chip_kind() {
        assert_eq!(ChipKind::from_chip_name("adxl345"), Ok(ChipKind::Adxl345));
        assert_eq!(
            ChipKind::from_chip_name("adxl345 hotend"),
            Ok(ChipKind::Adxl345)
        );
        assert_eq!(
            ChipKind::from_chip_name("lis2dw"),
            Err(ConfigError::UnsupportedChip)
        );
        // Substring of the supported name is not a match
        assert_eq!(
            ChipKind::from_chip_name("adxl"),
            Err(ConfigError::UnsupportedChip)
        );
        assert_eq!(ChipKind::from_chip_name(""), Err(ConfigError::UnsupportedChip));
    }

    #[test]
    fn test_interrupt_line() {
        assert_eq!(InterruptLine::parse("int1"), Ok(InterruptLine::Int1));
        assert_eq!(InterruptLine::parse("int2"), Ok(InterruptLine::Int2));
        assert_eq!(
            InterruptLine::parse("int3"),
            Err(ConfigError::InvalidInterruptLine)
        );
    }

    #[test]
    fn test_validate_defaults() {
        let config = AccelEndstopConfig::new("adxl345", "int1", "^PA1").unwrap();
        let settings = config.validate().unwrap();

        assert_eq!(settings.chip, ChipKind::Adxl345);
        assert_eq!(settings.routing.line, InterruptLine::Int1);
        assert!(!settings.routing.active_low);
        assert_eq!(settings.int_pin.pull, Pull::Up);
        assert_eq!(settings.tap, TapConfig::default());
        assert!(!settings.has_scripts());
    }

    #[test]
    fn test_validate_carries_scripts() {
        let mut config = AccelEndstopConfig::new("adxl345", "int1", "PA1").unwrap();
        config.deactivate_gcode = label("G1 Z5").unwrap();

        let settings = config.validate().unwrap();
        assert!(settings.activate_gcode.is_empty());
        assert_eq!(settings.deactivate_gcode.as_str(), "G1 Z5");
        assert!(settings.has_scripts());
    }

    #[test]
    fn test_validate_inverted_pin() {
        let config = AccelEndstopConfig::new("adxl345", "int2", "!PB3").unwrap();
        let settings = config.validate().unwrap();
        assert_eq!(settings.routing.line, InterruptLine::Int2);
        assert!(settings.routing.active_low);
    }

    #[test]
    fn test_validate_errors() {
        let config = AccelEndstopConfig::new("mpu9250", "int1", "PA1").unwrap();
        assert_eq!(config.validate(), Err(ConfigError::UnsupportedChip));

        let config = AccelEndstopConfig::new("adxl345", "int0", "PA1").unwrap();
        assert_eq!(config.validate(), Err(ConfigError::InvalidInterruptLine));

        let mut config = AccelEndstopConfig::new("adxl345", "int1", "PA1").unwrap();
        config.tap_thresh = 100.0;
        assert_eq!(config.validate(), Err(ConfigError::ThresholdOutOfRange));

        let mut config = AccelEndstopConfig::new("adxl345", "int1", "PA1").unwrap();
        config.tap_dur = 0.5;
        assert_eq!(config.validate(), Err(ConfigError::DurationOutOfRange));
    }
}
