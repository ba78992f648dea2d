//! Pin descriptions
//!
//! Pins are written Klipper style: `[^|~][!][chip:]pin`. `^` enables the
//! pull-up, `~` the pull-down, `!` inverts the signal. Without a chip prefix
//! the pin belongs to the main MCU.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum chip or pin name length
pub const MAX_PIN_NAME_LEN: usize = 32;

/// Chip name used when a pin has no `chip:` prefix
pub const DEFAULT_CHIP: &str = "mcu";

/// Pin name the accelerometer exposes as its endstop
pub const VIRTUAL_ENDSTOP_PIN: &str = "virtual_endstop";

/// Kind of object a pin is being set up as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PinType {
    /// Homing endstop input
    Endstop,
    /// Digital output
    DigitalOut,
    /// PWM output
    Pwm,
    /// Analog input
    Adc,
}

/// Pull resistor selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pull {
    #[default]
    None,
    Up,
    Down,
}

/// Parsed pin description
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinParams {
    /// Owning chip (`mcu` unless prefixed)
    pub chip_name: String<MAX_PIN_NAME_LEN>,
    /// Pin name on that chip
    pub pin: String<MAX_PIN_NAME_LEN>,
    /// Signal is inverted (`!`)
    pub invert: bool,
    /// Pull resistor (`^` or `~`)
    pub pull: Pull,
}

impl PinParams {
    /// Parse a pin description
    ///
    /// # Arguments
    /// * `desc` - Pin description, e.g. `^!PA1` or `adxl345:virtual_endstop`
    /// * `can_invert` - Accept the `!` modifier
    /// * `can_pull` - Accept the `^` and `~` modifiers
    pub fn parse(desc: &str, can_invert: bool, can_pull: bool) -> Result<Self, ConfigError> {
        let mut rest = desc.trim();

        let pull = if let Some(r) = rest.strip_prefix('^') {
            rest = r.trim_start();
            Pull::Up
        } else if let Some(r) = rest.strip_prefix('~') {
            rest = r.trim_start();
            Pull::Down
        } else {
            Pull::None
        };
        if pull != Pull::None && !can_pull {
            return Err(ConfigError::PinModifierNotAllowed);
        }

        let invert = match rest.strip_prefix('!') {
            Some(r) => {
                rest = r.trim_start();
                true
            }
            None => false,
        };
        if invert && !can_invert {
            return Err(ConfigError::PinModifierNotAllowed);
        }

        let (chip, pin) = match rest.split_once(':') {
            Some((chip, pin)) => (chip.trim(), pin.trim()),
            None => (DEFAULT_CHIP, rest),
        };
        if chip.is_empty() || pin.is_empty() || pin.contains(|c: char| c.is_whitespace()) {
            return Err(ConfigError::InvalidPin);
        }

        Ok(Self {
            chip_name: label(chip)?,
            pin: label(pin)?,
            invert,
            pull,
        })
    }

    /// Check if a pull resistor was requested
    pub fn has_pull(&self) -> bool {
        self.pull != Pull::None
    }

    /// Check if this refers to a chip's virtual endstop pin
    pub fn is_virtual_endstop(&self) -> bool {
        self.pin.as_str() == VIRTUAL_ENDSTOP_PIN
    }
}

/// Validate a request for a virtual endstop pin
///
/// The signal is synthesized in software, so only an endstop named
/// `virtual_endstop` with no pull-up and no inversion makes sense.
pub fn check_virtual_endstop(pin_type: PinType, params: &PinParams) -> Result<(), ConfigError> {
    if pin_type != PinType::Endstop || !params.is_virtual_endstop() {
        return Err(ConfigError::NotAnEndstop);
    }
    if params.invert || params.has_pull() {
        return Err(ConfigError::VirtualPinModifiers);
    }
    Ok(())
}

/// Copy a name into a fixed-capacity label
pub(crate) fn label<const N: usize>(s: &str) -> Result<String<N>, ConfigError> {
    let mut out = String::new();
    out.push_str(s).map_err(|_| ConfigError::LabelTooLong)?;
    Ok(out)
}
