//! Error types
//!
//! Configuration problems are reported as [`ConfigError`] at load or command
//! time. Everything that can go wrong while arming or disarming the endstop
//! is wrapped in [`EndstopError`], generic over the register transport error.

use core::fmt;

use crate::state::FaultKind;
use crate::traits::ScriptError;

/// Configuration errors
///
/// Always fatal to the load or command that produced them. Never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `accel_chip` does not name a supported accelerometer
    UnsupportedChip,
    /// `int_type` is not `int1` or `int2`
    InvalidInterruptLine,
    /// Tap threshold outside the encodable range
    ThresholdOutOfRange,
    /// Tap duration outside the encodable range
    DurationOutOfRange,
    /// Pin description could not be parsed
    InvalidPin,
    /// Pin uses `^`, `~` or `!` where that modifier is not allowed
    PinModifierNotAllowed,
    /// Virtual endstop requested as something other than an endstop
    NotAnEndstop,
    /// Pull-up or inversion requested on the virtual endstop pin
    VirtualPinModifiers,
    /// Command parameter is malformed or not a number
    InvalidParameter,
    /// Label exceeded its fixed capacity
    LabelTooLong,
    /// Configuration text could not be parsed
    Parse,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::UnsupportedChip => "accel_endstop: not supported chip",
            ConfigError::InvalidInterruptLine => "int_type must specify one of int1 or int2 pins",
            ConfigError::ThresholdOutOfRange => "tap_thresh out of range",
            ConfigError::DurationOutOfRange => "tap_dur out of range",
            ConfigError::InvalidPin => "invalid pin description",
            ConfigError::PinModifierNotAllowed => "pin modifier not allowed here",
            ConfigError::NotAnEndstop => "virtual endstop only useful as endstop",
            ConfigError::VirtualPinModifiers => "can not pullup/invert virtual pin",
            ConfigError::InvalidParameter => "malformed command parameter",
            ConfigError::LabelTooLong => "label too long",
            ConfigError::Parse => "unable to parse accel_endstop config",
        };
        f.write_str(msg)
    }
}

/// Errors raised while driving the endstop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EndstopError<E> {
    /// Invalid configuration or command parameters
    Config(ConfigError),
    /// Tap flag still latched after every validation poll
    SensorIntegrity(FaultKind),
    /// Endstop is faulted and must be reset before homing
    Faulted(FaultKind),
    /// Activation or deactivation script failed
    Script(ScriptError),
    /// Register transport failed
    Bus(E),
}

impl<E> From<ConfigError> for EndstopError<E> {
    fn from(e: ConfigError) -> Self {
        EndstopError::Config(e)
    }
}

impl<E> From<ScriptError> for EndstopError<E> {
    fn from(e: ScriptError) -> Self {
        EndstopError::Script(e)
    }
}

impl<E: fmt::Debug> fmt::Display for EndstopError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndstopError::Config(e) => write!(f, "{}", e),
            EndstopError::SensorIntegrity(FaultKind::TapAfterMove) => f.write_str(
                "ADXL345 tap still latched after move, it may be set too sensitive",
            ),
            EndstopError::SensorIntegrity(_) => f.write_str(
                "ADXL345 tap triggered before move, it may be set too sensitive",
            ),
            EndstopError::Faulted(kind) => write!(
                f,
                "accel endstop faulted ({:?}), run ACCEL_ENDSTOP_RESET",
                kind
            ),
            EndstopError::Script(e) => write!(f, "accel endstop script failed: {:?}", e),
            EndstopError::Bus(e) => write!(f, "accelerometer transport error: {:?}", e),
        }
    }
}
