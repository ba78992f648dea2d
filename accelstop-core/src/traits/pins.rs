//! Pin registry traits

use crate::error::ConfigError;
use crate::pins::{PinParams, PinType};

use super::motion::EndstopId;

/// Host pin registry
///
/// Owns the physical MCU pins and hands out endstop handles for them.
pub trait PinRegistry {
    /// Configure `params` as an endstop input and return its handle
    fn setup_endstop(&mut self, params: &PinParams) -> Result<EndstopId, ConfigError>;
}

/// A chip that provides its own pins to the registry
///
/// The registry forwards `chip_name:pin` requests to the chip registered
/// under `chip_name`.
pub trait PinChip {
    /// Set up one of this chip's pins
    fn setup_pin(&self, pin_type: PinType, params: &PinParams) -> Result<EndstopId, ConfigError>;
}
