//! Tap detection thresholds
//!
//! The ADXL345 detects a tap when acceleration exceeds `THRESH_TAP` for no
//! longer than `DUR`. Both registers are 8 bits with fixed LSB weights, so
//! physical values are truncated to whole register counts.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Standard gravity in mm/s^2
pub const FREEFALL_ACCEL: f64 = 9.80665 * 1000.0;

/// THRESH_TAP weight: 62.5 mg/LSB, in mm/s^2
pub const TAP_SCALE: f64 = 0.0625 * FREEFALL_ACCEL;

/// DUR weight: 625 us/LSB, in seconds
pub const DUR_SCALE: f64 = 0.000625;

/// Largest accepted tap threshold (mm/s^2)
pub const TAP_THRESH_MAX: f64 = 16000.0;

/// Largest accepted tap duration (s)
pub const TAP_DUR_MAX: f64 = 0.159;

/// Default tap threshold (mm/s^2)
pub const DEFAULT_TAP_THRESH: f64 = 5000.0;

/// Default tap duration (s)
pub const DEFAULT_TAP_DUR: f64 = 0.01;

/// Validated tap threshold and duration in physical units
///
/// Can only be built through [`TapConfig::new`] or
/// [`TapConfig::with_updates`], so a value of this type is always safe to
/// program into the device.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TapConfig {
    /// Acceleration threshold (mm/s^2)
    threshold: f64,
    /// Maximum tap duration (s)
    duration: f64,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_TAP_THRESH,
            duration: DEFAULT_TAP_DUR,
        }
    }
}

impl TapConfig {
    /// Validate a threshold/duration pair
    pub fn new(threshold: f64, duration: f64) -> Result<Self, ConfigError> {
        validate_threshold(threshold)?;
        validate_duration(duration)?;
        Ok(Self {
            threshold,
            duration,
        })
    }

    /// Merge optional new values into this config
    ///
    /// Values not supplied keep their current setting. The merged pair is
    /// validated as a whole; on error `self` is the only valid config.
    pub fn with_updates(
        &self,
        threshold: Option<f64>,
        duration: Option<f64>,
    ) -> Result<Self, ConfigError> {
        Self::new(
            threshold.unwrap_or(self.threshold),
            duration.unwrap_or(self.duration),
        )
    }

    /// Tap threshold in mm/s^2
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Tap duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Encode as register counts (truncating)
    pub fn registers(&self) -> TapRegisters {
        TapRegisters {
            thresh: (self.threshold / TAP_SCALE) as u8,
            dur: (self.duration / DUR_SCALE) as u8,
        }
    }
}

/// Raw THRESH_TAP / DUR register values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TapRegisters {
    /// THRESH_TAP counts
    pub thresh: u8,
    /// DUR counts
    pub dur: u8,
}

impl TapRegisters {
    /// Threshold the device will actually apply (mm/s^2)
    pub fn threshold(&self) -> f64 {
        self.thresh as f64 * TAP_SCALE
    }

    /// Duration the device will actually apply (s)
    pub fn duration(&self) -> f64 {
        self.dur as f64 * DUR_SCALE
    }
}

fn validate_threshold(threshold: f64) -> Result<(), ConfigError> {
    // Written so NaN fails too
    if threshold >= TAP_SCALE && threshold <= TAP_THRESH_MAX {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange)
    }
}

fn validate_duration(duration: f64) -> Result<(), ConfigError> {
    if duration > DUR_SCALE && duration <= TAP_DUR_MAX {
        Ok(())
    } else {
        Err(ConfigError::DurationOutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_registers() {
        let regs = TapConfig::default().registers();
        // 5000 / 612.915625 = 8.15
        assert_eq!(regs.thresh, 8);
        // 0.01 / 0.000625 = 16
        assert_eq!(regs.dur, 16);
    }

    #[test]
    fn test_threshold_limits() {
        assert!(TapConfig::new(TAP_SCALE, DEFAULT_TAP_DUR).is_ok());
        assert!(TapConfig::new(TAP_THRESH_MAX, DEFAULT_TAP_DUR).is_ok());
        assert_eq!(
            TapConfig::new(TAP_SCALE - 1.0, DEFAULT_TAP_DUR),
            Err(ConfigError::ThresholdOutOfRange)
        );
        assert_eq!(
            TapConfig::new(16000.5, DEFAULT_TAP_DUR),
            Err(ConfigError::ThresholdOutOfRange)
        );
        assert_eq!(
            TapConfig::new(f64::NAN, DEFAULT_TAP_DUR),
            Err(ConfigError::ThresholdOutOfRange)
        );
    }

    #[test]
    fn test_duration_limits() {
        // Lower bound is exclusive
        assert_eq!(
            TapConfig::new(DEFAULT_TAP_THRESH, DUR_SCALE),
            Err(ConfigError::DurationOutOfRange)
        );
        assert!(TapConfig::new(DEFAULT_TAP_THRESH, 0.001).is_ok());
        assert!(TapConfig::new(DEFAULT_TAP_THRESH, TAP_DUR_MAX).is_ok());
        assert_eq!(
            TapConfig::new(DEFAULT_TAP_THRESH, 0.2),
            Err(ConfigError::DurationOutOfRange)
        );
    }

    #[test]
    fn test_max_values_fit_registers() {
        let regs = TapConfig::new(TAP_THRESH_MAX, TAP_DUR_MAX)
            .unwrap()
            .registers();
        assert_eq!(regs.thresh, 26);
        assert_eq!(regs.dur, 254);
    }

    #[test]
    fn test_with_updates_keeps_other_value() {
        let tap = TapConfig::default();

        let updated = tap.with_updates(Some(8000.0), None).unwrap();
        assert_eq!(updated.threshold(), 8000.0);
        assert_eq!(updated.duration(), DEFAULT_TAP_DUR);

        let updated = tap.with_updates(None, Some(0.05)).unwrap();
        assert_eq!(updated.threshold(), DEFAULT_TAP_THRESH);
        assert_eq!(updated.duration(), 0.05);
    }

    #[test]
    fn test_with_updates_rejects_whole_pair() {
        let tap = TapConfig::default();
        // Valid threshold does not get applied alongside a bad duration
        assert_eq!(
            tap.with_updates(Some(8000.0), Some(1.0)),
            Err(ConfigError::DurationOutOfRange)
        );
    }

    proptest! {
        #[test]
        fn test_threshold_round_trip(threshold in TAP_SCALE..=TAP_THRESH_MAX) {
            let tap = TapConfig::new(threshold, DEFAULT_TAP_DUR).unwrap();
            let applied = tap.registers().threshold();
            prop_assert!((threshold - applied).abs() <= TAP_SCALE * (1.0 + 1e-9));
        }

        #[test]
        fn test_duration_round_trip(duration in DUR_SCALE..=TAP_DUR_MAX) {
            prop_assume!(duration > DUR_SCALE);
            let tap = TapConfig::new(DEFAULT_TAP_THRESH, duration).unwrap();
            let regs = tap.registers();
            prop_assert!(regs.dur >= 1);
            prop_assert!((duration - regs.duration()).abs() <= DUR_SCALE * (1.0 + 1e-9));
        }

        #[test]
        fn test_out_of_range_threshold_rejected(threshold in 0.0f64..TAP_SCALE) {
            prop_assert_eq!(
                TapConfig::new(threshold, DEFAULT_TAP_DUR),
                Err(ConfigError::ThresholdOutOfRange)
            );
        }
    }
}
