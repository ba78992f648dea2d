//! ADXL345 accelerometer (tap detection)
//!
//! Only the registers needed to run the single-tap interrupt are covered.
//! Sampling and FIFO readout stay with the regular accelerometer driver.
//!
//! # Tap detection
//!
//! The chip flags a single tap when acceleration on an enabled axis rises
//! above THRESH_TAP and falls back within DUR. The event latches
//! SINGLE_TAP in INT_SOURCE, which is cleared by reading INT_SOURCE, and is
//! driven onto INT1 or INT2 according to INT_MAP.

use accelstop_core::config::{InterruptLine, InterruptRouting, TapConfig};

/// ADXL345 register addresses
pub mod reg {
    /// Device ID (reads 0xE5)
    pub const DEVID: u8 = 0x00;
    /// Tap threshold (62.5 mg/LSB)
    pub const THRESH_TAP: u8 = 0x1D;
    /// Maximum tap duration (625 us/LSB)
    pub const DUR: u8 = 0x21;
    /// Axes participating in tap detection
    pub const TAP_AXES: u8 = 0x2A;
    /// Power-saving features control
    pub const POWER_CTL: u8 = 0x2D;
    /// Interrupt enable control
    pub const INT_ENABLE: u8 = 0x2E;
    /// Interrupt mapping (bit set = INT2)
    pub const INT_MAP: u8 = 0x2F;
    /// Interrupt source, cleared on read
    pub const INT_SOURCE: u8 = 0x30;
    /// Data format control
    pub const DATA_FORMAT: u8 = 0x31;
}

/// Expected DEVID value
pub const DEVID_ADXL345: u8 = 0xE5;

/// SINGLE_TAP bit in INT_ENABLE / INT_MAP / INT_SOURCE
pub const INT_SINGLE_TAP: u8 = 0x40;

/// No interrupts enabled
pub const INT_NONE: u8 = 0x00;

/// POWER_CTL: standby
pub const POWER_STANDBY: u8 = 0x00;

/// POWER_CTL: measurement mode
pub const POWER_MEASURE: u8 = 0x08;

/// DATA_FORMAT: full resolution, +-16 g
pub const DATA_FORMAT_FULL_RES_16G: u8 = 0x0B;

/// DATA_FORMAT: interrupts active low
pub const DATA_FORMAT_INT_INVERT: u8 = 0x20;

/// TAP_AXES: tap detection on X, Y and Z
pub const TAP_AXES_XYZ: u8 = 0x07;

/// INT_MAP value routing the single-tap interrupt to `line`
pub fn int_map(line: InterruptLine) -> u8 {
    match line {
        InterruptLine::Int1 => 0x00,
        InterruptLine::Int2 => INT_SINGLE_TAP,
    }
}

/// DATA_FORMAT value for the requested interrupt polarity
pub fn data_format(active_low: bool) -> u8 {
    if active_low {
        DATA_FORMAT_FULL_RES_16G | DATA_FORMAT_INT_INVERT
    } else {
        DATA_FORMAT_FULL_RES_16G
    }
}

/// THRESH_TAP and DUR writes for `tap`, threshold first
pub fn tap_writes(tap: &TapConfig) -> [(u8, u8); 2] {
    let regs = tap.registers();
    [(reg::THRESH_TAP, regs.thresh), (reg::DUR, regs.dur)]
}

/// Register writes that prepare the chip for tap detection
///
/// The chip is left in standby with the tap interrupt routed but not
/// enabled. Arming happens per homing move.
pub fn init_writes(routing: &InterruptRouting, tap: &TapConfig) -> [(u8, u8); 6] {
    let [thresh, dur] = tap_writes(tap);
    [
        // Standby while reconfiguring
        (reg::POWER_CTL, POWER_STANDBY),
        // Full resolution, interrupt polarity
        (reg::DATA_FORMAT, data_format(routing.active_low)),
        // INT1 or INT2
        (reg::INT_MAP, int_map(routing.line)),
        // Detect taps on every axis
        (reg::TAP_AXES, TAP_AXES_XYZ),
        thresh,
        dur,
    ]
}

/// Parsed INT_SOURCE register
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntSource {
    pub data_ready: bool,
    pub single_tap: bool,
    pub double_tap: bool,
    pub activity: bool,
    pub inactivity: bool,
    pub free_fall: bool,
    pub watermark: bool,
    pub overrun: bool,
}

impl IntSource {
    /// Parse from raw INT_SOURCE register value
    pub fn from_register(value: u8) -> Self {
        Self {
            data_ready: (value & 0x80) != 0,
            single_tap: (value & INT_SINGLE_TAP) != 0,
            double_tap: (value & 0x20) != 0,
            activity: (value & 0x10) != 0,
            inactivity: (value & 0x08) != 0,
            free_fall: (value & 0x04) != 0,
            watermark: (value & 0x02) != 0,
            overrun: (value & 0x01) != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_map() {
        assert_eq!(int_map(InterruptLine::Int1), 0x00);
        assert_eq!(int_map(InterruptLine::Int2), 0x40);
    }

    #[test]
    fn test_data_format() {
        assert_eq!(data_format(false), 0x0B);
        assert_eq!(data_format(true), 0x2B);
    }

    #[test]
    fn test_tap_writes() {
        let writes = tap_writes(&TapConfig::default());
        assert_eq!(writes, [(reg::THRESH_TAP, 8), (reg::DUR, 16)]);
    }

    #[test]
    fn test_init_writes() {
        let routing = InterruptRouting {
            line: InterruptLine::Int2,
            active_low: true,
        };
        let writes = init_writes(&routing, &TapConfig::default());

        assert_eq!(
            writes,
            [
                (reg::POWER_CTL, 0x00),
                (reg::DATA_FORMAT, 0x2B),
                (reg::INT_MAP, 0x40),
                (reg::TAP_AXES, 0x07),
                (reg::THRESH_TAP, 8),
                (reg::DUR, 16),
            ]
        );
    }

    #[test]
    fn test_int_source_parsing() {
        let src = IntSource::from_register(0x40);
        assert!(src.single_tap);
        assert!(!src.double_tap);

        // Data ready alone is not a tap
        let src = IntSource::from_register(0x83);
        assert!(!src.single_tap);
        assert!(src.data_ready);
        assert!(src.watermark);
        assert!(src.overrun);

        let src = IntSource::from_register(0xFF);
        assert!(src.single_tap && src.double_tap && src.activity);
        assert!(src.inactivity && src.free_fall);
    }
}
