//! Motion subsystem traits
//!
//! The endstop never generates steps itself. It only needs to flush the
//! step queue, wait on the motion timeline and translate motion time into
//! the accelerometer MCU's clock.

use accelstop_hal::Clock;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Handle of an endstop registered with the motion subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EndstopId(pub u16);

/// Toolhead timeline operations
pub trait Toolhead {
    /// Generate all pending steps up to the current print time
    fn flush_step_generation(&mut self);

    /// Advance the print time by `delay` seconds without moving
    ///
    /// This consumes motion time, not wall time.
    fn dwell(&mut self, delay: f64);

    /// Print time at the end of the last queued move (s)
    fn last_move_time(&mut self) -> f64;

    /// Convert a print time to a clock on the accelerometer's MCU
    fn print_time_to_clock(&self, print_time: f64) -> Clock;
}

/// A homing move in progress
pub trait HomingMove {
    /// Endstops that can stop this move
    fn endstops(&self) -> &[EndstopId];

    /// Check whether `endstop` participates in this move
    fn has_endstop(&self, endstop: EndstopId) -> bool {
        self.endstops().contains(&endstop)
    }
}

impl HomingMove for [EndstopId] {
    fn endstops(&self) -> &[EndstopId] {
        self
    }
}

impl<const N: usize> HomingMove for [EndstopId; N] {
    fn endstops(&self) -> &[EndstopId] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homing_move_membership() {
        let hmove = [EndstopId(1), EndstopId(3)];
        assert!(hmove.has_endstop(EndstopId(3)));
        assert!(!hmove.has_endstop(EndstopId(2)));

        let empty: [EndstopId; 0] = [];
        assert!(!empty.has_endstop(EndstopId(1)));
    }
}
