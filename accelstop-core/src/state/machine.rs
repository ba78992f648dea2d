//! State machine definition

use super::events::SyncEvent;

/// Arm/disarm cycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncState {
    /// No homing move in progress, tap interrupt disabled
    #[default]
    Idle,
    /// Move begin seen; settling, then arming the interrupt
    PreArm,
    /// Tap interrupt enabled, waiting for the move to end
    Armed,
    /// Move end seen; settling, then disarming the interrupt
    PostDisarm,
    /// A transition failed; homing refused until reset
    Faulted(FaultKind),
}

/// Why the endstop faulted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// Tap flag latched right after arming (threshold too sensitive)
    TapBeforeMove,
    /// Tap flag still latched after disarming (spurious or double trigger)
    TapAfterMove,
    /// Script or register transport failed mid-transition
    Interrupted,
}

impl SyncState {
    /// Check if the tap interrupt is live
    pub fn is_armed(&self) -> bool {
        matches!(self, SyncState::Armed)
    }

    /// Check if this is the fault state
    pub fn is_faulted(&self) -> bool {
        matches!(self, SyncState::Faulted(_))
    }

    /// Process an event and return the next state
    pub fn transition(self, event: SyncEvent) -> Self {
        use SyncEvent::*;
        use SyncState::*;

        match (self, event) {
            // Arm
            (Idle, MoveBegin) => PreArm,
            (PreArm, ArmComplete) => Armed,
            (PreArm, Fault(kind)) => Faulted(kind),

            // Disarm
            (Armed, MoveEnd) => PostDisarm,
            // Previous move aborted before its end notification
            (Armed, MoveBegin) => PreArm,
            (PostDisarm, DisarmComplete) => Idle,
            (PostDisarm, Fault(kind)) => Faulted(kind),

            // Operator reset
            (Faulted(_), Reset) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
