//! Events that drive the synchronization state machine

use super::machine::FaultKind;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncEvent {
    // Motion subsystem events
    /// Homing move using this endstop is about to start
    MoveBegin,
    /// Homing move using this endstop has stopped
    MoveEnd,

    // Driver events
    /// Tap interrupt armed and no stale tap latched
    ArmComplete,
    /// Tap interrupt disarmed and no tap left latched
    DisarmComplete,
    /// Validation or transport failure during a transition
    Fault(FaultKind),

    // Operator events
    /// Operator cleared a fault
    Reset,
}
