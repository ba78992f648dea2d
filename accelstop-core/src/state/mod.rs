//! Endstop synchronization state machine
//!
//! Tracks where the accelerometer is in the arm/disarm cycle around a
//! homing move. The machine is explicit, finite, and deterministic; the
//! driver performs the register work and feeds the outcome back as events.

pub mod events;
pub mod machine;

pub use events::SyncEvent;
pub use machine::{FaultKind, SyncState};
