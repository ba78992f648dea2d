//! Collaborator traits
//!
//! These traits define the interface between the endstop logic and the
//! parts of the host it depends on but does not own.

pub mod motion;
pub mod pins;
pub mod script;

pub use motion::{EndstopId, HomingMove, Toolhead};
pub use pins::{PinChip, PinRegistry};
pub use script::{NoScript, ScriptError, ScriptHook};
