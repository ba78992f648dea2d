//! Configuration types
//!
//! Board-agnostic configuration for the tap endstop. Optional TOML loading
//! lives behind the `toml` feature.

pub mod endstop;
pub mod tap;
#[cfg(feature = "toml")]
pub mod toml;

pub use endstop::*;
pub use tap::*;
