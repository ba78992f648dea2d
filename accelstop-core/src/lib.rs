//! Board-agnostic core logic for the accelerometer tap endstop
//!
//! This crate contains everything that does not depend on a concrete
//! accelerometer transport:
//!
//! - Tap threshold/duration configuration and validation
//! - Interrupt pin parsing and the virtual endstop pin contract
//! - Traits for the motion subsystem, pin registry and script hooks
//! - The arm/disarm synchronization state machine
//! - Homing lifecycle observer registry
//! - Runtime command parsing

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod error;
pub mod homing;
pub mod pins;
pub mod state;
pub mod traits;

pub use error::{ConfigError, EndstopError};
