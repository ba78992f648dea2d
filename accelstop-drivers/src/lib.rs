//! Hardware driver implementations
//!
//! This crate provides the concrete endstop built on the traits defined in
//! accelstop-core and accelstop-hal:
//!
//! - ADXL345 register map and encodings
//! - `AccelEndstop`, the tap-interrupt virtual endstop

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod accel;
pub mod endstop;

pub use endstop::AccelEndstop;
