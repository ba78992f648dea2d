//! Accelstop Hardware Abstraction Layer
//!
//! This crate defines the transport traits that sit between the endstop
//! logic and whatever actually talks to the accelerometer. On a Klipper-style
//! host that is the MCU command queue, which can hold a register write back
//! until a given MCU clock.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  accelstop-drivers (AccelEndstop)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  accelstop-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  MCU transport (SPI/I2C via command     │
//! │  queue, provided by the host)           │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`register::RegisterBus`] - Device register reads and writes, optionally scheduled

#![no_std]
#![deny(unsafe_code)]

pub mod register;

pub use register::{Clock, RegisterBus};
