//! Accelerometer register maps

pub mod adxl345;
