//! Device register access
//!
//! Provides the register-level transport used to program the accelerometer.
//! Writes may be deferred to a specific MCU clock so they line up with the
//! motion timeline.

/// MCU clock value used to schedule a register write
pub type Clock = u64;

/// Register-level access to a single peripheral
///
/// Implementations must keep accesses that share a clock in submission
/// order. The arming sequence disables, drains and re-enables the tap
/// interrupt at one clock and relies on that ordering.
pub trait RegisterBus {
    /// Error type for transport failures
    type Error;

    /// Write a register
    ///
    /// # Arguments
    /// * `reg` - Register address
    /// * `value` - Value to write
    /// * `clock` - MCU clock to apply the write at, or `None` to send it
    ///   as soon as possible
    fn set_reg(&mut self, reg: u8, value: u8, clock: Option<Clock>) -> Result<(), Self::Error>;

    /// Read a register
    ///
    /// With `clock` set, the read is issued no earlier than that MCU clock,
    /// after any writes already queued for it.
    fn read_reg(&mut self, reg: u8, clock: Option<Clock>) -> Result<u8, Self::Error>;
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    type Error = B::Error;

    fn set_reg(&mut self, reg: u8, value: u8, clock: Option<Clock>) -> Result<(), Self::Error> {
        (**self).set_reg(reg, value, clock)
    }

    fn read_reg(&mut self, reg: u8, clock: Option<Clock>) -> Result<u8, Self::Error> {
        (**self).read_reg(reg, clock)
    }
}
