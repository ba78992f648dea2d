//! ADXL345 tap virtual endstop
//!
//! Uses the accelerometer's single-tap interrupt as the endstop signal for
//! homing moves. The tap interrupt is armed just before a homing move and
//! disarmed once it has stopped; both steps wait for the toolhead to settle
//! so the vibration of the previous move (or of the stop itself) is not
//! mistaken for a tap.
//!
//! # Arming sequence
//!
//! Every access is scheduled at the MCU clock of the settled print time:
//!
//! 1. INT_ENABLE = 0x00 (disable tap interrupt)
//! 2. read INT_SOURCE (drain any latched event)
//! 3. INT_ENABLE = SINGLE_TAP
//! 4. POWER_CTL = MEASURE
//!
//! Then INT_SOURCE is polled until SINGLE_TAP reads clear. A flag that stays
//! set means the chip is tripping on noise and the endstop cannot be trusted.

use heapless::String;

use accelstop_core::command::{AccelEndstopCommand, CommandResponse, SetAccelEndstop};
use accelstop_core::config::{EndstopSettings, InterruptRouting, TapConfig, MAX_LABEL_LEN};
use accelstop_core::error::{ConfigError, EndstopError};
use accelstop_core::homing::HomingObserver;
use accelstop_core::pins::{check_virtual_endstop, PinParams, PinType};
use accelstop_core::state::{FaultKind, SyncEvent, SyncState};
use accelstop_core::traits::{
    EndstopId, HomingMove, NoScript, PinChip, PinRegistry, ScriptHook, Toolhead,
};
use accelstop_hal::{Clock, RegisterBus};

use crate::accel::adxl345::{self, reg, IntSource};

/// Settling time before arming and before disarming (s)
pub const REST_TIME: f64 = 0.1;

/// INT_SOURCE polls before a latched tap is treated as a fault
pub const TAP_CLEAR_RETRIES: usize = 8;

/// Accelerometer tap endstop
///
/// Owns the register bus: nothing else may touch the tap registers while
/// the endstop is configured. The toolhead is borrowed per homing move.
pub struct AccelEndstop<B, A = NoScript, D = NoScript> {
    bus: B,
    activate: A,
    deactivate: D,
    chip_name: String<MAX_LABEL_LEN>,
    routing: InterruptRouting,
    tap: TapConfig,
    endstop: EndstopId,
    state: SyncState,
}

impl<B: RegisterBus> AccelEndstop<B> {
    /// Create an endstop for an already registered interrupt pin
    pub fn new(settings: &EndstopSettings, endstop: EndstopId, bus: B) -> Self {
        Self {
            bus,
            activate: NoScript,
            deactivate: NoScript,
            chip_name: settings.chip_name.clone(),
            routing: settings.routing,
            tap: settings.tap,
            endstop,
            state: SyncState::Idle,
        }
    }

    /// Register the interrupt pin as an endstop and create the endstop
    pub fn from_settings<P: PinRegistry + ?Sized>(
        settings: &EndstopSettings,
        pins: &mut P,
        bus: B,
    ) -> Result<Self, ConfigError> {
        let endstop = pins.setup_endstop(&settings.int_pin)?;
        Ok(Self::new(settings, endstop, bus))
    }
}

impl<B, A, D> AccelEndstop<B, A, D>
where
    B: RegisterBus,
    A: ScriptHook,
    D: ScriptHook,
{
    /// Attach activation/deactivation scripts
    pub fn with_scripts<A2, D2>(self, activate: A2, deactivate: D2) -> AccelEndstop<B, A2, D2>
    where
        A2: ScriptHook,
        D2: ScriptHook,
    {
        AccelEndstop {
            bus: self.bus,
            activate,
            deactivate,
            chip_name: self.chip_name,
            routing: self.routing,
            tap: self.tap,
            endstop: self.endstop,
            state: self.state,
        }
    }

    /// Current state of the arm/disarm cycle
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Current tap settings
    pub fn tap_config(&self) -> &TapConfig {
        &self.tap
    }

    /// Interrupt line and polarity
    pub fn routing(&self) -> &InterruptRouting {
        &self.routing
    }

    /// Endstop handle shared with the motion subsystem
    pub fn endstop(&self) -> EndstopId {
        self.endstop
    }

    /// Accelerometer object name (also the pin chip name)
    pub fn chip_name(&self) -> &str {
        &self.chip_name
    }

    /// Get the register bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Get the register bus mutably
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Program the chip for tap detection
    ///
    /// Called once the MCU connection is up. Leaves the chip in standby with
    /// the tap interrupt routed but disabled.
    pub fn handle_connect(&mut self) -> Result<(), EndstopError<B::Error>> {
        let devid = self.read_reg(reg::DEVID, None)?;
        if devid != adxl345::DEVID_ADXL345 {
            #[cfg(feature = "defmt")]
            defmt::warn!("accel endstop: unexpected DEVID {=u8:#x}", devid);
            return Err(ConfigError::UnsupportedChip.into());
        }

        for (r, value) in adxl345::init_writes(&self.routing, &self.tap) {
            self.set_reg(r, value, None)?;
        }

        #[cfg(feature = "defmt")]
        defmt::info!("accel endstop: tap detection configured ({})", self.routing);
        Ok(())
    }

    /// Arm the tap interrupt for a homing move
    ///
    /// Does nothing if this endstop is not part of `hmove`.
    pub fn homing_move_begin<T: Toolhead + ?Sized>(
        &mut self,
        toolhead: &mut T,
        hmove: &dyn HomingMove,
    ) -> Result<(), EndstopError<B::Error>> {
        if !hmove.has_endstop(self.endstop) {
            return Ok(());
        }
        if let SyncState::Faulted(kind) = self.state {
            return Err(EndstopError::Faulted(kind));
        }

        self.state = self.state.transition(SyncEvent::MoveBegin);
        let result = self.arm(toolhead);
        self.finish(result, SyncEvent::ArmComplete)
    }

    /// Disarm the tap interrupt after a homing move
    ///
    /// Does nothing if this endstop is not part of `hmove` or was never
    /// armed.
    pub fn homing_move_end<T: Toolhead + ?Sized>(
        &mut self,
        toolhead: &mut T,
        hmove: &dyn HomingMove,
    ) -> Result<(), EndstopError<B::Error>> {
        if !hmove.has_endstop(self.endstop) {
            return Ok(());
        }
        if let SyncState::Faulted(kind) = self.state {
            return Err(EndstopError::Faulted(kind));
        }
        if !self.state.is_armed() {
            return Ok(());
        }

        self.state = self.state.transition(SyncEvent::MoveEnd);
        let result = self.disarm(toolhead);
        self.finish(result, SyncEvent::DisarmComplete)
    }

    /// `SET_ACCEL_ENDSTOP`
    ///
    /// Without parameters, reports the current settings and touches nothing.
    /// Otherwise the merged pair is validated and both registers are
    /// rewritten.
    pub fn set_accel_endstop(
        &mut self,
        cmd: &SetAccelEndstop,
    ) -> Result<CommandResponse, EndstopError<B::Error>> {
        if cmd.is_query() {
            return Ok(CommandResponse::Status(self.tap));
        }

        let tap = self.tap.with_updates(cmd.tap_thresh, cmd.tap_dur)?;
        self.write_tap(&tap)?;
        self.tap = tap;

        #[cfg(feature = "defmt")]
        defmt::info!("accel endstop: tap settings updated ({})", tap);
        Ok(CommandResponse::Applied(tap))
    }

    /// `ACCEL_ENDSTOP_RESET`
    ///
    /// Puts the chip back in standby, drains INT_SOURCE and returns a
    /// faulted endstop to Idle. A no-op when not faulted.
    pub fn reset(&mut self) -> Result<CommandResponse, EndstopError<B::Error>> {
        if !self.state.is_faulted() {
            return Ok(CommandResponse::Reset);
        }

        self.set_reg(reg::INT_ENABLE, adxl345::INT_NONE, None)?;
        self.set_reg(reg::POWER_CTL, adxl345::POWER_STANDBY, None)?;
        self.read_reg(reg::INT_SOURCE, None)?;
        self.state = self.state.transition(SyncEvent::Reset);

        #[cfg(feature = "defmt")]
        defmt::info!("accel endstop: fault cleared");
        Ok(CommandResponse::Reset)
    }

    /// Dispatch a parsed runtime command
    pub fn run_command(
        &mut self,
        cmd: &AccelEndstopCommand,
    ) -> Result<CommandResponse, EndstopError<B::Error>> {
        match cmd {
            AccelEndstopCommand::Set(set) => self.set_accel_endstop(set),
            AccelEndstopCommand::Reset => self.reset(),
        }
    }

    fn arm<T: Toolhead + ?Sized>(&mut self, toolhead: &mut T) -> Result<(), EndstopError<B::Error>> {
        self.activate.run()?;

        let clock = settle(toolhead, true);
        self.set_reg(reg::INT_ENABLE, adxl345::INT_NONE, Some(clock))?;
        self.read_reg(reg::INT_SOURCE, Some(clock))?;
        self.set_reg(reg::INT_ENABLE, adxl345::INT_SINGLE_TAP, Some(clock))?;
        self.set_reg(reg::POWER_CTL, adxl345::POWER_MEASURE, Some(clock))?;

        #[cfg(feature = "defmt")]
        defmt::debug!("accel endstop: armed at clock {=u64}", clock);
        self.try_clear_tap(FaultKind::TapBeforeMove)
    }

    fn disarm<T: Toolhead + ?Sized>(
        &mut self,
        toolhead: &mut T,
    ) -> Result<(), EndstopError<B::Error>> {
        let clock = settle(toolhead, false);
        self.set_reg(reg::INT_ENABLE, adxl345::INT_NONE, Some(clock))?;
        self.set_reg(reg::POWER_CTL, adxl345::POWER_STANDBY, Some(clock))?;

        #[cfg(feature = "defmt")]
        defmt::debug!("accel endstop: disarmed at clock {=u64}", clock);

        self.deactivate.run()?;
        self.try_clear_tap(FaultKind::TapAfterMove)
    }

    /// Poll INT_SOURCE until SINGLE_TAP reads clear
    fn try_clear_tap(&mut self, fault: FaultKind) -> Result<(), EndstopError<B::Error>> {
        for _ in 0..TAP_CLEAR_RETRIES {
            let src = IntSource::from_register(self.read_reg(reg::INT_SOURCE, None)?);
            if !src.single_tap {
                return Ok(());
            }
        }
        Err(EndstopError::SensorIntegrity(fault))
    }

    /// Record the outcome of an arm or disarm attempt
    fn finish(
        &mut self,
        result: Result<(), EndstopError<B::Error>>,
        done: SyncEvent,
    ) -> Result<(), EndstopError<B::Error>> {
        let event = match &result {
            Ok(()) => done,
            Err(EndstopError::SensorIntegrity(kind)) => SyncEvent::Fault(*kind),
            Err(_) => SyncEvent::Fault(FaultKind::Interrupted),
        };
        self.state = self.state.transition(event);

        #[cfg(feature = "defmt")]
        if let SyncState::Faulted(kind) = self.state {
            defmt::warn!("accel endstop: faulted ({})", kind);
        }
        result
    }

    fn write_tap(&mut self, tap: &TapConfig) -> Result<(), EndstopError<B::Error>> {
        for (r, value) in adxl345::tap_writes(tap) {
            self.set_reg(r, value, None)?;
        }
        Ok(())
    }

    fn set_reg(&mut self, r: u8, value: u8, clock: Option<Clock>) -> Result<(), EndstopError<B::Error>> {
        self.bus.set_reg(r, value, clock).map_err(EndstopError::Bus)
    }

    fn read_reg(&mut self, r: u8, clock: Option<Clock>) -> Result<u8, EndstopError<B::Error>> {
        self.bus.read_reg(r, clock).map_err(EndstopError::Bus)
    }
}

/// Let the toolhead come to rest and return the MCU clock to act at
///
/// Before arming, pending steps are flushed first so the dwell starts from
/// the true end of the previous move.
fn settle<T: Toolhead + ?Sized>(toolhead: &mut T, flush: bool) -> Clock {
    if flush {
        toolhead.flush_step_generation();
    }
    toolhead.dwell(REST_TIME);
    let print_time = toolhead.last_move_time();
    toolhead.print_time_to_clock(print_time)
}

impl<B, A, D> PinChip for AccelEndstop<B, A, D> {
    fn setup_pin(&self, pin_type: PinType, params: &PinParams) -> Result<EndstopId, ConfigError> {
        if params.chip_name.as_str() != self.chip_name.as_str() {
            return Err(ConfigError::NotAnEndstop);
        }
        check_virtual_endstop(pin_type, params)?;
        Ok(self.endstop)
    }
}

impl<T, B, A, D> HomingObserver<T> for AccelEndstop<B, A, D>
where
    T: Toolhead + ?Sized,
    B: RegisterBus,
    A: ScriptHook,
    D: ScriptHook,
{
    type Error = EndstopError<B::Error>;

    fn homing_move_begin(&mut self, toolhead: &mut T, hmove: &dyn HomingMove) -> Result<(), Self::Error> {
        AccelEndstop::homing_move_begin(self, toolhead, hmove)
    }

    fn homing_move_end(&mut self, toolhead: &mut T, hmove: &dyn HomingMove) -> Result<(), Self::Error> {
        AccelEndstop::homing_move_end(self, toolhead, hmove)
    }
}
