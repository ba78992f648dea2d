//! User script hooks
//!
//! Activation and deactivation scripts run around every homing move that
//! uses the endstop (for example to move a probe into place). They may
//! block and may fail.

/// Errors reported by a script hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScriptError {
    /// A command in the script failed
    CommandFailed,
    /// Script was aborted (e.g. emergency stop)
    Aborted,
}

/// A user supplied action sequence
pub trait ScriptHook {
    /// Run the script to completion
    fn run(&mut self) -> Result<(), ScriptError>;
}

/// Empty script (the default when none is configured)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoScript;

impl ScriptHook for NoScript {
    fn run(&mut self) -> Result<(), ScriptError> {
        Ok(())
    }
}

impl<F> ScriptHook for F
where
    F: FnMut() -> Result<(), ScriptError>,
{
    fn run(&mut self) -> Result<(), ScriptError> {
        self()
    }
}
