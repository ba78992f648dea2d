//! Runtime commands
//!
//! `SET_ACCEL_ENDSTOP [TAP_THRESH=<mm/s^2>] [TAP_DUR=<s>]` reports or updates
//! the tap settings without reloading the config. `ACCEL_ENDSTOP_RESET`
//! clears a fault left by a failed homing move.
//!
//! Parameters follow the extended g-code form `NAME=value`; names are case
//! insensitive and unknown names are ignored.

use core::fmt;

use crate::config::TapConfig;
use crate::error::ConfigError;

/// Command name for tap reconfiguration
pub const SET_ACCEL_ENDSTOP: &str = "SET_ACCEL_ENDSTOP";

/// Help text for [`SET_ACCEL_ENDSTOP`]
pub const SET_ACCEL_ENDSTOP_HELP: &str = "Set TAP_THRESH or TAP_DUR for accel endstop";

/// Command name for fault reset
pub const ACCEL_ENDSTOP_RESET: &str = "ACCEL_ENDSTOP_RESET";

/// Help text for [`ACCEL_ENDSTOP_RESET`]
pub const ACCEL_ENDSTOP_RESET_HELP: &str = "Clear an accel endstop fault after a failed homing move";

/// Commands handled by the accelerometer endstop
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelEndstopCommand {
    /// Report or update tap settings
    Set(SetAccelEndstop),
    /// Clear a fault
    Reset,
}

impl AccelEndstopCommand {
    /// Parse a command line
    ///
    /// Returns `Ok(None)` for commands that belong to someone else.
    pub fn parse(line: &str) -> Result<Option<Self>, ConfigError> {
        let line = line.trim();
        let (name, params) = match line.split_once(char::is_whitespace) {
            Some((name, params)) => (name, params),
            None => (line, ""),
        };

        if name.eq_ignore_ascii_case(SET_ACCEL_ENDSTOP) {
            Ok(Some(AccelEndstopCommand::Set(SetAccelEndstop::parse(params)?)))
        } else if name.eq_ignore_ascii_case(ACCEL_ENDSTOP_RESET) {
            Ok(Some(AccelEndstopCommand::Reset))
        } else {
            Ok(None)
        }
    }
}

/// `SET_ACCEL_ENDSTOP` parameters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetAccelEndstop {
    /// New tap threshold (mm/s^2)
    pub tap_thresh: Option<f64>,
    /// New tap duration (s)
    pub tap_dur: Option<f64>,
}

impl SetAccelEndstop {
    /// Parse `NAME=value` parameters
    pub fn parse(params: &str) -> Result<Self, ConfigError> {
        let mut cmd = Self::default();

        for token in params.split_whitespace() {
            let (name, value) = token.split_once('=').ok_or(ConfigError::InvalidParameter)?;
            if name.eq_ignore_ascii_case("TAP_THRESH") {
                cmd.tap_thresh = Some(parse_float(value)?);
            } else if name.eq_ignore_ascii_case("TAP_DUR") {
                cmd.tap_dur = Some(parse_float(value)?);
            }
        }

        Ok(cmd)
    }

    /// Check if this only asks for the current values
    pub fn is_query(&self) -> bool {
        self.tap_thresh.is_none() && self.tap_dur.is_none()
    }
}

fn parse_float(value: &str) -> Result<f64, ConfigError> {
    value
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidParameter)
}

/// Outcome of a command
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandResponse {
    /// Current tap settings, to be shown to the operator
    Status(TapConfig),
    /// New tap settings were written
    Applied(TapConfig),
    /// Fault cleared (or nothing to clear)
    Reset,
}

impl CommandResponse {
    /// Check if there is nothing to report
    pub fn is_silent(&self) -> bool {
        !matches!(self, CommandResponse::Status(_))
    }
}

impl fmt::Display for CommandResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResponse::Status(tap) => write!(
                f,
                "TAP_THRESH={}, TAP_DUR={}",
                tap.threshold(),
                tap.duration()
            ),
            CommandResponse::Applied(_) | CommandResponse::Reset => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let cmd = SetAccelEndstop::parse("").unwrap();
        assert!(cmd.is_query());
    }

    #[test]
    fn test_parse_params() {
        let cmd = SetAccelEndstop::parse("TAP_THRESH=6000 tap_dur=0.02").unwrap();
        assert_eq!(cmd.tap_thresh, Some(6000.0));
        assert_eq!(cmd.tap_dur, Some(0.02));
        assert!(!cmd.is_query());

        let cmd = SetAccelEndstop::parse("TAP_DUR=0.05").unwrap();
        assert_eq!(cmd.tap_thresh, None);
        assert_eq!(cmd.tap_dur, Some(0.05));
    }

    #[test]
    fn test_parse_ignores_unknown() {
        let cmd = SetAccelEndstop::parse("AXIS=Z TAP_THRESH=7000").unwrap();
        assert_eq!(cmd.tap_thresh, Some(7000.0));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            SetAccelEndstop::parse("TAP_THRESH=abc"),
            Err(ConfigError::InvalidParameter)
        );
        assert_eq!(
            SetAccelEndstop::parse("TAP_THRESH"),
            Err(ConfigError::InvalidParameter)
        );
    }

    #[test]
    fn test_parse_command_line() {
        let cmd = AccelEndstopCommand::parse("SET_ACCEL_ENDSTOP TAP_THRESH=5500").unwrap();
        assert_eq!(
            cmd,
            Some(AccelEndstopCommand::Set(SetAccelEndstop {
                tap_thresh: Some(5500.0),
                tap_dur: None,
            }))
        );

        let cmd = AccelEndstopCommand::parse("set_accel_endstop").unwrap();
        assert_eq!(
            cmd,
            Some(AccelEndstopCommand::Set(SetAccelEndstop::default()))
        );

        let cmd = AccelEndstopCommand::parse("ACCEL_ENDSTOP_RESET").unwrap();
        assert_eq!(cmd, Some(AccelEndstopCommand::Reset));

        assert_eq!(AccelEndstopCommand::parse("G28 Z").unwrap(), None);
    }

    #[test]
    fn test_status_message() {
        let response = CommandResponse::Status(TapConfig::default());
        assert_eq!(format!("{}", response), "TAP_THRESH=5000, TAP_DUR=0.01");
        assert!(!response.is_silent());
        assert!(CommandResponse::Applied(TapConfig::default()).is_silent());
    }
}
