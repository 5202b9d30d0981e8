//! Controller configuration parameters
//!
//! All tunable parameters for the boiler controller. Defaults match the
//! values the machine was tuned with; a build can override them with a
//! JSON document (see [`ControllerConfig::from_json`]).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rpc::codec::FIXED8_8_MAX;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- PID ---
    /// Target boiler temperature in Celsius
    pub setpoint_c: f32,
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Symmetric clamp applied to the integral accumulator
    pub integral_limit: f32,

    // --- Duty cycle ---
    /// Length of one heater duty cycle in ticks (0 disables the scheduler)
    pub full_cycle_ticks: u16,
    /// The controller is re-evaluated only once the off-phase has run
    /// down to this many ticks
    pub off_guard_ticks: u16,

    // --- Safety ---
    /// Reading substituted when the sensor faults. Must exceed every
    /// setpoint the SETPOINT command can encode, so a fault never reads
    /// as below setpoint.
    pub sensor_fault_c: f32,

    // --- Timing ---
    /// Driver tick period (milliseconds); timestamps passed to the
    /// scheduler are in the same unit
    pub tick_period_ms: u32,
    /// Delay before the tick timer is armed (milliseconds)
    pub startup_delay_ms: u32,
    /// Serial link baud rate
    pub baud_rate: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // PID
            setpoint_c: 70.0,
            kp: 0.045,
            ki: 0.000_01,
            kd: 0.0,
            integral_limit: 250.0,

            // Duty cycle
            full_cycle_ticks: 500,
            off_guard_ticks: 9,

            // Safety
            sensor_fault_c: 300.0,

            // Timing
            tick_period_ms: 1,
            startup_delay_ms: 2500,
            baud_rate: 9600,
        }
    }
}

impl ControllerConfig {
    /// Parse a (possibly partial) JSON document; missing fields keep
    /// their defaults. The result is validated.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the loop unsafe or meaningless.
    pub fn validate(&self) -> Result<()> {
        if !(self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite()) {
            return Err(Error::Config("PID gains must be finite"));
        }
        if !(self.integral_limit.is_finite() && self.integral_limit >= 0.0) {
            return Err(Error::Config("integral_limit must be finite and non-negative"));
        }
        if !(0.0..256.0).contains(&self.setpoint_c) {
            return Err(Error::Config("setpoint_c must fit the 8.8 wire encoding"));
        }
        if self.sensor_fault_c.is_nan() || self.sensor_fault_c <= FIXED8_8_MAX {
            return Err(Error::Config("sensor_fault_c must exceed any wire setpoint"));
        }
        if self.tick_period_ms == 0 {
            return Err(Error::Config("tick_period_ms must be non-zero"));
        }
        if self.full_cycle_ticks != 0 && self.off_guard_ticks >= self.full_cycle_ticks {
            return Err(Error::Config("off_guard_ticks must be shorter than the cycle"));
        }
        Ok(())
    }
}
