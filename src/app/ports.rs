//! Port traits — the boundary between the control core and the hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (thermocouple, heater/pump outputs) implement these
//! traits. The [`DutyCycleScheduler`](crate::scheduler::DutyCycleScheduler)
//! and [`ControlLoop`](super::service::ControlLoop) consume them via
//! generics, so the core never touches hardware directly and every test
//! can swap in a double.
//!
//! The byte transport port lives with the protocol in
//! [`rpc::transport`](crate::rpc::transport).

use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Temperature source (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Supplies one Celsius reading per call.
///
/// Implementations must return within a bounded time; a failed
/// acquisition is reported as an error, never retried here.
pub trait TemperatureSource {
    fn read(&mut self) -> Result<f32, SensorError>;
}

impl<T: TemperatureSource + ?Sized> TemperatureSource for &mut T {
    fn read(&mut self) -> Result<f32, SensorError> {
        (**self).read()
    }
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the driver loop applies the scheduler's decisions
/// through this after every tick.
pub trait ActuatorPort {
    fn set_heater(&mut self, on: bool);

    fn set_pump(&mut self, on: bool);

    /// De-energise both outputs.
    fn all_off(&mut self) {
        self.set_heater(false);
        self.set_pump(false);
    }
}
