//! Duty-cycle scheduler.
//!
//! Turns the PID power fraction into a run of heater-on ticks followed by
//! a run of heater-off ticks, and counts down an independent pump timer.
//! Driven once per timer tick by the [`ControlLoop`](crate::app::service::ControlLoop).
//!
//! ```text
//!  tick ──▶ ┌──────────┐   on_ticks > 0 ──▶ heater ON,  on_ticks -= 1
//!           │  heater  │   off_ticks > guard ─▶ heater OFF, off_ticks -= 1
//!           │  phase   │   otherwise ──▶ read sensor ─▶ PID ─▶ new phases
//!           └────┬─────┘
//!                ▼
//!           ┌──────────┐   pump_ticks > 0 ──▶ pump ON, pump_ticks -= 1
//!           │   pump   │   otherwise ──▶ pump OFF
//!           └──────────┘
//! ```
//!
//! The controller is consulted only at a phase boundary, so its integral
//! and derivative history advance exactly once per duty cycle.

use log::{debug, warn};

use crate::app::ports::TemperatureSource;
use crate::config::ControllerConfig;
use crate::control::pid::{Controller, PidController};
use crate::error::SensorError;

/// What a call to [`DutyCycleScheduler::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPhase {
    /// `full_cycle_ticks == 0`; nothing happened.
    Disabled,
    /// First tick after construction; only the timing baseline was taken.
    WarmUp,
    /// Heater and pump phases advanced.
    Advanced,
}

/// Copy of the scheduler state reported to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleStatus {
    pub heater_on_ticks: u16,
    pub heater_off_ticks: u16,
    pub dt: u32,
    pub heater_on: bool,
    pub pump_remaining_ticks: u32,
    pub measured_value: f32,
    pub pump_on: bool,
    pub power_fraction: f32,
}

pub struct DutyCycleScheduler<C, S> {
    controller: C,
    sensor: S,

    full_cycle_ticks: u16,
    off_guard_ticks: u16,
    tick_period_ms: u32,
    sensor_fault_c: f32,

    heater_on_ticks: u16,
    heater_off_ticks: u16,
    heater_on: bool,
    pump_on: bool,
    pump_remaining_ticks: u32,
    last_tick_time: u32,
    dt: u32,
    measured_value: f32,
    power_fraction: f32,
    warmed_up: bool,
}

impl<S: TemperatureSource> DutyCycleScheduler<PidController, S> {
    /// Build the scheduler with a PID controller tuned from `config`.
    pub fn from_config(config: &ControllerConfig, sensor: S) -> Self {
        let pid = PidController::new(
            config.kp,
            config.ki,
            config.kd,
            config.setpoint_c,
            config.integral_limit,
        );
        Self::new(pid, sensor, config)
    }
}

impl<C: Controller, S: TemperatureSource> DutyCycleScheduler<C, S> {
    pub fn new(controller: C, sensor: S, config: &ControllerConfig) -> Self {
        Self {
            controller,
            sensor,
            full_cycle_ticks: config.full_cycle_ticks,
            off_guard_ticks: config.off_guard_ticks,
            tick_period_ms: config.tick_period_ms,
            sensor_fault_c: config.sensor_fault_c,
            heater_on_ticks: 0,
            heater_off_ticks: 0,
            heater_on: false,
            pump_on: false,
            pump_remaining_ticks: 0,
            last_tick_time: 0,
            dt: 0,
            measured_value: 0.0,
            power_fraction: 0.0,
            warmed_up: false,
        }
    }

    /// Advance one tick. `now` is the driver's monotonic timestamp in
    /// tick-period units (milliseconds with the default 1 ms tick).
    pub fn tick(&mut self, now: u32) -> TickPhase {
        if self.full_cycle_ticks == 0 {
            return TickPhase::Disabled;
        }

        if !self.warmed_up {
            self.last_tick_time = now;
            self.warmed_up = true;
            return TickPhase::WarmUp;
        }

        self.advance_heater(now);
        self.advance_pump();
        TickPhase::Advanced
    }

    fn advance_heater(&mut self, now: u32) {
        if self.heater_on_ticks > 0 {
            self.heater_on = true;
            self.heater_on_ticks -= 1;
        } else if self.heater_off_ticks > self.off_guard_ticks {
            self.heater_on = false;
            self.heater_off_ticks -= 1;
        } else {
            self.recompute(now);
        }
    }

    fn recompute(&mut self, now: u32) {
        self.dt = now.wrapping_sub(self.last_tick_time);
        self.last_tick_time = now;
        self.measured_value = self.read_temperature();

        let dt_secs = self.dt as f32 * self.tick_period_ms as f32 / 1000.0;
        let power = self.controller.evaluate(dt_secs, self.measured_value);
        self.power_fraction = if power.is_nan() { 0.0 } else { power.clamp(0.0, 1.0) };

        let full = self.full_cycle_ticks;
        if self.power_fraction >= 1.0 {
            self.heater_on_ticks = full;
            self.heater_off_ticks = 0;
            self.heater_on = true;
        } else if self.power_fraction == 0.0 {
            self.heater_on_ticks = 0;
            self.heater_off_ticks = full;
            self.heater_on = false;
        } else {
            self.heater_on_ticks = (self.power_fraction * full as f32) as u16;
            self.heater_off_ticks = full - self.heater_on_ticks;
            self.heater_on = true;
        }

        debug!(
            "recompute: dt={} T={:.2} P={:.3} on={} off={}",
            self.dt,
            self.measured_value,
            self.power_fraction,
            self.heater_on_ticks,
            self.heater_off_ticks
        );
    }

    /// Read the sensor, substituting the configured high value on a fault
    /// so a dead thermocouple never commands more heat.
    fn read_temperature(&mut self) -> f32 {
        let reading = self.sensor.read().and_then(|celsius| {
            if celsius.is_finite() {
                Ok(celsius)
            } else {
                Err(SensorError::NotANumber)
            }
        });
        match reading {
            Ok(celsius) => celsius,
            Err(e) => {
                warn!("sensor: {}, using {:.1}", e, self.sensor_fault_c);
                self.sensor_fault_c
            }
        }
    }

    fn advance_pump(&mut self) {
        if self.pump_remaining_ticks > 0 {
            self.pump_on = true;
            self.pump_remaining_ticks -= 1;
        } else {
            self.pump_on = false;
        }
    }

    // ── Commands ──────────────────────────────────────────────

    /// Replace the pump countdown. Takes effect on the next tick.
    pub fn set_pump_ticks(&mut self, ticks: u32) {
        self.pump_remaining_ticks = ticks;
    }

    /// Change the cycle length. `0` disables the scheduler; the new length
    /// is used from the next recompute.
    pub fn set_full_cycle(&mut self, ticks: u16) {
        self.full_cycle_ticks = ticks;
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn status(&self) -> ScheduleStatus {
        ScheduleStatus {
            heater_on_ticks: self.heater_on_ticks,
            heater_off_ticks: self.heater_off_ticks,
            dt: self.dt,
            heater_on: self.heater_on,
            pump_remaining_ticks: self.pump_remaining_ticks,
            measured_value: self.measured_value,
            pump_on: self.pump_on,
            power_fraction: self.power_fraction,
        }
    }

    pub fn heater_on(&self) -> bool {
        self.heater_on
    }

    pub fn pump_on(&self) -> bool {
        self.pump_on
    }

    pub fn full_cycle_ticks(&self) -> u16 {
        self.full_cycle_ticks
    }

    pub fn heater_on_ticks(&self) -> u16 {
        self.heater_on_ticks
    }

    pub fn heater_off_ticks(&self) -> u16 {
        self.heater_off_ticks
    }

    pub fn pump_remaining_ticks(&self) -> u32 {
        self.pump_remaining_ticks
    }

    pub fn dt(&self) -> u32 {
        self.dt
    }

    pub fn last_tick_time(&self) -> u32 {
        self.last_tick_time
    }

    pub fn measured_value(&self) -> f32 {
        self.measured_value
    }

    pub fn power_fraction(&self) -> f32 {
        self.power_fraction
    }

    pub fn is_warmed_up(&self) -> bool {
        self.warmed_up
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
