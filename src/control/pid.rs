//! PID controller for boiler heater power
//!
//! Computes the fraction of a duty cycle the heater should be on.
//! Output is always clamped to `[0, 1]`; the integral accumulator is
//! clamped to a symmetric ceiling so a long cold start does not wind it
//! up far enough to cause a slow overshoot recovery.

/// The capability set the duty-cycle scheduler needs from a controller.
pub trait Controller {
    /// Compute the power fraction for a reading taken `dt_secs` after the
    /// previous one. Must return a value in `[0, 1]`.
    fn evaluate(&mut self, dt_secs: f32, measured: f32) -> f32;

    /// Change the target. Takes effect on the next [`evaluate`](Self::evaluate).
    fn set_setpoint(&mut self, setpoint: f32);

    fn setpoint(&self) -> f32;
}

/// PID controller
#[derive(Debug, Clone)]
pub struct PidController {
    kp: f32,
    ki: f32,
    kd: f32,
    setpoint: f32,
    integral: f32,
    integral_limit: f32,
    prev_error: f32,
}

impl PidController {
    pub fn new(kp: f32, ki: f32, kd: f32, setpoint: f32, integral_limit: f32) -> Self {
        Self {
            kp,
            ki,
            kd,
            setpoint,
            integral: 0.0,
            integral_limit: integral_limit.abs(),
            prev_error: 0.0,
        }
    }

    /// Current gains.
    pub fn gains(&self) -> (f32, f32, f32) {
        (self.kp, self.ki, self.kd)
    }

    pub fn integral(&self) -> f32 {
        self.integral
    }

    pub fn previous_error(&self) -> f32 {
        self.prev_error
    }
}

impl Controller for PidController {
    fn evaluate(&mut self, dt_secs: f32, measured: f32) -> f32 {
        let error = self.setpoint - measured;
        if !error.is_finite() {
            // Leave the accumulators untouched rather than poison them.
            return 0.0;
        }

        self.integral = (self.integral + error * dt_secs)
            .clamp(-self.integral_limit, self.integral_limit);

        // A duplicate tick yields dt == 0; no rate of change is defined then.
        let derivative = if dt_secs > 0.0 {
            (error - self.prev_error) / dt_secs
        } else {
            0.0
        };

        self.prev_error = error;

        let output = self.kp * error + self.ki * self.integral + self.kd * derivative;
        if output.is_nan() {
            return 0.0;
        }
        output.clamp(0.0, 1.0)
    }

    fn set_setpoint(&mut self, setpoint: f32) {
        self.setpoint = setpoint;
    }

    fn setpoint(&self) -> f32 {
        self.setpoint
    }
}
