//! Heater and pump solid-state relay outputs.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIOs via hw_init helpers.
//! On host/test: tracks state in-memory only.
//!
//! The GPIO is only written on a change, so the per-tick
//! [`apply_outputs`](crate::app::service::ControlLoop::apply_outputs) call
//! costs nothing in steady state.

use crate::app::ports::ActuatorPort;
use crate::drivers::hw_init;
use crate::pins;

pub struct Outputs {
    heater: bool,
    pump: bool,
    writes: u32,
}

impl Default for Outputs {
    fn default() -> Self {
        Self::new()
    }
}

impl Outputs {
    /// Both relays are assumed off (as left by `hw_init`).
    pub fn new() -> Self {
        Self {
            heater: false,
            pump: false,
            writes: 0,
        }
    }

    pub fn heater(&self) -> bool {
        self.heater
    }

    pub fn pump(&self) -> bool {
        self.pump
    }

    /// GPIO writes issued so far.
    pub fn writes(&self) -> u32 {
        self.writes
    }

    fn drive(&mut self, pin: i32, on: bool) {
        hw_init::gpio_write(pin, on);
        self.writes = self.writes.wrapping_add(1);
    }
}

impl ActuatorPort for Outputs {
    fn set_heater(&mut self, on: bool) {
        if on != self.heater {
            self.drive(pins::HEATER_GPIO, on);
            self.heater = on;
        }
    }

    fn set_pump(&mut self, on: bool) {
        if on != self.pump {
            self.drive(pins::PUMP_GPIO, on);
            self.pump = on;
        }
    }
}
