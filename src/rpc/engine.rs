//! Command dispatcher: one 8-byte request in, one 8-byte response out.
//!
//! | Op | Name       | Response                                                      |
//! |----|------------|---------------------------------------------------------------|
//! |  1 | STATUS1    | `on_ticks:u16be off_ticks:u16be dt:u16be heater_on:u8`        |
//! |  2 | STATUS2    | `pump_ticks:u32be temperature:8.8 pump_on:u8`                 |
//! |  3 | STATUS3    | `power:8.8` then zeros                                        |
//! | 10 | SETPOINT   | `new:8.8 old:8.8` then zeros (request: `new:8.8`)             |
//! | 20 | START_PUMP | echo (request: `count:u16be`)                                 |
//! | 21 | STOP_PUMP  | echo                                                          |
//! |  * | unknown    | echo, no state change                                         |
//!
//! "echo" means the opcode byte followed by seven zero bytes.
//!
//! The dispatcher does not own a transport; [`ControlLoop`](crate::app::service::ControlLoop)
//! moves bytes between the transport and [`handle`].

use log::debug;

use crate::app::ports::TemperatureSource;
use crate::control::pid::Controller;
use crate::scheduler::{DutyCycleScheduler, ScheduleStatus};

use super::codec::{
    FRAME_LEN, get_fixed8_8, get_u16_be, put_fixed8_8, put_u16_be, put_u32_be,
};

/// Opcode byte values.
pub mod opcode {
    pub const STATUS1: u8 = 1;
    pub const STATUS2: u8 = 2;
    pub const STATUS3: u8 = 3;
    pub const SETPOINT: u8 = 10;
    pub const START_PUMP: u8 = 20;
    pub const STOP_PUMP: u8 = 21;
}

/// State the dispatcher reads and the two mutating commands write.
pub trait CommandTarget {
    fn status(&self) -> ScheduleStatus;

    fn setpoint(&self) -> f32;

    fn set_setpoint(&mut self, setpoint: f32);

    /// Replace (never add to) the pump countdown.
    fn set_pump_ticks(&mut self, ticks: u32);
}

impl<C: Controller, S: TemperatureSource> CommandTarget for DutyCycleScheduler<C, S> {
    fn status(&self) -> ScheduleStatus {
        DutyCycleScheduler::status(self)
    }

    fn setpoint(&self) -> f32 {
        self.controller().setpoint()
    }

    fn set_setpoint(&mut self, setpoint: f32) {
        self.controller_mut().set_setpoint(setpoint);
    }

    fn set_pump_ticks(&mut self, ticks: u32) {
        DutyCycleScheduler::set_pump_ticks(self, ticks);
    }
}

/// Decode `request`, apply it to `target`, and build the response.
///
/// Never fails: every opcode, known or not, produces a full frame whose
/// first byte echoes the request's.
pub fn handle<T: CommandTarget + ?Sized>(
    request: &[u8; FRAME_LEN],
    target: &mut T,
) -> [u8; FRAME_LEN] {
    let op = request[0];
    let mut resp = [0u8; FRAME_LEN];
    resp[0] = op;

    match op {
        opcode::STATUS1 => {
            let s = target.status();
            put_u16_be(&mut resp, 1, s.heater_on_ticks);
            put_u16_be(&mut resp, 3, s.heater_off_ticks);
            // Only the low half of dt fits the frame.
            put_u16_be(&mut resp, 5, s.dt as u16);
            resp[7] = s.heater_on as u8;
        }
        opcode::STATUS2 => {
            let s = target.status();
            put_u32_be(&mut resp, 1, s.pump_remaining_ticks);
            put_fixed8_8(&mut resp, 5, s.measured_value);
            resp[7] = s.pump_on as u8;
        }
        opcode::STATUS3 => {
            let s = target.status();
            put_fixed8_8(&mut resp, 1, s.power_fraction);
        }
        opcode::SETPOINT => {
            let new = get_fixed8_8(request, 1);
            let old = target.setpoint();
            target.set_setpoint(new);
            put_fixed8_8(&mut resp, 1, new);
            put_fixed8_8(&mut resp, 3, old);
            debug!("rpc: setpoint {:.3} -> {:.3}", old, new);
        }
        opcode::START_PUMP => {
            let count = get_u16_be(request, 1);
            target.set_pump_ticks(u32::from(count));
            debug!("rpc: pump on for {} ticks", count);
        }
        opcode::STOP_PUMP => {
            target.set_pump_ticks(0);
            debug!("rpc: pump stop");
        }
        other => {
            debug!("rpc: unknown opcode {}", other);
        }
    }

    resp
}
