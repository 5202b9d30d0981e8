//! Host-side protocol client.
//!
//! Speaks the same 8-byte frames as [`engine`](super::engine) from the
//! other end of the serial link. The transport must make the response
//! readable by the time `read_exact` is called (a blocking serial port,
//! or an in-process link that services the request on write).

use crate::error::CommsError;

use super::codec::{FRAME_LEN, Frame, get_fixed8_8, get_u16_be, get_u32_be, put_fixed8_8, put_u16_be};
use super::engine::opcode;
use super::transport::Transport;

/// STATUS1 + STATUS2 + STATUS3 merged into one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Status {
    pub heater_on_ticks: u16,
    pub heater_off_ticks: u16,
    /// Low 16 bits of the last recompute interval.
    pub dt: u16,
    pub heater_on: bool,
    pub pump_remaining_ticks: u32,
    pub temperature: f32,
    pub pump_on: bool,
    pub power: f32,
}

/// Result of a SETPOINT command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetpointChange {
    pub setpoint: f32,
    pub previous: f32,
}

pub struct Client<T> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// One request/response exchange. The response must echo the opcode.
    pub fn transact(&mut self, request: Frame) -> Result<Frame, CommsError> {
        self.transport
            .write(request.as_bytes())
            .map_err(|_| CommsError::Transport)?;
        self.transport.flush().map_err(|_| CommsError::Transport)?;

        let mut resp = [0u8; FRAME_LEN];
        self.transport
            .read_exact(&mut resp)
            .map_err(|_| CommsError::Transport)?;

        let sent = request.opcode();
        if resp[0] != sent {
            return Err(CommsError::OpcodeMismatch { sent, got: resp[0] });
        }
        Ok(Frame(resp))
    }

    pub fn status(&mut self) -> Result<Status, CommsError> {
        let s1 = self.transact(Frame::with_opcode(opcode::STATUS1))?.0;
        let s2 = self.transact(Frame::with_opcode(opcode::STATUS2))?.0;
        let s3 = self.transact(Frame::with_opcode(opcode::STATUS3))?.0;

        Ok(Status {
            heater_on_ticks: get_u16_be(&s1, 1),
            heater_off_ticks: get_u16_be(&s1, 3),
            dt: get_u16_be(&s1, 5),
            heater_on: s1[7] != 0,
            pump_remaining_ticks: get_u32_be(&s2, 1),
            temperature: get_fixed8_8(&s2, 5),
            pump_on: s2[7] != 0,
            power: get_fixed8_8(&s3, 1),
        })
    }

    pub fn set_setpoint(&mut self, celsius: f32) -> Result<SetpointChange, CommsError> {
        let mut req = Frame::with_opcode(opcode::SETPOINT);
        put_fixed8_8(&mut req.0, 1, celsius);
        let resp = self.transact(req)?.0;
        Ok(SetpointChange {
            setpoint: get_fixed8_8(&resp, 1),
            previous: get_fixed8_8(&resp, 3),
        })
    }

    pub fn start_pump(&mut self, ticks: u16) -> Result<(), CommsError> {
        let mut req = Frame::with_opcode(opcode::START_PUMP);
        put_u16_be(&mut req.0, 1, ticks);
        self.transact(req).map(|_| ())
    }

    pub fn stop_pump(&mut self) -> Result<(), CommsError> {
        self.transact(Frame::with_opcode(opcode::STOP_PUMP)).map(|_| ())
    }
}
