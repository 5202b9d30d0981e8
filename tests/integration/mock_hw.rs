//! Mock hardware for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history, scripts sensor readings, and links a protocol client to a
//! device-side control loop in-process.

use std::collections::VecDeque;

use boilerctl::app::ports::{ActuatorPort, TemperatureSource};
use boilerctl::app::service::ControlLoop;
use boilerctl::config::ControllerConfig;
use boilerctl::control::pid::PidController;
use boilerctl::error::SensorError;
use boilerctl::rpc::codec::FRAME_LEN;
use boilerctl::rpc::transport::{LoopbackError, LoopbackTransport, Transport};
use boilerctl::scheduler::DutyCycleScheduler;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Heater(bool),
    Pump(bool),
}

#[derive(Default)]
pub struct MockActuators {
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockActuators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heater_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Heater(on) => Some(*on),
                ActuatorCall::Pump(_) => None,
            })
            .unwrap_or(false)
    }

    pub fn pump_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Pump(on) => Some(*on),
                ActuatorCall::Heater(_) => None,
            })
            .unwrap_or(false)
    }
}

impl ActuatorPort for MockActuators {
    fn set_heater(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Heater(on));
    }

    fn set_pump(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Pump(on));
    }
}

// ── Scripted sensor ───────────────────────────────────────────

/// Returns queued readings in order, then repeats the last one.
pub struct ScriptedSensor {
    script: VecDeque<Result<f32, SensorError>>,
    last: Result<f32, SensorError>,
    pub reads: usize,
}

#[allow(dead_code)]
impl ScriptedSensor {
    pub fn constant(celsius: f32) -> Self {
        Self::new(&[Ok(celsius)])
    }

    pub fn new(script: &[Result<f32, SensorError>]) -> Self {
        Self {
            script: script.iter().copied().collect(),
            last: Ok(20.0),
            reads: 0,
        }
    }
}

impl TemperatureSource for ScriptedSensor {
    fn read(&mut self) -> Result<f32, SensorError> {
        self.reads += 1;
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}

// ── Device harness ────────────────────────────────────────────

pub type Device = ControlLoop<PidController, ScriptedSensor, LoopbackTransport>;

pub fn device(config: &ControllerConfig, sensor: ScriptedSensor) -> Device {
    ControlLoop::new(
        DutyCycleScheduler::from_config(config, sensor),
        LoopbackTransport::new(),
    )
}

/// Send one request frame and tick until the response appears.
#[allow(dead_code)]
pub fn exchange(dev: &mut Device, now: &mut u32, request: [u8; FRAME_LEN]) -> [u8; FRAME_LEN] {
    dev.transport_mut().feed(&request).unwrap();
    for _ in 0..16 {
        dev.once(*now);
        *now += 1;
        if dev.transport_mut().pending_output() >= FRAME_LEN {
            break;
        }
    }
    let mut resp = [0u8; FRAME_LEN];
    assert_eq!(dev.transport_mut().drain(&mut resp), FRAME_LEN, "no response");
    resp
}

/// Client-side transport wired straight into a device's loopback.
///
/// `flush` ticks the device until its reply is queued, standing in for
/// the serial line plus the device's own timer.
pub struct DeviceLink {
    pub device: Device,
    pub now: u32,
}

#[allow(dead_code)]
impl DeviceLink {
    pub fn new(device: Device) -> Self {
        Self { device, now: 0 }
    }
}

/// Upper bound on ticks spent waiting for one reply.
const LINK_MAX_TICKS: u32 = 16;

impl Transport for DeviceLink {
    type Error = LoopbackError;

    fn available(&mut self) -> Result<usize, LoopbackError> {
        Ok(self.device.transport_mut().pending_output())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), LoopbackError> {
        if self.device.transport_mut().pending_output() < buf.len() {
            return Err(LoopbackError::Underrun);
        }
        self.device.transport_mut().drain(buf);
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), LoopbackError> {
        self.device.transport_mut().feed(data)
    }

    fn flush(&mut self) -> Result<(), LoopbackError> {
        for _ in 0..LINK_MAX_TICKS {
            if self.device.transport_mut().pending_output() >= FRAME_LEN {
                break;
            }
            self.device.once(self.now);
            self.now += 1;
        }
        Ok(())
    }
}
