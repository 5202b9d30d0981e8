//! Closed-loop runs against the two-node boiler model.
//!
//! 10 ms ticks, a 0.5 s duty cycle, and the stock gains. Each tick the
//! loop's heater decision drives the model for one tick period.

use std::cell::RefCell;
use std::rc::Rc;

use boilerctl::app::service::ControlLoop;
use boilerctl::config::ControllerConfig;
use boilerctl::control::pid::PidController;
use boilerctl::drivers::outputs::Outputs;
use boilerctl::error::SensorError;
use boilerctl::rpc::codec::{FRAME_LEN, fixed8_8};
use boilerctl::rpc::transport::LoopbackTransport;
use boilerctl::scheduler::DutyCycleScheduler;
use boilerctl::sim::boiler::{BoilerModel, SharedBoiler, SimSensor};

const TICK_MS: u32 = 10;
const TICKS_PER_SEC: u32 = 1_000 / TICK_MS;

struct Rig {
    boiler: SharedBoiler,
    control: ControlLoop<PidController, SimSensor, LoopbackTransport>,
    outputs: Outputs,
    now: u32,
    peak_c: f32,
}

impl Rig {
    fn new() -> Self {
        let config = ControllerConfig {
            tick_period_ms: TICK_MS,
            full_cycle_ticks: 50,
            off_guard_ticks: 4,
            ..ControllerConfig::default()
        };
        config.validate().unwrap();

        let boiler: SharedBoiler = Rc::new(RefCell::new(BoilerModel::default()));
        let sensor = SimSensor::new(boiler.clone());
        let control = ControlLoop::new(
            DutyCycleScheduler::from_config(&config, sensor),
            LoopbackTransport::new(),
        );
        Self {
            boiler,
            control,
            outputs: Outputs::new(),
            now: 0,
            peak_c: f32::MIN,
        }
    }

    fn run_secs(&mut self, secs: u32) {
        let dt_s = TICK_MS as f32 / 1_000.0;
        for _ in 0..secs * TICKS_PER_SEC {
            self.control.once(self.now);
            self.control.apply_outputs(&mut self.outputs);
            self.boiler.borrow_mut().step(dt_s, self.outputs.heater());
            self.peak_c = self.peak_c.max(self.metal_c());
            self.now += 1;
        }
    }

    fn metal_c(&self) -> f32 {
        self.boiler.borrow().metal_c()
    }

    fn send(&mut self, frame: [u8; FRAME_LEN]) {
        self.control.transport_mut().feed(&frame).unwrap();
    }
}

#[test]
fn settles_near_setpoint_from_cold() {
    let mut rig = Rig::new();
    rig.run_secs(1_500);

    let t = rig.metal_c();
    assert!((t - 70.0).abs() < 1.5, "settled at {t}");
    assert!(rig.peak_c < 80.0, "overshoot to {}", rig.peak_c);
}

#[test]
fn follows_setpoint_change_over_the_wire() {
    let mut rig = Rig::new();
    rig.run_secs(1_500);

    let [int, frac] = fixed8_8(90.0);
    rig.send([10, int, frac, 0, 0, 0, 0, 0]);
    rig.peak_c = f32::MIN;
    rig.run_secs(1_500);

    let t = rig.metal_c();
    assert!((t - 90.0).abs() < 1.5, "settled at {t}");
    assert!(rig.peak_c < 100.0, "overshoot to {}", rig.peak_c);
}

#[test]
fn sensor_fault_lets_boiler_cool() {
    let mut rig = Rig::new();
    rig.run_secs(600);
    let before = rig.metal_c();

    rig.control
        .scheduler_mut()
        .sensor_mut()
        .inject_fault(Some(SensorError::ThermocoupleFault(0b001)));
    rig.run_secs(5);
    let writes_before = rig.outputs.writes();
    rig.run_secs(600);

    assert!(!rig.outputs.heater());
    assert_eq!(rig.outputs.writes(), writes_before, "heater toggled while faulted");
    assert!(rig.metal_c() < before, "{} !< {}", rig.metal_c(), before);
}
