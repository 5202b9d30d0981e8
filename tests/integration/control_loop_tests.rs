//! Control loop wiring: tick phases, output application, command pacing.

use boilerctl::app::ports::ActuatorPort;
use boilerctl::config::ControllerConfig;
use boilerctl::drivers::outputs::Outputs;
use boilerctl::error::SensorError;
use boilerctl::rpc::transport::Transport;
use boilerctl::scheduler::TickPhase;

use crate::mock_hw::{ActuatorCall, MockActuators, ScriptedSensor, device};

#[test]
fn warm_up_tick_actuates_nothing() {
    let mut dev = device(&ControllerConfig::default(), ScriptedSensor::constant(20.0));
    let mut hw = MockActuators::new();

    assert_eq!(dev.once(5_000), TickPhase::WarmUp);
    dev.apply_outputs(&mut hw);

    assert_eq!(hw.calls, [ActuatorCall::Heater(false), ActuatorCall::Pump(false)]);
    assert_eq!(dev.scheduler().last_tick_time(), 5_000);
    assert_eq!(dev.scheduler_mut().sensor_mut().reads, 0);
}

#[test]
fn disabled_scheduler_never_actuates_or_reads_frames() {
    let cfg = ControllerConfig {
        full_cycle_ticks: 0,
        ..ControllerConfig::default()
    };
    let mut dev = device(&cfg, ScriptedSensor::constant(20.0));
    let mut hw = MockActuators::new();
    dev.transport_mut().feed(&[20, 0, 50, 0, 0, 0, 0, 0]).unwrap();

    for now in 0..1_000 {
        assert_eq!(dev.once(now), TickPhase::Disabled);
        dev.apply_outputs(&mut hw);
        assert!(!hw.heater_on());
        assert!(!hw.pump_on());
    }
    assert_eq!(dev.transport_mut().available(), Ok(8));
    assert_eq!(dev.frames_served(), 0);
}

#[test]
fn queued_frames_are_served_one_per_tick() {
    let mut dev = device(&ControllerConfig::default(), ScriptedSensor::constant(20.0));
    for _ in 0..4 {
        dev.transport_mut().feed(&[3, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    }

    dev.once(0);
    for (i, now) in (1..=4).enumerate() {
        dev.once(now);
        assert_eq!(dev.frames_served() as usize, i + 1);
        assert_eq!(dev.transport_mut().pending_output(), 8 * (i + 1));
    }
    assert_eq!(dev.transport_mut().available(), Ok(0));
}

#[test]
fn cold_boiler_turns_heater_on() {
    let mut dev = device(&ControllerConfig::default(), ScriptedSensor::constant(20.0));
    let mut outputs = Outputs::new();

    dev.once(0);
    dev.once(1);
    dev.apply_outputs(&mut outputs);
    assert!(outputs.heater());
    assert_eq!(dev.scheduler().heater_on_ticks(), 500);
}

#[test]
fn faulted_sensor_keeps_heater_off() {
    let sensor = ScriptedSensor::new(&[Err(SensorError::Bus)]);
    let mut dev = device(&ControllerConfig::default(), sensor);
    let mut outputs = Outputs::new();

    for now in 0..2_000 {
        dev.once(now);
        dev.apply_outputs(&mut outputs);
        assert!(!outputs.heater(), "heater on at tick {now}");
    }
    assert_eq!(dev.scheduler().measured_value(), 300.0);
}

#[test]
fn recovered_sensor_resumes_heating() {
    let sensor = ScriptedSensor::new(&[Err(SensorError::NotANumber), Ok(20.0)]);
    let cfg = ControllerConfig {
        full_cycle_ticks: 10,
        off_guard_ticks: 0,
        ..ControllerConfig::default()
    };
    let mut dev = device(&cfg, sensor);

    dev.once(0);
    dev.once(1); // faulted recompute: all off for 10 ticks
    assert!(!dev.scheduler().heater_on());
    for now in 2..=11 {
        dev.once(now);
    }
    dev.once(12); // next recompute reads 20 °C
    assert!(dev.scheduler().heater_on());
    assert_eq!(dev.scheduler().measured_value(), 20.0);
}

#[test]
fn all_off_reaches_both_outputs() {
    let mut hw = MockActuators::new();
    hw.set_heater(true);
    hw.set_pump(true);
    hw.all_off();
    assert!(!hw.heater_on());
    assert!(!hw.pump_on());
}
