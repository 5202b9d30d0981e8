//! Command protocol exercised end to end: frames in through the
//! transport, scheduler state out through the response.

use boilerctl::config::ControllerConfig;
use boilerctl::control::pid::Controller;
use boilerctl::error::{CommsError, SensorError};
use boilerctl::rpc::client::Client;
use boilerctl::rpc::codec::unfixed8_8;

use crate::mock_hw::{DeviceLink, ScriptedSensor, device, exchange};

fn short_cycle() -> ControllerConfig {
    ControllerConfig {
        full_cycle_ticks: 10,
        off_guard_ticks: 0,
        ..ControllerConfig::default()
    }
}

#[test]
fn setpoint_command_round_trip() {
    let mut dev = device(&ControllerConfig::default(), ScriptedSensor::constant(20.0));
    let mut now = 0;

    let resp = exchange(&mut dev, &mut now, [10, 75, 128, 0, 0, 0, 0, 0]);

    let expected = 75.0 + 128.0 / 255.0;
    let applied = dev.scheduler().controller().setpoint();
    assert!((applied - expected).abs() < 1e-4, "applied {applied}");

    assert_eq!(resp[0], 10);
    let echoed = unfixed8_8(resp[1], resp[2]);
    assert!((echoed - expected).abs() <= 1.0 / 255.0, "echoed {echoed}");
    assert_eq!(unfixed8_8(resp[3], resp[4]), 70.0);
    assert_eq!(&resp[5..], &[0, 0, 0]);
}

#[test]
fn start_pump_runs_exactly_count_ticks() {
    let mut dev = device(&ControllerConfig::default(), ScriptedSensor::constant(20.0));
    let mut now = 0;

    let resp = exchange(&mut dev, &mut now, [20, 0x01, 0x2C, 0, 0, 0, 0, 0]);
    assert_eq!(resp, [20, 0, 0, 0, 0, 0, 0, 0]);
    // Applied after this tick's pump advance.
    assert!(!dev.scheduler().pump_on());
    assert_eq!(dev.scheduler().pump_remaining_ticks(), 300);

    for i in 1..=300 {
        dev.once(now);
        now += 1;
        assert!(dev.scheduler().pump_on(), "pump off early on tick {i}");
    }
    dev.once(now);
    assert!(!dev.scheduler().pump_on(), "pump still on at tick 301");
}

#[test]
fn stop_pump_cancels_countdown() {
    let mut dev = device(&ControllerConfig::default(), ScriptedSensor::constant(20.0));
    let mut now = 0;

    exchange(&mut dev, &mut now, [20, 0x00, 0x64, 0, 0, 0, 0, 0]);
    dev.once(now);
    now += 1;
    assert!(dev.scheduler().pump_on());

    let resp = exchange(&mut dev, &mut now, [21, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(resp, [21, 0, 0, 0, 0, 0, 0, 0]);
    dev.once(now);
    assert!(!dev.scheduler().pump_on());
}

#[test]
fn unknown_opcode_is_echoed() {
    let mut dev = device(&ControllerConfig::default(), ScriptedSensor::constant(20.0));
    let mut now = 0;
    let resp = exchange(&mut dev, &mut now, [99, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(resp, [99, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(dev.scheduler().pump_remaining_ticks(), 0);
    assert_eq!(dev.scheduler().controller().setpoint(), 70.0);
}

#[test]
fn status_frames_reflect_schedule() {
    // 60 °C against 70 °C: kp * 10 = 0.45 -> 4 on, 6 off.
    let mut dev = device(&short_cycle(), ScriptedSensor::constant(60.0));
    let mut now = 0;

    let s1 = exchange(&mut dev, &mut now, [1, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(s1, [1, 0, 4, 0, 6, 0, 1, 1]);

    let s2 = exchange(&mut dev, &mut now, [2, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(s2, [2, 0, 0, 0, 0, 60, 0, 0]);

    let s3 = exchange(&mut dev, &mut now, [3, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(s3[0], 3);
    assert!((unfixed8_8(s3[1], s3[2]) - 0.45).abs() < 1.0 / 255.0);
    assert_eq!(&s3[3..], &[0, 0, 0, 0, 0]);
}

#[test]
fn sensor_fault_is_visible_as_substituted_reading() {
    let sensor = ScriptedSensor::new(&[Err(SensorError::ThermocoupleFault(0b001))]);
    let mut dev = device(&short_cycle(), sensor);
    let mut now = 0;

    let s2 = exchange(&mut dev, &mut now, [2, 0, 0, 0, 0, 0, 0, 0]);
    // 300 saturates the integer byte.
    assert_eq!(&s2[5..7], &[255, 0]);
    assert!(!dev.scheduler().heater_on());
}

#[test]
fn highest_wire_setpoint_still_stops_heating_on_sensor_fault() {
    let mut dev = device(&short_cycle(), ScriptedSensor::new(&[Err(SensorError::Bus)]));
    let mut now = 0;

    let resp = exchange(&mut dev, &mut now, [10, 255, 255, 0, 0, 0, 0, 0]);
    assert_eq!(resp[0], 10);
    assert_eq!(dev.scheduler().controller().setpoint(), 256.0);

    for _ in 0..40 {
        dev.once(now);
        now += 1;
        assert!(!dev.scheduler().heater_on(), "heater on at tick {now}");
    }
    assert_eq!(dev.scheduler().power_fraction(), 0.0);
}

#[test]
fn client_drives_device_over_link() {
    let link = DeviceLink::new(device(&short_cycle(), ScriptedSensor::constant(60.0)));
    let mut client = Client::new(link);

    let status = client.status().unwrap();
    assert_eq!(status.heater_on_ticks + status.heater_off_ticks, 10);
    assert_eq!(status.dt, 1);
    assert!(status.heater_on);
    assert_eq!(status.temperature, 60.0);
    assert!((status.power - 0.45).abs() < 1.0 / 255.0);
    assert!(!status.pump_on);

    let change = client.set_setpoint(95.0).unwrap();
    assert_eq!(change.setpoint, 95.0);
    assert_eq!(change.previous, 70.0);

    client.start_pump(5).unwrap();
    let status = client.status().unwrap();
    assert!(status.pump_on);
    assert!(status.pump_remaining_ticks < 5);

    client.stop_pump().unwrap();
    let link = client.into_inner();
    assert_eq!(link.device.scheduler().pump_remaining_ticks(), 0);
    assert_eq!(link.device.scheduler().controller().setpoint(), 95.0);
}

#[test]
fn client_reports_missing_reply() {
    let cfg = ControllerConfig {
        full_cycle_ticks: 0,
        ..ControllerConfig::default()
    };
    // A disabled device never answers.
    let mut client = Client::new(DeviceLink::new(device(&cfg, ScriptedSensor::constant(20.0))));
    assert_eq!(client.stop_pump(), Err(CommsError::Transport));
}
