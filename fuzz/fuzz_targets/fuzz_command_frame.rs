//! Fuzz target: control loop fed arbitrary serial bytes
//!
//! Pushes an arbitrary byte stream through the loopback transport into a
//! running control loop and asserts that every consumed 8-byte request is
//! answered with exactly one 8-byte response echoing its opcode, and that
//! the scheduler's phase invariant survives whatever the host sent.
//!
//! cargo fuzz run fuzz_command_frame

#![no_main]

use boilerctl::app::ports::TemperatureSource;
use boilerctl::app::service::ControlLoop;
use boilerctl::config::ControllerConfig;
use boilerctl::error::SensorError;
use boilerctl::rpc::codec::{FRAME_LEN, Frame};
use boilerctl::rpc::transport::LoopbackTransport;
use boilerctl::scheduler::DutyCycleScheduler;
use libfuzzer_sys::fuzz_target;

struct Constant(f32);

impl TemperatureSource for Constant {
    fn read(&mut self) -> Result<f32, SensorError> {
        Ok(self.0)
    }
}

fuzz_target!(|data: &[u8]| {
    let config = ControllerConfig {
        full_cycle_ticks: 20,
        off_guard_ticks: 3,
        ..ControllerConfig::default()
    };
    let mut control = ControlLoop::new(
        DutyCycleScheduler::from_config(&config, Constant(65.0)),
        LoopbackTransport::new(),
    );

    let mut now = 0u32;
    for chunk in data.chunks(FRAME_LEN) {
        let Ok(request) = Frame::try_from(chunk) else {
            // Trailing partial frame: it must never be consumed.
            let _ = control.transport_mut().feed(chunk);
            control.once(now);
            control.once(now + 1);
            assert_eq!(control.transport_mut().pending_output(), 0);
            return;
        };

        control.transport_mut().feed(request.as_bytes()).unwrap();
        // Tick until the request has been served (warm-up takes one).
        let served = control.frames_served();
        while control.frames_served() == served {
            control.once(now);
            now = now.wrapping_add(1);
        }

        let mut resp = [0u8; FRAME_LEN];
        assert_eq!(control.transport_mut().drain(&mut resp), FRAME_LEN);
        assert_eq!(resp[0], request.opcode());
        assert_eq!(control.transport_mut().pending_output(), 0);

        let sched = control.scheduler();
        assert!((0.0..=1.0).contains(&sched.power_fraction()));
        assert!(sched.heater_on_ticks() <= 20);
        assert!(sched.heater_off_ticks() <= 20);
    }
});
