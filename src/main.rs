//! Boiler controller firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  Max31855 (SPI)    UartTransport    Outputs (GPIO)   Uptime  │
//! │                                                              │
//! │  ─────────────────── Port Trait Boundary ─────────────────   │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            ControlLoop (pure logic)                    │  │
//! │  │  DutyCycleScheduler · PID · command dispatcher         │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  esp_timer ──signal──▶ tick count ──take──▶ main loop        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::spi::config::{Config as SpiConfig, DriverConfig as SpiDriverConfig};
use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriver};
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use boilerctl::adapters::time::Uptime;
use boilerctl::adapters::uart::UartTransport;
use boilerctl::app::ports::ActuatorPort;
use boilerctl::app::service::ControlLoop;
use boilerctl::config::ControllerConfig;
use boilerctl::drivers::outputs::Outputs;
use boilerctl::drivers::{hw_init, hw_timer};
use boilerctl::pins;
use boilerctl::scheduler::DutyCycleScheduler;
use boilerctl::sensors::max31855::Max31855;
use boilerctl::tick;

/// Upper bound on one wait for the tick notification.
const TICK_WAIT_MS: u32 = 100;

/// Build-time JSON override, e.g. `BOILERCTL_CONFIG='{"setpoint_c":95}'`.
fn load_config() -> ControllerConfig {
    let Some(json) = option_env!("BOILERCTL_CONFIG") else {
        info!("Config: built-in defaults");
        return ControllerConfig::default();
    };
    match ControllerConfig::from_json(json) {
        Ok(cfg) => {
            info!("Config: build-time override applied");
            cfg
        }
        Err(e) => {
            warn!("Config override rejected ({}), using defaults", e);
            ControllerConfig::default()
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  boilerctl v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = load_config();
    info!(
        "Config: setpoint={:.1}C kp={} ki={} kd={} cycle={} ticks @ {} ms",
        config.setpoint_c,
        config.kp,
        config.ki,
        config.kd,
        config.full_cycle_ticks,
        config.tick_period_ms
    );

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals(config.baud_rate)?;
    let mut outputs = Outputs::new();
    outputs.all_off();

    // Typed pins mirror pins::TC_SCLK_GPIO, TC_MISO_GPIO and TC_CS_GPIO.
    let peripherals = Peripherals::take()?;
    let spi = SpiDriver::new_without_sdo(
        peripherals.spi2,
        peripherals.pins.gpio12,
        peripherals.pins.gpio13,
        &SpiDriverConfig::new(),
    )?;
    let thermocouple = SpiDeviceDriver::new(
        spi,
        Some(peripherals.pins.gpio10),
        &SpiConfig::new().baudrate(Hertz(pins::TC_SPI_BAUD_HZ)),
    )?;

    // ── 3. Control loop ───────────────────────────────────────
    let scheduler = DutyCycleScheduler::from_config(&config, Max31855::new(thermocouple));
    let mut control = ControlLoop::new(scheduler, UartTransport::new(pins::CMD_UART_PORT));
    let uptime = Uptime::new();

    FreeRtos::delay_ms(config.startup_delay_ms);

    tick::reset();
    hw_timer::start_tick_timer(config.tick_period_ms)?;
    info!("Control loop running ({} ms after boot)", uptime.uptime_ms());

    // ── 4. Tick loop ──────────────────────────────────────────
    loop {
        // Blocking here lets the idle task feed the task watchdog.
        hw_timer::wait_for_tick(TICK_WAIT_MS);
        while tick::take() {
            control.once(uptime.ticks(config.tick_period_ms));
            control.apply_outputs(&mut outputs);
        }
    }
}
