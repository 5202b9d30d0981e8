//! One-shot hardware peripheral initialization.
//!
//! Configures the actuator GPIOs and the command UART using raw ESP-IDF
//! sys calls. Called once from `main()` before the tick timer is armed.
//! The SPI bus for the thermocouple is owned by esp-idf-hal and built in
//! `main()`.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    UartInitFailed(i32),
    TimerFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::UartInitFailed(rc) => write!(f, "UART init failed (rc={})", rc),
            Self::TimerFailed(rc) => write!(f, "esp_timer setup failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub fn init_peripherals(baud_rate: u32) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the tick timer; single-threaded.
    unsafe {
        init_gpio_outputs()?;
        init_uart(baud_rate)?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(_baud_rate: u32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    for &pin in &[pins::HEATER_GPIO, pins::PUMP_GPIO] {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        // Relays start de-energised.
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: heater=GPIO{} pump=GPIO{}", pins::HEATER_GPIO, pins::PUMP_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── UART ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_uart(baud_rate: u32) -> Result<(), HwInitError> {
    let cfg = uart_config_t {
        baud_rate: baud_rate as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };

    let ret = unsafe { uart_param_config(pins::CMD_UART_PORT, &cfg) };
    if ret != ESP_OK {
        return Err(HwInitError::UartInitFailed(ret));
    }

    let ret = unsafe {
        uart_set_pin(
            pins::CMD_UART_PORT,
            pins::CMD_UART_TX_GPIO,
            pins::CMD_UART_RX_GPIO,
            UART_PIN_NO_CHANGE,
            UART_PIN_NO_CHANGE,
        )
    };
    if ret != ESP_OK {
        return Err(HwInitError::UartInitFailed(ret));
    }

    let ret = unsafe {
        uart_driver_install(
            pins::CMD_UART_PORT,
            pins::CMD_UART_RX_BUF,
            pins::CMD_UART_TX_BUF,
            0,
            core::ptr::null_mut(),
            0,
        )
    };
    if ret != ESP_OK {
        return Err(HwInitError::UartInitFailed(ret));
    }

    info!("hw_init: UART{} @ {} baud", pins::CMD_UART_PORT, baud_rate);
    Ok(())
}
