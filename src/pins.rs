//! GPIO / peripheral pin assignments for the boiler controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Actuators (solid-state relays, active HIGH)
// ---------------------------------------------------------------------------

/// Boiler heating element SSR.
pub const HEATER_GPIO: i32 = 4;
/// Pump SSR.
pub const PUMP_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// MAX31855 thermocouple converter (SPI2, read-only)
// ---------------------------------------------------------------------------

pub const TC_SCLK_GPIO: i32 = 12;
pub const TC_MISO_GPIO: i32 = 13;
pub const TC_CS_GPIO: i32 = 10;
/// The MAX31855 tops out at 5 MHz.
pub const TC_SPI_BAUD_HZ: u32 = 4_000_000;

// ---------------------------------------------------------------------------
// Host command link
// ---------------------------------------------------------------------------

/// UART peripheral carrying the 8-byte command frames.
pub const CMD_UART_PORT: i32 = 1;
pub const CMD_UART_TX_GPIO: i32 = 17;
pub const CMD_UART_RX_GPIO: i32 = 18;
/// Driver ring-buffer sizes (bytes). The RX side must hold several frames.
pub const CMD_UART_RX_BUF: i32 = 256;
pub const CMD_UART_TX_BUF: i32 = 256;
