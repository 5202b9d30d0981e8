//! Unified error types for the boiler controller firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the driver loop's error handling uniform. All variants are `Copy` so
//! they can be passed around the tick path without allocation.
//!
//! The control core itself has no fatal errors: sensor faults are
//! substituted, unknown opcodes are echoed. These types describe what the
//! boundaries (sensor drivers, transports, config) can report.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The temperature sensor could not produce a reading.
    Sensor(SensorError),
    /// The serial command channel failed.
    Comms(CommsError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// SPI transfer to the converter failed.
    Bus,
    /// The thermocouple converter flagged a fault.
    /// Carries the raw fault bits (open circuit, short to GND, short to VCC).
    ThermocoupleFault(u8),
    /// The reading was not a finite number.
    NotANumber,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "SPI transfer failed"),
            Self::ThermocoupleFault(bits) => write!(f, "thermocouple fault (0b{bits:03b})"),
            Self::NotANumber => write!(f, "reading is not a number"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The underlying byte transport reported an error.
    Transport,
    /// Fewer than 8 bytes were available for a response.
    ShortFrame,
    /// The response did not echo the request opcode.
    OpcodeMismatch { sent: u8, got: u8 },
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport error"),
            Self::ShortFrame => write!(f, "short frame"),
            Self::OpcodeMismatch { sent, got } => {
                write!(f, "opcode mismatch (sent {sent}, got {got})")
            }
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
