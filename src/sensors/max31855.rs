//! MAX31855 thermocouple-to-digital converter.
//!
//! The chip shifts out one 32-bit big-endian word per read:
//!
//! ```text
//!  31            18 17  16  15           4  3   2   1   0
//! ┌────────────────┬───┬───┬──────────────┬───┬───┬───┬───┐
//! │ TC temp (14b)  │ - │ F │ CJ temp (12b)│ - │SCV│SCG│OC │
//! │ 0.25 °C / LSB  │   │   │ 0.0625 °C/LSB│   │   │   │   │
//! └────────────────┴───┴───┴──────────────┴───┴───┴───┴───┘
//! ```
//!
//! Both temperature fields are two's complement. Bit-level SPI timing is
//! left to the HAL; this driver only issues a 4-byte read and decodes it.

use embedded_hal::spi::SpiDevice;

use crate::app::ports::TemperatureSource;
use crate::error::SensorError;

/// Open circuit, short to GND, short to VCC.
pub const FAULT_MASK: u32 = 0x7;

const TC_LSB_C: f32 = 0.25;
const CJ_LSB_C: f32 = 0.0625;

/// Thermocouple temperature in Celsius, or the fault bits if any are set.
pub fn decode(raw: u32) -> Result<f32, SensorError> {
    let fault = raw & FAULT_MASK;
    if fault != 0 {
        return Err(SensorError::ThermocoupleFault(fault as u8));
    }
    // Arithmetic shift sign-extends the 14-bit field.
    Ok(((raw as i32) >> 18) as f32 * TC_LSB_C)
}

/// Cold-junction (internal) temperature in Celsius.
pub fn decode_internal(raw: u32) -> f32 {
    let field = ((raw >> 4) & 0xFFF) as u16;
    let signed = ((field << 4) as i16) >> 4;
    signed as f32 * CJ_LSB_C
}

pub struct Max31855<SPI> {
    spi: SPI,
    last_raw: u32,
}

impl<SPI: SpiDevice> Max31855<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi, last_raw: 0 }
    }

    /// Clock out one raw word.
    pub fn read_raw(&mut self) -> Result<u32, SensorError> {
        let mut buf = [0u8; 4];
        self.spi.read(&mut buf).map_err(|_| SensorError::Bus)?;
        self.last_raw = u32::from_be_bytes(buf);
        Ok(self.last_raw)
    }

    /// Cold-junction temperature from the most recent read.
    pub fn last_internal_celsius(&self) -> f32 {
        decode_internal(self.last_raw)
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiDevice> TemperatureSource for Max31855<SPI> {
    fn read(&mut self) -> Result<f32, SensorError> {
        decode(self.read_raw()?)
    }
}
