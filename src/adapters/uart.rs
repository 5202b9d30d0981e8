//! UART command transport (ESP-IDF driver).
//!
//! Implements [`Transport`] over the UART configured by
//! [`hw_init`](crate::drivers::hw_init). Reads never block: the control
//! loop only asks for a frame once the driver reports one is buffered.

use esp_idf_svc::sys::*;

use crate::rpc::transport::Transport;

/// Error code returned by the ESP-IDF UART driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartError(pub i32);

pub struct UartTransport {
    port: uart_port_t,
}

impl UartTransport {
    /// Wrap a port whose driver is already installed.
    pub fn new(port: uart_port_t) -> Self {
        Self { port }
    }
}

impl Transport for UartTransport {
    type Error = UartError;

    fn available(&mut self) -> Result<usize, UartError> {
        let mut len: usize = 0;
        // SAFETY: the driver for `port` was installed by hw_init; `len` is
        // a valid out-pointer for the duration of the call.
        let ret = unsafe { uart_get_buffered_data_len(self.port, &mut len) };
        if ret != ESP_OK {
            return Err(UartError(ret));
        }
        Ok(len)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), UartError> {
        // SAFETY: `buf` is valid for `buf.len()` bytes; zero wait ticks.
        let n = unsafe {
            uart_read_bytes(self.port, buf.as_mut_ptr().cast(), buf.len() as u32, 0)
        };
        if n < 0 || n as usize != buf.len() {
            return Err(UartError(n));
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), UartError> {
        // SAFETY: `data` is valid for `data.len()` bytes; the driver copies
        // it into its TX ring buffer.
        let n = unsafe { uart_write_bytes(self.port, data.as_ptr().cast(), data.len()) };
        if n < 0 || n as usize != data.len() {
            return Err(UartError(n));
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), UartError> {
        // Bytes are already queued to the driver; waiting for the wire
        // would stall the tick.
        Ok(())
    }
}
