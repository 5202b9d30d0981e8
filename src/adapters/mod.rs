//! Adapters — concrete implementations of the boundary traits.
//!
//! | Adapter | Implements  | Connects to              |
//! |---------|-------------|--------------------------|
//! | `time`  | —           | ESP32 system timer       |
//! | `uart`  | Transport   | ESP-IDF UART driver      |

pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart;
