//! Sensor drivers.
//!
//! Each driver implements [`TemperatureSource`](crate::app::ports::TemperatureSource)
//! so the scheduler can consume it directly.

pub mod max31855;
