//! Boiler controller firmware library.
//!
//! Exposes the control core (PID, duty-cycle scheduler, command protocol)
//! for host-side integration testing and simulation. All ESP-IDF-specific
//! code is guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod rpc;
pub mod scheduler;
pub mod tick;

pub mod adapters;
pub mod drivers;
pub mod pins;
pub mod sensors;

#[cfg(not(target_os = "espidf"))]
pub mod sim;
