//! Application core — the control loop and its port traits.
//!
//! All interaction with hardware happens through the **port traits** in
//! [`ports`]; [`service::ControlLoop`] wires the scheduler to them and to
//! the command transport, so the whole loop runs on the host in tests.

pub mod ports;
pub mod service;
