//! Host-side simulation of the controlled plant.
//!
//! Lets the full control loop run closed-loop in tests without hardware.

pub mod boiler;
