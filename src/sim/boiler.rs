//! Two-node lumped thermal model of a small brass boiler.
//!
//! ```text
//!   heater P ──▶ [ water Tw, Cw ] ──Rf── [ metal Tm, Cm ] ──Re── ambient Te
//!                                              │
//!                                         thermocouple
//! ```
//!
//! ```text
//! dTw/dt = (Tm − Tw) / (Rf·Cw) + P / Cw
//! dTm/dt = (Tw − Tm) / (Rf·Cm) + (Te − Tm) / (Re·Cm)
//! ```
//!
//! Integrated with explicit Euler; keep `dt` well under `Rf·Cm` (≈30 s).

use std::cell::RefCell;
use std::f32::consts::PI;
use std::rc::Rc;

use crate::app::ports::TemperatureSource;
use crate::error::SensorError;

/// Physical constants of the boiler. SI units throughout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoilerParams {
    /// Heat capacity of the water charge (J/K).
    pub water_capacity: f32,
    /// Inner radius (m).
    pub radius: f32,
    /// Wall thickness (m).
    pub wall: f32,
    /// Height (m).
    pub height: f32,
    /// Brass density (kg/m³).
    pub density: f32,
    /// Brass specific heat (J/kg·K).
    pub specific_heat: f32,
    /// Water ↔ metal thermal resistance (K/W).
    pub r_water_metal: f32,
    /// Metal ↔ ambient thermal resistance (K/W).
    pub r_metal_ambient: f32,
    pub ambient_c: f32,
    pub heater_watts: f32,
}

impl Default for BoilerParams {
    fn default() -> Self {
        Self {
            water_capacity: 0.23 * 4176.8,
            radius: 0.0385,
            wall: 0.003,
            height: 0.095,
            density: 8520.0,
            specific_heat: 377.0,
            r_water_metal: 0.15,
            r_metal_ambient: 1.41,
            ambient_c: 21.0,
            heater_watts: 980.0,
        }
    }
}

impl BoilerParams {
    /// Heat capacity of the brass shell: side wall plus both end caps.
    pub fn metal_capacity(&self) -> f32 {
        let r = self.radius;
        let inner = r - self.wall / 2.0;
        let side = (PI * r * r - PI * inner * inner) * self.height;
        let caps = 2.0 * PI * r * r * self.wall;
        (side + caps) * self.density * self.specific_heat
    }
}

#[derive(Debug, Clone)]
pub struct BoilerModel {
    params: BoilerParams,
    metal_capacity: f32,
    water_c: f32,
    metal_c: f32,
}

impl BoilerModel {
    /// A boiler at ambient temperature.
    pub fn new(params: BoilerParams) -> Self {
        Self {
            metal_capacity: params.metal_capacity(),
            water_c: params.ambient_c,
            metal_c: params.ambient_c,
            params,
        }
    }

    /// Advance by `dt_s` seconds with the heater fully on or off.
    pub fn step(&mut self, dt_s: f32, heater_on: bool) {
        let p = &self.params;
        let power = if heater_on { p.heater_watts } else { 0.0 };
        let cw = p.water_capacity;
        let cm = self.metal_capacity;

        let d_water = (self.metal_c - self.water_c) / (p.r_water_metal * cw) + power / cw;
        let d_metal = (self.water_c - self.metal_c) / (p.r_water_metal * cm)
            + (p.ambient_c - self.metal_c) / (p.r_metal_ambient * cm);

        self.water_c += d_water * dt_s;
        self.metal_c += d_metal * dt_s;
    }

    pub fn water_c(&self) -> f32 {
        self.water_c
    }

    /// Boiler body temperature; what the thermocouple sees.
    pub fn metal_c(&self) -> f32 {
        self.metal_c
    }

    pub fn params(&self) -> &BoilerParams {
        &self.params
    }
}

impl Default for BoilerModel {
    fn default() -> Self {
        Self::new(BoilerParams::default())
    }
}

/// Shared handle to a model.
pub type SharedBoiler = Rc<RefCell<BoilerModel>>;

/// Thermocouple on the boiler body.
///
/// Shares the model with the test harness, which steps it; the scheduler
/// owns the sensor and reads through it.
pub struct SimSensor {
    boiler: SharedBoiler,
    fault: Option<SensorError>,
}

impl SimSensor {
    pub fn new(boiler: SharedBoiler) -> Self {
        Self { boiler, fault: None }
    }

    /// Make every subsequent read fail with `fault` (or succeed again with `None`).
    pub fn inject_fault(&mut self, fault: Option<SensorError>) {
        self.fault = fault;
    }
}

impl TemperatureSource for SimSensor {
    fn read(&mut self) -> Result<f32, SensorError> {
        match self.fault {
            Some(e) => Err(e),
            None => Ok(self.boiler.borrow().metal_c()),
        }
    }
}
