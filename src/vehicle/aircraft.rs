use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::physics::Environment;

// ---------------------------------------------------------------------------
// Aircraft definition (point mass with a single lifting surface)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    pub name: String,
    pub mass: f64,             // slug
    pub wing_area: f64,        // ft^2
    pub chord: f64,            // ft, Reynolds reference length
    pub runway_length: f64,    // ft
    #[serde(default = "default_rolling_friction")]
    pub rolling_friction: f64, // wheel friction coefficient
}

fn default_rolling_friction() -> f64 {
    0.02
}

impl Aircraft {
    /// W = m * g (lbf)
    pub fn weight(&self, env: &Environment) -> f64 {
        self.mass * env.gravity
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("mass", self.mass),
            ("wing area", self.wing_area),
            ("chord", self.chord),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SimError::DegenerateInput(format!(
                    "{} {name} must be positive, got {value}",
                    self.name
                )));
            }
        }
        if self.runway_length < 0.0 || self.rolling_friction < 0.0 {
            return Err(SimError::DegenerateInput(format!(
                "{}: runway length and rolling friction must be non-negative",
                self.name
            )));
        }
        Ok(())
    }

    /// Stall speed V_s = sqrt(2W / (rho * S * CLmax)), ft/s.
    pub fn stall_speed(&self, env: &Environment, cl_max: f64) -> Result<f64> {
        let denom = env.air_density * self.wing_area * cl_max;
        if !(denom > 0.0) {
            return Err(SimError::DegenerateInput(format!(
                "rho * S * CLmax = {denom} for {}",
                self.name
            )));
        }
        Ok((2.0 * self.weight(env) / denom).sqrt())
    }

    /// Conventional liftoff reference speed, 1.2 V_s.
    pub fn liftoff_speed(&self, env: &Environment, cl_max: f64) -> Result<f64> {
        Ok(1.2 * self.stall_speed(env, cl_max)?)
    }

    /// Same aircraft with a different wing area (parameter sweeps).
    pub fn with_wing_area(&self, wing_area: f64) -> Self {
        Self {
            wing_area,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Aircraft builder
// ---------------------------------------------------------------------------

pub struct AircraftBuilder {
    name: String,
    mass: f64,
    wing_area: f64,
    chord: f64,
    runway_length: f64,
    rolling_friction: f64,
}

impl AircraftBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mass: 10.0 / 32.2,
            wing_area: 5.0,
            chord: 1.0,
            runway_length: 100.0,
            rolling_friction: default_rolling_friction(),
        }
    }

    pub fn mass(mut self, v: f64) -> Self { self.mass = v; self }
    /// Set mass from a weight in lbf at standard gravity.
    pub fn weight_lbf(mut self, v: f64) -> Self { self.mass = v / crate::physics::environment::G0_FT_S2; self }
    pub fn wing_area(mut self, v: f64) -> Self { self.wing_area = v; self }
    pub fn chord(mut self, v: f64) -> Self { self.chord = v; self }
    pub fn runway_length(mut self, v: f64) -> Self { self.runway_length = v; self }
    pub fn rolling_friction(mut self, v: f64) -> Self { self.rolling_friction = v; self }

    pub fn build(self) -> Aircraft {
        Aircraft {
            name: self.name,
            mass: self.mass,
            wing_area: self.wing_area,
            chord: self.chord,
            runway_length: self.runway_length,
            rolling_friction: self.rolling_friction,
        }
    }
}
