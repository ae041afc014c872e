use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Environmental constants (US customary: ft, slug, lbf, s)
// ---------------------------------------------------------------------------

/// Standard gravity, ft/s^2.
pub const G0_FT_S2: f64 = 32.174;
/// Sea-level air density, slug/ft^3.
pub const RHO_SEA_LEVEL: f64 = 0.002_376_9;
/// Sea-level kinematic viscosity of air, ft^2/s.
pub const NU_SEA_LEVEL: f64 = 1.5723e-4;

/// Reynolds number substituted when the aircraft is (nearly) at rest.
pub const REYNOLDS_FLOOR: f64 = 1_000.0;
/// Speeds at or below this are treated as zero for Reynolds purposes, ft/s.
pub const STILL_AIR_SPEED: f64 = 1e-6;

/// Constant environment for one integration run.
///
/// Density does not vary with altitude; the climb-out covered here stays
/// within a few hundred feet of the runway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub gravity: f64,
    pub air_density: f64,
    pub kinematic_viscosity: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            gravity: G0_FT_S2,
            air_density: RHO_SEA_LEVEL,
            kinematic_viscosity: NU_SEA_LEVEL,
        }
    }
}

impl Environment {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("gravity", self.gravity),
            ("air density", self.air_density),
            ("kinematic viscosity", self.kinematic_viscosity),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SimError::DegenerateInput(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Chord Reynolds number, floored at `REYNOLDS_FLOOR`.
    pub fn reynolds_number(&self, velocity: f64, chord: f64) -> f64 {
        let speed = velocity.abs();
        if speed <= STILL_AIR_SPEED {
            return REYNOLDS_FLOOR;
        }
        (speed * chord / self.kinematic_viscosity).max(REYNOLDS_FLOOR)
    }

    /// q = 1/2 rho v^2
    pub fn dynamic_pressure(&self, velocity: f64) -> f64 {
        0.5 * self.air_density * velocity * velocity
    }
}
