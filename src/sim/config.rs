use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,                // integration timestep, s
    pub simulation_length: f64, // stop once this far down range, ft
    pub max_time: f64,          // safety ceiling, s
    pub alpha_rate: f64,        // pitch-up per step once climbing, deg
    pub alpha_ceiling: f64,     // deg
    pub runway_rotation: bool,  // force rotation near the runway end
    pub rotation_fraction: f64, // fraction of runway length that forces rotation
    pub resolve_thrust: bool,   // tilt the thrust line with alpha
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.001,                // 1 kHz
            simulation_length: 300.0,
            max_time: 60.0,
            alpha_rate: 0.1,
            alpha_ceiling: 5.0,
            runway_rotation: true,
            rotation_fraction: 0.9,
            resolve_thrust: true,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(SimError::DegenerateInput(format!(
                "time step must be positive, got {}",
                self.dt
            )));
        }
        if !(self.max_time > 0.0 && self.max_time.is_finite()) {
            return Err(SimError::DegenerateInput(format!(
                "time ceiling must be positive and finite, got {}",
                self.max_time
            )));
        }
        if self.alpha_rate < 0.0 {
            return Err(SimError::DegenerateInput(format!(
                "alpha rate must be non-negative, got {}",
                self.alpha_rate
            )));
        }
        if self.rotation_fraction < 0.0 {
            return Err(SimError::DegenerateInput(format!(
                "rotation fraction must be non-negative, got {}",
                self.rotation_fraction
            )));
        }
        Ok(())
    }

    /// Upper bound on the number of steps before the time ceiling trips.
    pub fn max_steps(&self) -> usize {
        // `as` saturates; a huge ratio pins at usize::MAX
        ((self.max_time / self.dt).ceil() as usize).saturating_add(1)
    }
}
