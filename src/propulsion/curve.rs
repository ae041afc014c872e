use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use super::table::VelocityUnit;
use super::ThrustModel;
use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Quadratic thrust-vs-velocity curve
// ---------------------------------------------------------------------------

/// Closed-form thrust curve: T(v) = a*v^2 + b*v + c.
///
/// Velocity is in whatever unit the curve was fitted against; the integrator
/// feeds it forward speed in ft/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedThrustCurve {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl FittedThrustCurve {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    pub fn eval(&self, velocity: f64) -> f64 {
        (self.a * velocity + self.b) * velocity + self.c
    }

    /// Re-express a curve fitted in `unit` so it accepts ft/s.
    pub fn in_ft_s(self, unit: VelocityUnit) -> Self {
        let k = unit.from_ft_s(1.0);
        Self {
            a: self.a * k * k,
            b: self.b * k,
            c: self.c,
        }
    }

    /// Least-squares quadratic fit through (velocity, thrust) pairs.
    ///
    /// Needs at least three distinct velocities; anything less leaves the
    /// quadratic underdetermined.
    pub fn fit(velocity: &[f64], thrust: &[f64]) -> Result<Self> {
        if velocity.len() != thrust.len() {
            return Err(SimError::DegenerateInput(format!(
                "{} velocities vs {} thrust samples",
                velocity.len(),
                thrust.len()
            )));
        }
        let n = velocity.len();
        if n < 3 {
            return Err(SimError::DegenerateInput(format!(
                "quadratic fit needs at least 3 samples, got {n}"
            )));
        }

        // Vandermonde system [v^2 v 1] * [a b c]^T = T
        let design = DMatrix::from_fn(n, 3, |i, j| velocity[i].powi(2 - j as i32));
        let rhs = DVector::from_column_slice(thrust);

        let svd = design.svd(true, true);
        if svd.rank(1e-9) < 3 {
            return Err(SimError::DegenerateInput(
                "quadratic fit needs at least 3 distinct velocities".into(),
            ));
        }
        let coeffs = svd
            .solve(&rhs, 1e-12)
            .map_err(|e| SimError::DegenerateInput(e.to_string()))?;

        Ok(Self {
            a: coeffs[0],
            b: coeffs[1],
            c: coeffs[2],
        })
    }
}

impl ThrustModel for FittedThrustCurve {
    fn thrust(&self, velocity: f64) -> f64 {
        self.eval(velocity)
    }

    fn describe(&self) -> String {
        format!("T = {:.5e} v^2 + {:.5e} v + {:.4}", self.a, self.b, self.c)
    }
}
