pub mod state;

pub use state::{FlightState, Forces, Phase, TrajectorySample};

use crate::aero::PolarTable;
use crate::physics::aerodynamics;
use crate::physics::Environment;
use crate::propulsion::ThrustModel;
use crate::vehicle::Aircraft;

// ---------------------------------------------------------------------------
// Force model (2D longitudinal point mass)
// ---------------------------------------------------------------------------

/// Read-only inputs shared by every step of a run.
#[derive(Clone, Copy)]
pub struct ForceModel<'a> {
    pub aircraft: &'a Aircraft,
    pub polar: &'a PolarTable,
    pub thrust: &'a dyn ThrustModel,
    pub env: &'a Environment,
    pub resolve_thrust: bool,
}

impl ForceModel<'_> {
    /// Forces acting on the aircraft in `state`.
    ///
    /// Modeled:
    ///   1. Lift / drag: q * (CL, CD) * S, coefficients looked up at the
    ///      chord Reynolds number and current alpha
    ///   2. Thrust:     from the thrust model at forward speed, optionally
    ///      pitched up by alpha
    ///   3. Weight:     m * g, constant
    ///   4. Rolling:    mu * (W - L) while in ground roll
    pub fn evaluate(&self, state: &FlightState) -> Forces {
        let reynolds = self.env.reynolds_number(state.velocity, self.aircraft.chord);
        let coeffs = self.polar.coefficients(reynolds, state.alpha_deg);

        // Dynamic pressure from forward speed only
        let q = self.env.dynamic_pressure(state.velocity);
        let lift = aerodynamics::lift(q, &coeffs, self.aircraft.wing_area);
        let drag = aerodynamics::drag(q, &coeffs, self.aircraft.wing_area);

        let thrust = self.thrust.thrust(state.velocity);
        let (thrust_x, thrust_z) =
            aerodynamics::thrust_components(thrust, state.alpha_deg, self.resolve_thrust);

        let weight = self.aircraft.weight(self.env);
        let rolling = if state.phase == Phase::GroundRoll {
            aerodynamics::rolling_resistance(self.aircraft.rolling_friction, weight, lift)
        } else {
            0.0
        };

        Forces {
            reynolds,
            cl: coeffs.cl,
            cd: coeffs.cd,
            lift,
            drag,
            thrust,
            thrust_x,
            thrust_z,
            rolling,
            weight,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
