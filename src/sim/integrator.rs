use crate::dynamics::{FlightState, ForceModel, Forces, Phase};

use super::config::SimConfig;

// ---------------------------------------------------------------------------
// Explicit Euler step with ground contact and phase logic
// ---------------------------------------------------------------------------

/// Why the ground roll ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationCause {
    /// Lift reached weight.
    LiftExceedsWeight,
    /// The aircraft passed the forced-rotation mark near the runway end.
    RunwayMark,
}

/// Result of advancing one step.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub state: FlightState,
    pub forces: Forces,
    pub rotation: Option<RotationCause>,
}

/// Advance `state` by `config.dt`.
///
/// Forces are evaluated once at the start of the step (explicit Euler);
/// velocities are updated first and positions use the new velocities.
pub fn euler_step(state: &FlightState, model: &ForceModel<'_>, config: &SimConfig) -> Step {
    let forces = model.evaluate(state);
    let mass = model.aircraft.mass;
    let dt = config.dt;

    let mut next = *state;
    next.velocity += forces.net_horizontal() / mass * dt;
    next.position += next.velocity * dt;
    next.vertical_velocity += forces.net_vertical() / mass * dt;
    next.altitude += next.vertical_velocity * dt;

    // Inelastic ground contact
    if next.altitude < 0.0 {
        next.altitude = 0.0;
        if next.vertical_velocity < 0.0 {
            next.vertical_velocity = 0.0;
        }
    }

    let mut rotation = None;
    if next.phase == Phase::GroundRoll {
        let mark = config.rotation_fraction * model.aircraft.runway_length;
        if forces.lift >= forces.weight {
            rotation = Some(RotationCause::LiftExceedsWeight);
        } else if config.runway_rotation && next.position >= mark {
            rotation = Some(RotationCause::RunwayMark);
        }
        if rotation.is_some() {
            next.phase = Phase::Climb;
        }
    }

    // Scheduled pitch-up once climbing
    if next.phase == Phase::Climb && next.alpha_deg < config.alpha_ceiling {
        next.alpha_deg = (next.alpha_deg + config.alpha_rate).min(config.alpha_ceiling);
    }

    next.time += dt;

    Step {
        state: next,
        forces,
        rotation,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aero::{PolarRow, PolarTable};
    use crate::physics::Environment;
    use crate::propulsion::FittedThrustCurve;
    use crate::vehicle::{presets, Aircraft};

    fn polar() -> PolarTable {
        let mut rows = Vec::new();
        for re in [50_000.0, 200_000.0, 500_000.0] {
            for a in -4..=12 {
                let alpha = a as f64;
                rows.push(PolarRow::new(re, alpha, 0.3 + 0.1 * alpha, 0.02 + 0.0005 * alpha * alpha));
            }
        }
        PolarTable::new("test", rows).unwrap()
    }

    fn model<'a>(
        aircraft: &'a Aircraft,
        polar: &'a PolarTable,
        thrust: &'a FittedThrustCurve,
        env: &'a Environment,
    ) -> ForceModel<'a> {
        ForceModel {
            aircraft,
            polar,
            thrust,
            env,
            resolve_thrust: true,
        }
    }

    #[test]
    fn ground_contact_clamps_altitude() {
        let aircraft = presets::plane_2025();
        let polar = polar();
        let thrust = FittedThrustCurve::new(0.0, 0.0, 5.0);
        let env = Environment::default();
        let m = model(&aircraft, &polar, &thrust, &env);
        let config = SimConfig::default();

        // Sinking just above the runway with far too little lift
        let state = FlightState {
            velocity: 10.0,
            altitude: 0.001,
            vertical_velocity: -5.0,
            phase: Phase::Climb,
            ..Default::default()
        };
        let step = euler_step(&state, &m, &config);
        assert_eq!(step.state.altitude, 0.0);
        assert_eq!(step.state.vertical_velocity, 0.0);
    }

    #[test]
    fn stays_on_ground_below_liftoff_speed() {
        let aircraft = presets::plane_2025();
        let polar = polar();
        let thrust = FittedThrustCurve::new(0.0, 0.0, 10.0);
        let env = Environment::default();
        let m = model(&aircraft, &polar, &thrust, &env);
        let config = SimConfig::default();

        let step = euler_step(&FlightState::at_rest(), &m, &config);
        assert_eq!(step.state.altitude, 0.0);
        assert_eq!(step.state.phase, Phase::GroundRoll);
        assert!(step.state.velocity > 0.0);
        assert!(step.state.position > 0.0);
        assert!((step.state.time - config.dt).abs() < 1e-15);
        assert!(step.rotation.is_none());
    }

    #[test]
    fn rotates_when_lift_reaches_weight() {
        let aircraft = presets::plane_2025();
        let polar = polar();
        let thrust = FittedThrustCurve::new(0.0, 0.0, 10.0);
        let env = Environment::default();
        let m = model(&aircraft, &polar, &thrust, &env);
        let config = SimConfig { runway_rotation: false, ..Default::default() };

        let state = FlightState { velocity: 80.0, ..Default::default() };
        let step = euler_step(&state, &m, &config);
        assert_eq!(step.rotation, Some(RotationCause::LiftExceedsWeight));
        assert_eq!(step.state.phase, Phase::Climb);
        assert!((step.state.alpha_deg - config.alpha_rate).abs() < 1e-12);
    }

    #[test]
    fn runway_mark_forces_rotation() {
        let aircraft = presets::plane_2025();
        let polar = polar();
        let thrust = FittedThrustCurve::new(0.0, 0.0, 10.0);
        let env = Environment::default();
        let m = model(&aircraft, &polar, &thrust, &env);
        let config = SimConfig::default();

        let state = FlightState {
            position: 0.9 * aircraft.runway_length,
            velocity: 20.0,
            ..Default::default()
        };
        let step = euler_step(&state, &m, &config);
        assert_eq!(step.rotation, Some(RotationCause::RunwayMark));

        let off = SimConfig { runway_rotation: false, ..config };
        assert!(euler_step(&state, &m, &off).rotation.is_none());
    }

    #[test]
    fn alpha_is_capped_at_ceiling() {
        let aircraft = presets::plane_2025();
        let polar = polar();
        let thrust = FittedThrustCurve::new(0.0, 0.0, 10.0);
        let env = Environment::default();
        let m = model(&aircraft, &polar, &thrust, &env);
        let config = SimConfig::default();

        let state = FlightState {
            velocity: 40.0,
            alpha_deg: config.alpha_ceiling - 0.05,
            phase: Phase::Climb,
            ..Default::default()
        };
        let step = euler_step(&state, &m, &config);
        assert_eq!(step.state.alpha_deg, config.alpha_ceiling);
        let again = euler_step(&step.state, &m, &config);
        assert_eq!(again.state.alpha_deg, config.alpha_ceiling);
    }
}
