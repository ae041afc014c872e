use std::fmt;

use serde::Serialize;

use crate::aero::PolarTable;
use crate::dynamics::{FlightState, ForceModel, Forces, Phase, TrajectorySample};
use crate::error::Result;
use crate::physics::Environment;
use crate::propulsion::ThrustModel;
use crate::vehicle::Aircraft;

use super::cancel::{Cancellation, Never};
use super::config::SimConfig;
use super::event::{EventDetector, EventKind, LiftoffDetector, RunwayEndDetector, SimEvent};
use super::integrator::euler_step;

// ---------------------------------------------------------------------------
// Run results
// ---------------------------------------------------------------------------

/// How the integration loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Position reached the configured simulation length.
    ReachedDistance,
    /// Elapsed time passed the safety ceiling first.
    TimeCeiling,
    /// The caller's cancellation signal fired.
    Cancelled,
}

/// Non-fatal conditions; the trajectory collected so far is still valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimWarning {
    /// Did not reach the target distance within the time budget.
    Divergence {
        elapsed: f64,
        position: f64,
        target: f64,
    },
}

impl fmt::Display for SimWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimWarning::Divergence { elapsed, position, target } => write!(
                f,
                "did not reach target distance within time budget: {position:.1} of {target:.1} ft after {elapsed:.2} s"
            ),
        }
    }
}

/// Output artifact of one run.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub samples: Vec<TrajectorySample>,
    pub events: Vec<SimEvent>,
    pub outcome: Outcome,
    pub warnings: Vec<SimWarning>,
    pub final_state: FlightState,
}

impl Trajectory {
    /// First event of a kind matching `pred`.
    pub fn find_event(&self, pred: impl Fn(&EventKind) -> bool) -> Option<&SimEvent> {
        self.events.iter().find(|e| pred(&e.kind))
    }

    pub fn rotation(&self) -> Option<&SimEvent> {
        self.find_event(|k| matches!(k, EventKind::Rotation { .. }))
    }

    pub fn liftoff(&self) -> Option<&SimEvent> {
        self.find_event(|k| matches!(k, EventKind::Liftoff))
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// A validated, ready-to-run configuration. Holds only shared references;
/// any number of runs can execute concurrently over the same tables.
pub struct Simulation<'a> {
    model: ForceModel<'a>,
    config: SimConfig,
}

impl<'a> Simulation<'a> {
    pub fn new(
        aircraft: &'a Aircraft,
        polar: &'a PolarTable,
        thrust: &'a dyn ThrustModel,
        env: &'a Environment,
        config: SimConfig,
    ) -> Result<Self> {
        aircraft.validate()?;
        env.validate()?;
        config.validate()?;
        Ok(Self {
            model: ForceModel {
                aircraft,
                polar,
                thrust,
                env,
                resolve_thrust: config.resolve_thrust,
            },
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run from rest at the runway threshold.
    pub fn run(&self) -> Trajectory {
        self.run_from(FlightState::at_rest())
    }

    /// Run from a caller-supplied initial state.
    pub fn run_from(&self, initial: FlightState) -> Trajectory {
        self.run_with(initial, &Never, Vec::new())
    }

    /// Run with a cancellation signal and extra event detectors.
    pub fn run_with(
        &self,
        initial: FlightState,
        cancel: &dyn Cancellation,
        extra_detectors: Vec<Box<dyn EventDetector>>,
    ) -> Trajectory {
        let config = &self.config;
        let mut detectors: Vec<Box<dyn EventDetector>> = vec![
            Box::new(LiftoffDetector::default()),
            Box::new(RunwayEndDetector {
                runway_length: self.model.aircraft.runway_length,
            }),
        ];
        detectors.extend(extra_detectors);

        let mut state = initial;
        let mut samples = Vec::with_capacity(config.max_steps().min(200_000));
        let mut events = Vec::new();
        let mut warnings = Vec::new();
        let mut prev = TrajectorySample::new(&state, &Forces::default());

        let outcome = loop {
            if state.position >= config.simulation_length {
                break Outcome::ReachedDistance;
            }
            if cancel.is_cancelled() {
                break Outcome::Cancelled;
            }

            let step = euler_step(&state, &self.model, config);
            state = step.state;
            let sample = TrajectorySample::new(&state, &step.forces);

            if let Some(cause) = step.rotation {
                events.push(SimEvent {
                    time: sample.time,
                    kind: cause.into(),
                    sample,
                });
            }
            for det in detectors.iter_mut() {
                if let Some(kind) = det.check(&prev, &sample) {
                    events.push(SimEvent {
                        time: sample.time,
                        kind,
                        sample,
                    });
                }
            }
            samples.push(sample);
            prev = sample;

            if state.position >= config.simulation_length {
                break Outcome::ReachedDistance;
            }
            if state.time > config.max_time {
                warnings.push(SimWarning::Divergence {
                    elapsed: state.time,
                    position: state.position,
                    target: config.simulation_length,
                });
                break Outcome::TimeCeiling;
            }
        };

        state.phase = Phase::Terminated;

        Trajectory {
            samples,
            events,
            outcome,
            warnings,
            final_state: state,
        }
    }
}

/// Validate the inputs and run from rest (convenience wrapper).
pub fn simulate(
    aircraft: &Aircraft,
    polar: &PolarTable,
    thrust: &dyn ThrustModel,
    env: &Environment,
    config: SimConfig,
) -> Result<Trajectory> {
    Ok(Simulation::new(aircraft, polar, thrust, env, config)?.run())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use super::*;
    use crate::aero::PolarRow;
    use crate::error::SimError;
    use crate::propulsion::FittedThrustCurve;
    use crate::sim::event::AltitudeDetector;
    use crate::vehicle::{presets, AircraftBuilder};

    fn polar() -> PolarTable {
        let mut rows = Vec::new();
        for re in [50_000.0, 100_000.0, 200_000.0, 500_000.0] {
            let boost = re / 5_000_000.0;
            for a in -4..=12 {
                let alpha = a as f64;
                rows.push(PolarRow::new(
                    re,
                    alpha,
                    0.3 + boost + 0.1 * alpha,
                    0.02 + 0.001 * alpha * alpha,
                ));
            }
        }
        PolarTable::new("synthetic", rows).unwrap()
    }

    fn plane_curve() -> FittedThrustCurve {
        FittedThrustCurve::new(-3.47418e-3, -7.88148e-2, 13.27)
    }

    #[test]
    fn reaches_distance_and_climbs() {
        let aircraft = presets::plane_2025();
        let polar = polar();
        let thrust = plane_curve();
        let env = Environment::default();
        let traj = simulate(&aircraft, &polar, &thrust, &env, SimConfig::default()).unwrap();

        assert_eq!(traj.outcome, Outcome::ReachedDistance);
        assert!(traj.warnings.is_empty());
        assert!(traj.rotation().is_some());
        assert!(traj.liftoff().is_some());
        assert_eq!(traj.final_state.phase, Phase::Terminated);
        assert!(traj.samples.last().unwrap().position >= 300.0);
    }

    #[test]
    fn never_negative_altitude() {
        let aircraft = presets::plane_2025();
        let polar = polar();
        let thrust = plane_curve();
        let env = Environment::default();
        let traj = simulate(&aircraft, &polar, &thrust, &env, SimConfig::default()).unwrap();
        assert!(traj.samples.iter().all(|s| s.altitude >= 0.0));
    }

    #[test]
    fn climb_is_sticky_and_alpha_monotonic() {
        let aircraft = presets::plane_2025();
        let polar = polar();
        let thrust = plane_curve();
        let env = Environment::default();
        let config = SimConfig::default();
        let traj = simulate(&aircraft, &polar, &thrust, &env, config).unwrap();

        let first_climb = traj
            .samples
            .iter()
            .position(|s| s.phase == Phase::Climb)
            .unwrap();
        let climb = &traj.samples[first_climb..];
        assert!(climb.iter().all(|s| s.phase == Phase::Climb));
        for w in climb.windows(2) {
            assert!(w[1].alpha_deg >= w[0].alpha_deg);
            assert!(w[1].alpha_deg <= config.alpha_ceiling);
            if w[0].alpha_deg == config.alpha_ceiling {
                assert_eq!(w[1].alpha_deg, config.alpha_ceiling);
            }
        }
    }

    #[test]
    fn time_ceiling_returns_partial_trajectory() {
        // Thrust below rolling friction never reaches the target distance
        let aircraft = presets::plane_2025();
        let polar = polar();
        let thrust = FittedThrustCurve::new(0.0, -1.0, 0.5);
        let env = Environment::default();
        let config = SimConfig { max_time: 2.0, ..Default::default() };
        let traj = simulate(&aircraft, &polar, &thrust, &env, config).unwrap();

        assert_eq!(traj.outcome, Outcome::TimeCeiling);
        assert_eq!(traj.warnings.len(), 1);
        assert!(!traj.samples.is_empty());
        assert!(traj.final_state.time > 2.0);
    }

    #[test]
    fn huge_time_ceiling_still_runs() {
        let aircraft = presets::plane_2025();
        let polar = polar();
        let thrust = plane_curve();
        let env = Environment::default();
        let config = SimConfig { max_time: 1e300, ..Default::default() };
        let traj = simulate(&aircraft, &polar, &thrust, &env, config).unwrap();
        assert_eq!(traj.outcome, Outcome::ReachedDistance);

        let config = SimConfig { max_time: f64::INFINITY, ..Default::default() };
        let err = simulate(&aircraft, &polar, &thrust, &env, config).unwrap_err();
        assert!(matches!(err, SimError::DegenerateInput(_)));
    }

    #[test]
    fn cancelled_before_first_step() {
        let aircraft = presets::plane_2025();
        let polar = polar();
        let thrust = plane_curve();
        let env = Environment::default();
        let sim = Simulation::new(&aircraft, &polar, &thrust, &env, SimConfig::default()).unwrap();
        let flag = AtomicBool::new(true);
        let traj = sim.run_with(FlightState::at_rest(), &flag, Vec::new());
        assert_eq!(traj.outcome, Outcome::Cancelled);
        assert!(traj.samples.is_empty());
    }

    #[test]
    fn starts_from_supplied_state() {
        let aircraft = presets::plane_2025();
        let polar = polar();
        let thrust = plane_curve();
        let env = Environment::default();
        let sim = Simulation::new(&aircraft, &polar, &thrust, &env, SimConfig::default()).unwrap();
        let initial = FlightState { position: 250.0, velocity: 40.0, ..Default::default() };
        let traj = sim.run_from(initial);
        assert!(traj.samples[0].position > 250.0);
        assert!(traj.samples.len() < 5_000);
    }

    #[test]
    fn extra_detector_fires() {
        let aircraft = presets::plane_2025();
        let polar = polar();
        let thrust = plane_curve();
        let env = Environment::default();
        let config = SimConfig { simulation_length: 2_000.0, ..Default::default() };
        let sim = Simulation::new(&aircraft, &polar, &thrust, &env, config).unwrap();
        let traj = sim.run_with(
            FlightState::at_rest(),
            &Never,
            vec![Box::new(AltitudeDetector::new(10.0, true))],
        );
        assert!(traj
            .find_event(|k| matches!(k, EventKind::Custom(_)))
            .is_some());
    }

    #[test]
    fn rejects_massless_aircraft() {
        let aircraft = AircraftBuilder::new("ghost").mass(0.0).build();
        let polar = polar();
        let thrust = plane_curve();
        let env = Environment::default();
        let err = simulate(&aircraft, &polar, &thrust, &env, SimConfig::default()).unwrap_err();
        assert!(matches!(err, SimError::DegenerateInput(_)));
    }
}
