use std::time::Duration;

use rayon::prelude::*;

use crate::aero::PolarTable;
use crate::dynamics::FlightState;
use crate::error::SimError;
use crate::io::json::TakeoffSummary;
use crate::physics::Environment;
use crate::propulsion::ThrustModel;
use crate::vehicle::Aircraft;

use super::cancel::{Cancellation, Deadline, Never};
use super::config::SimConfig;
use super::runner::{Outcome, Simulation};

// ---------------------------------------------------------------------------
// Wing-area sweep
// ---------------------------------------------------------------------------

/// Result for one configuration in a sweep.
#[derive(Debug)]
pub enum SweepStatus {
    Completed(Box<TakeoffSummary>),
    /// Rejected before integrating: the stall speed is undefined, or even
    /// at CLmax the required liftoff speed is out of reach.
    Infeasible(String),
    Failed(SimError),
}

impl SweepStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SweepStatus::Completed(s) if s.outcome == Outcome::Cancelled => "cancelled",
            SweepStatus::Completed(_) => "completed",
            SweepStatus::Infeasible(_) => "infeasible",
            SweepStatus::Failed(_) => "failed",
        }
    }
}

#[derive(Debug)]
pub struct SweepEntry {
    pub wing_area: f64,
    pub status: SweepStatus,
}

/// Per-entry limits for a sweep.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOptions {
    /// Skip wings whose 1.2 V_s exceeds this speed (ft/s).
    pub max_liftoff_speed: Option<f64>,
    /// Wall-clock budget for each configuration. A run that overruns it
    /// ends with `Outcome::Cancelled`; the other entries carry on.
    pub timeout: Option<Duration>,
}

/// Evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        n => (0..n)
            .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Run one takeoff per wing area in parallel over shared, read-only tables.
///
/// Each wing is first checked against the stall speed at the highest
/// tabulated CLmax. It is skipped when that is undefined, or when 1.2 V_s
/// exceeds `options.max_liftoff_speed`.
/// Output order matches `wing_areas`.
pub fn sweep_wing_area(
    base: &Aircraft,
    wing_areas: &[f64],
    polar: &PolarTable,
    thrust: &dyn ThrustModel,
    env: &Environment,
    config: SimConfig,
    options: SweepOptions,
) -> Vec<SweepEntry> {
    let cl_max = polar
        .reynolds_numbers()
        .last()
        .map(|&re| polar.cl_max(re))
        .unwrap_or(f64::NAN);

    wing_areas
        .par_iter()
        .map(|&wing_area| {
            let aircraft = base.with_wing_area(wing_area);
            let status = run_one(&aircraft, polar, thrust, env, config, cl_max, options);
            SweepEntry { wing_area, status }
        })
        .collect()
}

fn run_one(
    aircraft: &Aircraft,
    polar: &PolarTable,
    thrust: &dyn ThrustModel,
    env: &Environment,
    config: SimConfig,
    cl_max: f64,
    options: SweepOptions,
) -> SweepStatus {
    let liftoff_speed = match aircraft.liftoff_speed(env, cl_max) {
        Ok(v) => v,
        Err(e) => return SweepStatus::Infeasible(format!("stall speed undefined: {e}")),
    };
    if let Some(limit) = options.max_liftoff_speed {
        if liftoff_speed > limit {
            return SweepStatus::Infeasible(format!(
                "liftoff speed {liftoff_speed:.1} ft/s exceeds {limit:.1} ft/s"
            ));
        }
    }

    let sim = match Simulation::new(aircraft, polar, thrust, env, config) {
        Ok(sim) => sim,
        Err(e) => return SweepStatus::Failed(e),
    };
    // Deadline starts when this entry starts integrating
    let deadline = options.timeout.map(Deadline::after);
    let cancel: &dyn Cancellation = match &deadline {
        Some(d) => d,
        None => &Never,
    };
    let traj = sim.run_with(FlightState::at_rest(), cancel, Vec::new());
    SweepStatus::Completed(Box::new(TakeoffSummary::from_trajectory(
        &traj, aircraft, polar, thrust, env,
    )))
}
