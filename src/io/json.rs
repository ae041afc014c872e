use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::aero::PolarTable;
use crate::dynamics::TrajectorySample;
use crate::error::Result;
use crate::physics::Environment;
use crate::propulsion::ThrustModel;
use crate::sim::{Outcome, SimEvent, Trajectory};
use crate::vehicle::Aircraft;

/// Snapshot of the aircraft at a takeoff milestone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Milestone {
    pub time: f64,
    pub position: f64,
    pub velocity: f64,
    pub altitude: f64,
}

impl From<&SimEvent> for Milestone {
    fn from(event: &SimEvent) -> Self {
        Milestone::from(&event.sample)
    }
}

impl From<&TrajectorySample> for Milestone {
    fn from(s: &TrajectorySample) -> Self {
        Self {
            time: s.time,
            position: s.position,
            velocity: s.velocity,
            altitude: s.altitude,
        }
    }
}

/// Takeoff performance figures computed from one trajectory.
#[derive(Debug, Clone, Serialize)]
pub struct TakeoffSummary {
    pub aircraft: String,
    pub airfoil: String,
    pub thrust_model: String,
    pub wing_area: f64,
    pub weight: f64,
    pub outcome: Outcome,
    pub steps: usize,
    pub elapsed: f64,
    pub final_position: f64,
    pub rotation: Option<Milestone>,
    pub rotation_forced: bool,
    pub liftoff: Option<Milestone>,
    pub lifted_off_within_runway: bool,
    pub max_altitude: f64,
    pub max_speed: f64,
    pub max_alpha: f64,
    /// Stall speed from CLmax at the liftoff (or final) Reynolds number.
    pub stall_speed: Option<f64>,
    pub warnings: Vec<String>,
}

impl TakeoffSummary {
    pub fn from_trajectory(
        traj: &Trajectory,
        aircraft: &Aircraft,
        polar: &PolarTable,
        thrust: &dyn ThrustModel,
        env: &Environment,
    ) -> Self {
        let rotation_event = traj.rotation();
        let liftoff = traj.liftoff().map(Milestone::from);

        let max_altitude = traj.samples.iter().map(|s| s.altitude).fold(0.0_f64, f64::max);
        let max_speed = traj.samples.iter().map(|s| s.velocity).fold(0.0_f64, f64::max);
        let max_alpha = traj.samples.iter().map(|s| s.alpha_deg).fold(0.0_f64, f64::max);

        let reference_speed = liftoff
            .map(|m| m.velocity)
            .unwrap_or(traj.final_state.velocity);
        let reynolds = env.reynolds_number(reference_speed, aircraft.chord);
        let stall_speed = aircraft.stall_speed(env, polar.cl_max(reynolds)).ok();

        TakeoffSummary {
            aircraft: aircraft.name.clone(),
            airfoil: polar.name().to_string(),
            thrust_model: thrust.describe(),
            wing_area: aircraft.wing_area,
            weight: aircraft.weight(env),
            outcome: traj.outcome,
            steps: traj.samples.len(),
            elapsed: traj.final_state.time,
            final_position: traj.final_state.position,
            rotation: rotation_event.map(Milestone::from),
            rotation_forced: rotation_event.is_some_and(|e| {
                matches!(e.kind, crate::sim::EventKind::Rotation { forced: true })
            }),
            liftoff,
            lifted_off_within_runway: liftoff
                .is_some_and(|m| m.position <= aircraft.runway_length),
            max_altitude,
            max_speed,
            max_alpha,
            stall_speed,
            warnings: traj.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Write a takeoff summary as pretty-printed JSON.
pub fn write_summary<W: Write>(writer: W, summary: &TakeoffSummary) -> Result<()> {
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

/// Write takeoff summary JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, summary: &TakeoffSummary) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_summary(&mut out, summary)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
