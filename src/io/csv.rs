use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::dynamics::TrajectorySample;
use crate::error::Result;
use crate::sim::{SweepEntry, SweepStatus};

/// Write trajectory samples to CSV.
///
/// Columns: time, position, velocity, altitude, vertical_velocity,
///          alpha_deg, lift, drag, thrust, phase
pub fn write_trajectory<W: Write>(writer: W, samples: &[TrajectorySample]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for s in samples {
        wtr.serialize(s)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: impl AsRef<Path>, samples: &[TrajectorySample]) -> Result<()> {
    write_trajectory(File::create(path)?, samples)
}

#[derive(Serialize)]
struct SweepRow<'a> {
    wing_area: f64,
    status: &'a str,
    rotation_position: Option<f64>,
    liftoff_position: Option<f64>,
    liftoff_velocity: Option<f64>,
    lifted_off_within_runway: Option<bool>,
    stall_speed: Option<f64>,
    detail: String,
}

impl<'a> From<&'a SweepEntry> for SweepRow<'a> {
    fn from(entry: &'a SweepEntry) -> Self {
        let mut row = SweepRow {
            wing_area: entry.wing_area,
            status: entry.status.label(),
            rotation_position: None,
            liftoff_position: None,
            liftoff_velocity: None,
            lifted_off_within_runway: None,
            stall_speed: None,
            detail: String::new(),
        };
        match &entry.status {
            SweepStatus::Completed(summary) => {
                row.rotation_position = summary.rotation.map(|m| m.position);
                row.liftoff_position = summary.liftoff.map(|m| m.position);
                row.liftoff_velocity = summary.liftoff.map(|m| m.velocity);
                row.lifted_off_within_runway = Some(summary.lifted_off_within_runway);
                row.stall_speed = summary.stall_speed;
                row.detail = summary.warnings.join("; ");
            }
            SweepStatus::Infeasible(reason) => row.detail = reason.clone(),
            SweepStatus::Failed(err) => row.detail = err.to_string(),
        }
        row
    }
}

/// One row per swept wing area.
pub fn write_sweep<W: Write>(writer: W, entries: &[SweepEntry]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in entries {
        wtr.serialize(SweepRow::from(entry))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_sweep_file(path: impl AsRef<Path>, entries: &[SweepEntry]) -> Result<()> {
    write_sweep(File::create(path)?, entries)
}
