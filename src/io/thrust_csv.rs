use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SimError};
use crate::propulsion::{ThrustSample, ThrustTable, VelocityUnit};

/// One row of a combined propeller performance CSV. Torque, advance ratio
/// and blade Reynolds columns are ignored.
#[derive(Debug, Deserialize)]
struct ThrustRecord {
    #[serde(rename = "Diameter", alias = "diameter", default)]
    diameter: String,
    #[serde(rename = "Pitch", alias = "pitch", default)]
    pitch: String,
    #[serde(rename = "RPM", alias = "rpm")]
    rpm: u32,
    #[serde(rename = "Velocity (mph)", alias = "velocity", alias = "Velocity (ft/s)")]
    velocity: f64,
    #[serde(rename = "Thrust (lbf)", alias = "thrust")]
    thrust: f64,
}

fn digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Parse a propeller designation such as `27x13E` into (diameter, pitch).
fn parse_propeller(designation: &str) -> Result<(String, String)> {
    let lower = designation.to_lowercase();
    let Some((d, p)) = lower.split_once('x') else {
        return Err(SimError::MissingData(format!(
            "propeller '{designation}' is not of the form DIAxPITCH"
        )));
    };
    Ok((digits(d), digits(p)))
}

/// Load thrust samples from CSV, optionally keeping only one propeller.
pub fn read_thrust_table<R: Read>(
    reader: R,
    unit: VelocityUnit,
    propeller: Option<&str>,
) -> Result<ThrustTable> {
    let filter = propeller.map(parse_propeller).transpose()?;
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut samples = Vec::new();
    for record in rdr.deserialize() {
        let rec: ThrustRecord = record?;
        if let Some((d, p)) = &filter {
            if digits(&rec.diameter) != *d || digits(&rec.pitch) != *p {
                continue;
            }
        }
        samples.push(ThrustSample::new(rec.rpm, rec.velocity, rec.thrust));
    }

    if samples.is_empty() {
        return Err(SimError::MissingData(match propeller {
            Some(p) => format!("no thrust samples for propeller '{p}'"),
            None => "thrust CSV has no samples".into(),
        }));
    }
    ThrustTable::new(samples, unit)
}

pub fn load_thrust_table(
    path: impl AsRef<Path>,
    unit: VelocityUnit,
    propeller: Option<&str>,
) -> Result<ThrustTable> {
    read_thrust_table(File::open(path)?, unit, propeller)
}
