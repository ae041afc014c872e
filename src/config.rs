use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aero::PolarTable;
use crate::error::SimError;
use crate::io::{load_polar, load_thrust_table};
use crate::physics::Environment;
use crate::propulsion::{FittedThrustCurve, ThrustModel, ThrustTable, VelocityUnit};
use crate::sim::SimConfig;
use crate::vehicle::Aircraft;

// ---------------------------------------------------------------------------
// Scenario files
// ---------------------------------------------------------------------------

/// Errors that can occur while loading a scenario file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid scenario: {0}")]
    Invalid(String),
    #[error(transparent)]
    Data(#[from] SimError),
}

/// Where the airfoil polar comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirfoilSource {
    pub polar_csv: PathBuf,
    /// Case-insensitive substring of the airfoil name.
    pub name: String,
}

fn default_table_unit() -> VelocityUnit {
    VelocityUnit::MilesPerHour
}

/// Where thrust comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThrustSource {
    /// Closed-form quadratic T = a v^2 + b v + c.
    Curve {
        a: f64,
        b: f64,
        c: f64,
        #[serde(default)]
        velocity_unit: VelocityUnit,
    },
    /// Propeller table evaluated at a fixed RPM.
    Table {
        csv: PathBuf,
        rpm: u32,
        #[serde(default = "default_table_unit")]
        velocity_unit: VelocityUnit,
        /// e.g. "27x13E"; all rows are used when absent.
        #[serde(default)]
        propeller: Option<String>,
        /// Replace the table with a quadratic fitted at the nearest
        /// stored RPM.
        #[serde(default)]
        fit: bool,
    },
}

/// A complete takeoff scenario as written in TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub aircraft: Aircraft,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub simulation: SimConfig,
    pub airfoil: AirfoilSource,
    pub thrust: ThrustSource,
}

impl Scenario {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check parameters without touching any data files.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.aircraft.validate()?;
        self.environment.validate()?;
        self.simulation.validate()?;
        if self.airfoil.name.trim().is_empty() {
            return Err(ConfigError::Invalid("airfoil name is empty".into()));
        }
        Ok(())
    }

    /// Load the polar and thrust data, resolving relative paths against
    /// `base_dir`.
    pub fn load_data(&self, base_dir: &Path) -> Result<(PolarTable, Propulsion), ConfigError> {
        let polar = load_polar(base_dir.join(&self.airfoil.polar_csv), &self.airfoil.name)?;
        let propulsion = Propulsion::from_source(&self.thrust, base_dir)?;
        Ok((polar, propulsion))
    }
}

/// Thrust data owned by a loaded scenario.
#[derive(Debug, Clone)]
pub enum Propulsion {
    /// Curve already expressed in ft/s.
    Curve(FittedThrustCurve),
    Table { table: ThrustTable, rpm: u32 },
}

impl Propulsion {
    pub fn from_source(source: &ThrustSource, base_dir: &Path) -> Result<Self, ConfigError> {
        match source {
            ThrustSource::Curve { a, b, c, velocity_unit } => Ok(Propulsion::Curve(
                FittedThrustCurve::new(*a, *b, *c).in_ft_s(*velocity_unit),
            )),
            ThrustSource::Table {
                csv,
                rpm,
                velocity_unit,
                propeller,
                fit,
            } => {
                let table =
                    load_thrust_table(base_dir.join(csv), *velocity_unit, propeller.as_deref())?;
                if *fit {
                    let nearest = table.nearest_rpm(*rpm).ok_or_else(|| {
                        ConfigError::Invalid("thrust table has no RPM blocks".into())
                    })?;
                    let curve = table.fit_curve(nearest)?.in_ft_s(*velocity_unit);
                    return Ok(Propulsion::Curve(curve));
                }
                // Validate the RPM once, up front
                table.at_rpm(*rpm)?;
                Ok(Propulsion::Table { table, rpm: *rpm })
            }
        }
    }

    /// Thrust model borrowing this data.
    pub fn model(&self) -> Result<Box<dyn ThrustModel + '_>, SimError> {
        match self {
            Propulsion::Curve(curve) => Ok(Box::new(*curve)),
            Propulsion::Table { table, rpm } => Ok(Box::new(table.at_rpm(*rpm)?)),
        }
    }
}

/// A scenario with its data files loaded.
#[derive(Debug, Clone)]
pub struct LoadedScenario {
    pub scenario: Scenario,
    pub polar: PolarTable,
    pub propulsion: Propulsion,
}

/// Parse, validate and load a scenario file and the data it points to.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<LoadedScenario, ConfigError> {
    let path = path.as_ref();
    let scenario = Scenario::from_file(path)?;
    scenario.validate()?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let (polar, propulsion) = scenario.load_data(base_dir)?;
    Ok(LoadedScenario {
        scenario,
        polar,
        propulsion,
    })
}
