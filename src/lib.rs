pub mod aero;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod physics;
pub mod propulsion;
pub mod sim;
pub mod vehicle;

pub use aero::{PolarRow, PolarTable};
pub use config::{load_scenario, ConfigError, LoadedScenario, Scenario};
pub use dynamics::{FlightState, Phase, TrajectorySample};
pub use error::{Result, SimError};
pub use physics::Environment;
pub use propulsion::{FittedThrustCurve, ThrustModel, ThrustTable, VelocityUnit};
pub use sim::{simulate, Outcome, SimConfig, Simulation, Trajectory};
pub use vehicle::Aircraft;
