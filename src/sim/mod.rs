pub mod cancel;
pub mod config;
pub mod event;
pub mod integrator;
pub mod runner;
pub mod sweep;

pub use cancel::{Cancellation, Deadline, Never};
pub use config::SimConfig;
pub use event::{AltitudeDetector, EventDetector, EventKind, SimEvent};
pub use integrator::euler_step;
pub use runner::{simulate, Outcome, SimWarning, Simulation, Trajectory};
pub use sweep::{linspace, sweep_wing_area, SweepEntry, SweepOptions, SweepStatus};
