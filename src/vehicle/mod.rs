pub mod aircraft;
pub mod presets;

pub use aircraft::{Aircraft, AircraftBuilder};
