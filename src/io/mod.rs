pub mod csv;
pub mod json;
pub mod polar_csv;
pub mod thrust_csv;

pub use json::{Milestone, TakeoffSummary};
pub use polar_csv::{list_airfoils, load_polar, read_polar};
pub use thrust_csv::{load_thrust_table, read_thrust_table};
