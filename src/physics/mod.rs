pub mod aerodynamics;
pub mod environment;

pub use environment::Environment;
