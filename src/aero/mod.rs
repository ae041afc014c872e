pub mod interp;
pub mod polar;

pub use polar::{AeroCoefficients, PolarRow, PolarTable};
