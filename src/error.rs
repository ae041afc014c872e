use thiserror::Error;

/// Errors raised while building lookup tables or evaluating a configuration.
///
/// Numerical edge cases inside a single integration step (zero airspeed,
/// ground penetration) are handled with floors and clamps and never show up
/// here.
#[derive(Debug, Error)]
pub enum SimError {
    /// Requested airfoil, RPM or table is not present in the source data.
    #[error("missing data: {0}")]
    MissingData(String),

    /// Query falls outside the range bracketed by real samples.
    #[error("{axis} {value} outside tabulated range [{min}, {max}]")]
    OutOfRange {
        axis: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Zero or negative denominator in a physical formula.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Duplicate keys or non-finite values in a table.
    #[error("contradictory data: {0}")]
    ContradictoryData(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
