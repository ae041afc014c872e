use serde::{Deserialize, Serialize};

use super::curve::FittedThrustCurve;
use super::ThrustModel;
use crate::aero::interp;
use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Static/dynamic thrust table keyed by (RPM, velocity)
// ---------------------------------------------------------------------------

const MPH_PER_FT_S: f64 = 3600.0 / 5280.0;

/// One propeller data point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrustSample {
    pub rpm: u32,
    pub velocity: f64,
    pub thrust: f64,
}

impl ThrustSample {
    pub fn new(rpm: u32, velocity: f64, thrust: f64) -> Self {
        Self { rpm, velocity, thrust }
    }
}

/// Unit of the velocity column of a thrust table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityUnit {
    #[default]
    FeetPerSecond,
    MilesPerHour,
}

impl VelocityUnit {
    /// Convert a speed in ft/s into this unit.
    pub fn from_ft_s(self, velocity_ft_s: f64) -> f64 {
        match self {
            VelocityUnit::FeetPerSecond => velocity_ft_s,
            VelocityUnit::MilesPerHour => velocity_ft_s * MPH_PER_FT_S,
        }
    }
}

#[derive(Debug, Clone)]
struct RpmBlock {
    velocity: Vec<f64>,
    thrust: Vec<f64>,
}

impl RpmBlock {
    fn thrust(&self, velocity: f64) -> f64 {
        interp::linear(&self.velocity, &self.thrust, velocity)
    }
}

/// Thrust surface over (RPM, velocity), grouped into per-RPM blocks.
///
/// Within one RPM block thrust is interpolated linearly over velocity and
/// extrapolated past the sampled speeds. Across RPM only interpolation
/// between two stored blocks is defined.
#[derive(Debug, Clone)]
pub struct ThrustTable {
    unit: VelocityUnit,
    rpms: Vec<u32>,
    blocks: Vec<RpmBlock>,
}

impl ThrustTable {
    pub fn new(mut samples: Vec<ThrustSample>, unit: VelocityUnit) -> Result<Self> {
        if samples.is_empty() {
            return Err(SimError::MissingData("thrust table has no samples".into()));
        }
        if let Some(bad) = samples
            .iter()
            .find(|s| !s.velocity.is_finite() || !s.thrust.is_finite() || s.rpm == 0)
        {
            return Err(SimError::ContradictoryData(format!(
                "invalid thrust sample {bad:?}"
            )));
        }

        samples.sort_by(|a, b| a.rpm.cmp(&b.rpm).then(a.velocity.total_cmp(&b.velocity)));

        let mut rpms: Vec<u32> = Vec::new();
        let mut blocks: Vec<RpmBlock> = Vec::new();
        for s in samples {
            if rpms.last() == Some(&s.rpm) {
                let Some(block) = blocks.last_mut() else {
                    continue;
                };
                if block.velocity.last() == Some(&s.velocity) {
                    return Err(SimError::ContradictoryData(format!(
                        "duplicate velocity {} at {} RPM",
                        s.velocity, s.rpm
                    )));
                }
                block.velocity.push(s.velocity);
                block.thrust.push(s.thrust);
            } else {
                rpms.push(s.rpm);
                blocks.push(RpmBlock {
                    velocity: vec![s.velocity],
                    thrust: vec![s.thrust],
                });
            }
        }

        Ok(Self { unit, rpms, blocks })
    }

    pub fn velocity_unit(&self) -> VelocityUnit {
        self.unit
    }

    /// Stored RPM values, ascending.
    pub fn rpms(&self) -> &[u32] {
        &self.rpms
    }

    /// Stored RPM closest to `rpm` (ties go to the lower one).
    pub fn nearest_rpm(&self, rpm: u32) -> Option<u32> {
        self.rpms
            .iter()
            .copied()
            .min_by_key(|r| r.abs_diff(rpm))
    }

    /// Number of samples in one RPM block.
    pub fn block_len(&self, rpm: u32) -> Option<usize> {
        let i = self.rpms.binary_search(&rpm).ok()?;
        Some(self.blocks[i].velocity.len())
    }

    fn locate(&self, rpm: u32) -> Result<RpmBracket> {
        match self.rpms.binary_search(&rpm) {
            Ok(i) => Ok(RpmBracket::Exact(i)),
            Err(i) if i == 0 || i == self.rpms.len() => Err(SimError::OutOfRange {
                axis: "rpm",
                value: rpm as f64,
                min: self.rpms[0] as f64,
                max: self.rpms[self.rpms.len() - 1] as f64,
            }),
            Err(i) => {
                let (lo, hi) = (self.rpms[i - 1] as f64, self.rpms[i] as f64);
                Ok(RpmBracket::Between {
                    lower: i - 1,
                    upper: i,
                    ratio: (rpm as f64 - lo) / (hi - lo),
                })
            }
        }
    }

    fn eval(&self, bracket: RpmBracket, velocity: f64) -> f64 {
        match bracket {
            RpmBracket::Exact(i) => self.blocks[i].thrust(velocity),
            RpmBracket::Between { lower, upper, ratio } => {
                let t_lo = self.blocks[lower].thrust(velocity);
                let t_hi = self.blocks[upper].thrust(velocity);
                t_lo + ratio * (t_hi - t_lo)
            }
        }
    }

    /// Thrust at an RPM and a velocity expressed in the table's unit.
    ///
    /// RPM below the lowest or above the highest stored block is
    /// `OutOfRange`; there is no extrapolation across RPM.
    pub fn thrust_at(&self, rpm: u32, velocity: f64) -> Result<f64> {
        let bracket = self.locate(rpm)?;
        Ok(self.eval(bracket, velocity))
    }

    /// Least-squares quadratic over one stored RPM block, in table units.
    pub fn fit_curve(&self, rpm: u32) -> Result<FittedThrustCurve> {
        let i = self
            .rpms
            .binary_search(&rpm)
            .map_err(|_| SimError::MissingData(format!("no thrust samples at {rpm} RPM")))?;
        let block = &self.blocks[i];
        FittedThrustCurve::fit(&block.velocity, &block.thrust)
    }

    /// Pin the table to one RPM for use as a `ThrustModel`.
    pub fn at_rpm(&self, rpm: u32) -> Result<RpmThrust<'_>> {
        let bracket = self.locate(rpm)?;
        Ok(RpmThrust {
            table: self,
            rpm,
            bracket,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum RpmBracket {
    Exact(usize),
    Between { lower: usize, upper: usize, ratio: f64 },
}

/// A `ThrustTable` evaluated at a fixed, pre-validated RPM.
///
/// Accepts forward speed in ft/s and converts to the table's unit.
#[derive(Debug, Clone, Copy)]
pub struct RpmThrust<'a> {
    table: &'a ThrustTable,
    rpm: u32,
    bracket: RpmBracket,
}

impl RpmThrust<'_> {
    pub fn rpm(&self) -> u32 {
        self.rpm
    }
}

impl ThrustModel for RpmThrust<'_> {
    fn thrust(&self, velocity_ft_s: f64) -> f64 {
        let v = self.table.unit.from_ft_s(velocity_ft_s);
        self.table.eval(self.bracket, v)
    }

    fn describe(&self) -> String {
        format!("thrust table @ {} RPM", self.rpm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bracketing_table() -> ThrustTable {
        let mut samples = Vec::new();
        for v in [0.0, 10.0, 20.0, 30.0] {
            samples.push(ThrustSample::new(2000, v, 5.0));
            samples.push(ThrustSample::new(4000, v, 9.0));
        }
        ThrustTable::new(samples, VelocityUnit::FeetPerSecond).unwrap()
    }

    #[test]
    fn exact_rpm_reduces_to_1d() {
        let table = ThrustTable::new(
            vec![ThrustSample::new(3000, 0.0, 10.0), ThrustSample::new(3000, 20.0, 5.0)],
            VelocityUnit::FeetPerSecond,
        )
        .unwrap();
        assert!((table.thrust_at(3000, 10.0).unwrap() - 7.5).abs() < 1e-12);
        // Extrapolated along the same segment
        assert!((table.thrust_at(3000, 40.0).unwrap() - 0.0).abs() < 1e-12);
    }

    #[test]
    fn rpm_midpoint_blend() {
        let table = bracketing_table();
        for v in [0.0, 7.0, 25.0, 60.0] {
            assert!((table.thrust_at(3000, v).unwrap() - 7.0).abs() < 1e-12);
        }
        assert!((table.thrust_at(2500, 5.0).unwrap() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn rpm_outside_table_is_out_of_range() {
        let table = bracketing_table();
        assert!(matches!(
            table.thrust_at(1500, 0.0),
            Err(SimError::OutOfRange { axis: "rpm", .. })
        ));
        assert!(matches!(
            table.thrust_at(4001, 0.0),
            Err(SimError::OutOfRange { .. })
        ));
        assert!(table.at_rpm(5000).is_err());
    }

    #[test]
    fn ragged_blocks_are_accepted() {
        let table = ThrustTable::new(
            vec![
                ThrustSample::new(1000, 0.0, 2.0),
                ThrustSample::new(2000, 0.0, 4.0),
                ThrustSample::new(2000, 10.0, 3.0),
                ThrustSample::new(2000, 20.0, 1.5),
            ],
            VelocityUnit::FeetPerSecond,
        )
        .unwrap();
        assert_eq!(table.rpms(), &[1000, 2000]);
        assert_eq!(table.block_len(1000), Some(1));
        assert_eq!(table.block_len(2000), Some(3));
        // Single-sample block acts as constant thrust
        assert!((table.thrust_at(1000, 15.0).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn duplicate_velocity_is_rejected() {
        let err = ThrustTable::new(
            vec![ThrustSample::new(2000, 5.0, 4.0), ThrustSample::new(2000, 5.0, 3.0)],
            VelocityUnit::FeetPerSecond,
        )
        .unwrap_err();
        assert!(matches!(err, SimError::ContradictoryData(_)));
    }

    #[test]
    fn fit_curve_missing_rpm() {
        let table = bracketing_table();
        assert!(matches!(table.fit_curve(3000), Err(SimError::MissingData(_))));
        let curve = table.fit_curve(4000).unwrap();
        assert!((curve.eval(12.0) - 9.0).abs() < 1e-8);
    }

    #[test]
    fn pinned_rpm_converts_units() {
        let table = ThrustTable::new(
            vec![
                ThrustSample::new(3000, 0.0, 10.0),
                ThrustSample::new(3000, 30.0, 4.0),
            ],
            VelocityUnit::MilesPerHour,
        )
        .unwrap();
        let model = table.at_rpm(3000).unwrap();
        // 44 ft/s == 30 mph
        assert!((model.thrust(44.0) - 4.0).abs() < 1e-9);
        assert_eq!(model.rpm(), 3000);
    }

    #[test]
    fn nearest_rpm_picks_closest_block() {
        let table = bracketing_table();
        assert_eq!(table.nearest_rpm(2900), Some(2000));
        assert_eq!(table.nearest_rpm(3100), Some(4000));
    }
}
