use serde::{Deserialize, Serialize};

use super::interp;
use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Tabulated airfoil polars
// ---------------------------------------------------------------------------

/// One tabulated polar point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarRow {
    pub reynolds: f64,
    pub alpha_deg: f64,
    pub cl: f64,
    pub cd: f64,
}

impl PolarRow {
    pub fn new(reynolds: f64, alpha_deg: f64, cl: f64, cd: f64) -> Self {
        Self { reynolds, alpha_deg, cl, cd }
    }
}

/// Lift and drag coefficients at one (Reynolds, alpha) point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AeroCoefficients {
    pub cl: f64,
    pub cd: f64,
}

/// All rows sharing one Reynolds number, ordered by alpha.
#[derive(Debug, Clone)]
struct ReynoldsBucket {
    reynolds: f64,
    alpha: Vec<f64>,
    cl: Vec<f64>,
    cd: Vec<f64>,
}

impl ReynoldsBucket {
    fn coefficients(&self, alpha_deg: f64) -> AeroCoefficients {
        AeroCoefficients {
            cl: interp::linear(&self.alpha, &self.cl, alpha_deg),
            cd: interp::linear(&self.alpha, &self.cd, alpha_deg),
        }
    }

    fn cl_max(&self) -> f64 {
        self.cl.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Sparse (Reynolds, alpha) -> (CL, CD) dataset for a single airfoil.
///
/// Queries interpolate linearly over alpha inside the two Reynolds buckets
/// bracketing the query and then blend the two results by Reynolds position.
/// Alpha outside the tabulated range is extrapolated from the end segment
/// slopes without any stall cap, so extreme-alpha values are unreliable.
/// Reynolds outside the stored range clamps to the nearest bucket.
#[derive(Debug, Clone)]
pub struct PolarTable {
    name: String,
    reynolds: Vec<f64>,
    buckets: Vec<ReynoldsBucket>,
    rows: usize,
}

impl PolarTable {
    /// Build the table, rejecting empty input, non-finite values,
    /// non-positive Reynolds numbers and duplicate alpha within a bucket.
    pub fn new(name: impl Into<String>, mut rows: Vec<PolarRow>) -> Result<Self> {
        let name = name.into();
        if rows.is_empty() {
            return Err(SimError::MissingData(format!(
                "polar table '{name}' has no rows"
            )));
        }

        for row in &rows {
            let finite = [row.reynolds, row.alpha_deg, row.cl, row.cd]
                .iter()
                .all(|v| v.is_finite());
            if !finite {
                return Err(SimError::ContradictoryData(format!(
                    "non-finite polar row {row:?} in '{name}'"
                )));
            }
            if row.reynolds <= 0.0 {
                return Err(SimError::ContradictoryData(format!(
                    "non-positive Reynolds number {} in '{name}'",
                    row.reynolds
                )));
            }
        }

        rows.sort_by(|a, b| {
            a.reynolds
                .total_cmp(&b.reynolds)
                .then(a.alpha_deg.total_cmp(&b.alpha_deg))
        });

        let count = rows.len();
        let mut buckets: Vec<ReynoldsBucket> = Vec::new();
        for row in rows {
            match buckets.last_mut() {
                Some(bucket) if bucket.reynolds == row.reynolds => {
                    if bucket.alpha.last() == Some(&row.alpha_deg) {
                        return Err(SimError::ContradictoryData(format!(
                            "duplicate alpha {} at Re {} in '{name}'",
                            row.alpha_deg, row.reynolds
                        )));
                    }
                    bucket.alpha.push(row.alpha_deg);
                    bucket.cl.push(row.cl);
                    bucket.cd.push(row.cd);
                }
                _ => buckets.push(ReynoldsBucket {
                    reynolds: row.reynolds,
                    alpha: vec![row.alpha_deg],
                    cl: vec![row.cl],
                    cd: vec![row.cd],
                }),
            }
        }

        Ok(Self {
            name,
            reynolds: buckets.iter().map(|b| b.reynolds).collect(),
            buckets,
            rows: count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored Reynolds numbers, ascending.
    pub fn reynolds_numbers(&self) -> &[f64] {
        &self.reynolds
    }

    /// Total number of tabulated rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Smallest and largest tabulated alpha across all buckets (deg).
    pub fn alpha_range(&self) -> (f64, f64) {
        self.buckets.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), b| {
                let first = b.alpha.first().copied().unwrap_or(lo);
                let last = b.alpha.last().copied().unwrap_or(hi);
                (lo.min(first), hi.max(last))
            },
        )
    }

    /// CL and CD at a Reynolds number and angle of attack (deg).
    ///
    /// Callers floor the Reynolds number before querying at rest; the
    /// lookup itself just clamps to the lowest bucket.
    pub fn coefficients(&self, reynolds: f64, alpha_deg: f64) -> AeroCoefficients {
        let Some((lo, hi)) = interp::bracket(&self.reynolds, reynolds) else {
            return AeroCoefficients::default();
        };

        let lower = self.buckets[lo].coefficients(alpha_deg);
        if lo == hi {
            return lower;
        }
        let upper = self.buckets[hi].coefficients(alpha_deg);

        let (re_lo, re_hi) = (self.reynolds[lo], self.reynolds[hi]);
        AeroCoefficients {
            cl: interp::blend(reynolds, re_lo, re_hi, lower.cl, upper.cl),
            cd: interp::blend(reynolds, re_lo, re_hi, lower.cd, upper.cd),
        }
    }

    /// Largest tabulated CL, blended across the bracketing Reynolds buckets.
    pub fn cl_max(&self, reynolds: f64) -> f64 {
        let Some((lo, hi)) = interp::bracket(&self.reynolds, reynolds) else {
            return f64::NAN;
        };
        interp::blend(
            reynolds,
            self.reynolds[lo],
            self.reynolds[hi],
            self.buckets[lo].cl_max(),
            self.buckets[hi].cl_max(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(re: f64, cl0: f64) -> Vec<PolarRow> {
        (-4..=10)
            .map(|a| {
                let alpha = a as f64;
                PolarRow::new(re, alpha, cl0 + 0.1 * alpha, 0.02 + 0.001 * alpha * alpha)
            })
            .collect()
    }

    fn two_bucket_table() -> PolarTable {
        let mut rows = bucket(50_000.0, 0.2);
        rows.extend(bucket(200_000.0, 0.4));
        PolarTable::new("test-foil", rows).unwrap()
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = PolarTable::new("none", vec![]).unwrap_err();
        assert!(matches!(err, SimError::MissingData(_)));
    }

    #[test]
    fn duplicate_alpha_is_rejected() {
        let rows = vec![
            PolarRow::new(50_000.0, 2.0, 0.4, 0.02),
            PolarRow::new(50_000.0, 2.0, 0.5, 0.03),
        ];
        let err = PolarTable::new("dup", rows).unwrap_err();
        assert!(matches!(err, SimError::ContradictoryData(_)));
    }

    #[test]
    fn buckets_are_sorted_regardless_of_input_order() {
        let mut rows = bucket(200_000.0, 0.4);
        rows.extend(bucket(50_000.0, 0.2));
        rows.reverse();
        let table = PolarTable::new("shuffled", rows).unwrap();
        assert_eq!(table.reynolds_numbers(), &[50_000.0, 200_000.0]);
        assert_eq!(table.len(), 30);
        assert_eq!(table.alpha_range(), (-4.0, 10.0));
    }

    #[test]
    fn exact_bucket_is_not_blended() {
        let table = two_bucket_table();
        let alone = PolarTable::new("low-only", bucket(50_000.0, 0.2)).unwrap();
        let c = table.coefficients(50_000.0, 3.0);
        assert_eq!(c, alone.coefficients(50_000.0, 3.0));
        assert!((c.cl - 0.5).abs() < 1e-12);
    }

    #[test]
    fn blend_lies_between_buckets() {
        let table = two_bucket_table();
        let lo = table.coefficients(50_000.0, 4.5);
        let hi = table.coefficients(200_000.0, 4.5);
        for re in [60_000.0, 125_000.0, 199_000.0] {
            let c = table.coefficients(re, 4.5);
            assert!(c.cl >= lo.cl.min(hi.cl) && c.cl <= lo.cl.max(hi.cl));
        }
        let mid = table.coefficients(125_000.0, 4.5);
        assert!((mid.cl - 0.5 * (lo.cl + hi.cl)).abs() < 1e-12);
    }

    #[test]
    fn reynolds_outside_range_clamps() {
        let table = two_bucket_table();
        assert_eq!(table.coefficients(1_000.0, 2.0), table.coefficients(50_000.0, 2.0));
        assert_eq!(table.coefficients(9e6, 2.0), table.coefficients(200_000.0, 2.0));
    }

    #[test]
    fn alpha_extrapolates_without_cap() {
        let table = two_bucket_table();
        let c = table.coefficients(50_000.0, 30.0);
        assert!((c.cl - (0.2 + 3.0)).abs() < 1e-9);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let table = two_bucket_table();
        let a = table.coefficients(87_654.0, 6.3);
        let b = table.coefficients(87_654.0, 6.3);
        assert_eq!(a, b);
    }

    #[test]
    fn cl_max_per_bucket() {
        let table = two_bucket_table();
        assert!((table.cl_max(50_000.0) - 1.2).abs() < 1e-12);
        assert!((table.cl_max(200_000.0) - 1.4).abs() < 1e-12);
        assert!((table.cl_max(125_000.0) - 1.3).abs() < 1e-12);
    }
}
