use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::aero::{PolarRow, PolarTable};
use crate::error::{Result, SimError};

/// One row of a scraped polar database. Extra columns (data URLs and the
/// like) are ignored.
#[derive(Debug, Deserialize)]
struct PolarRecord {
    #[serde(rename = "Name", alias = "name", alias = "airfoil")]
    name: String,
    #[serde(rename = "Reynold's Number", alias = "reynolds", alias = "reynolds_number")]
    reynolds: f64,
    #[serde(rename = "Alpha", alias = "alpha", alias = "alpha_deg")]
    alpha: f64,
    #[serde(rename = "CL", alias = "cl")]
    cl: f64,
    #[serde(rename = "CD", alias = "cd")]
    cd: f64,
}

fn matches(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(&needle.to_lowercase())
}

/// Load the polar of the airfoil whose name contains `airfoil`
/// (case-insensitive) from CSV.
///
/// A query matching several airfoils is ambiguous unless one of them
/// matches the whole name.
pub fn read_polar<R: Read>(reader: R, airfoil: &str) -> Result<PolarTable> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut by_name: BTreeMap<String, Vec<PolarRow>> = BTreeMap::new();

    for record in rdr.deserialize() {
        let rec: PolarRecord = record?;
        if !matches(&rec.name, airfoil) {
            continue;
        }
        by_name
            .entry(rec.name)
            .or_default()
            .push(PolarRow::new(rec.reynolds, rec.alpha, rec.cl, rec.cd));
    }

    if by_name.len() > 1 {
        let exact = by_name
            .keys()
            .find(|name| name.eq_ignore_ascii_case(airfoil.trim()))
            .cloned();
        match exact {
            Some(name) => by_name.retain(|k, _| *k == name),
            None => {
                let names: Vec<&str> = by_name.keys().map(String::as_str).collect();
                return Err(SimError::ContradictoryData(format!(
                    "airfoil '{airfoil}' matches several polars: {}",
                    names.join(", ")
                )));
            }
        }
    }

    let Some((name, rows)) = by_name.pop_first() else {
        return Err(SimError::MissingData(format!(
            "no polar rows for airfoil matching '{airfoil}'"
        )));
    };
    PolarTable::new(name, rows)
}

pub fn load_polar(path: impl AsRef<Path>, airfoil: &str) -> Result<PolarTable> {
    read_polar(File::open(path)?, airfoil)
}

/// Distinct airfoil names in a polar CSV, sorted.
pub fn list_airfoils<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut names = BTreeSet::new();
    for record in rdr.deserialize() {
        let rec: PolarRecord = record?;
        names.insert(rec.name);
    }
    Ok(names.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Name,Data Url,Reynold's Number,Alpha,CL,CD
S1223 (s1223-il),http://x/1,50000,0,1.10,0.030
S1223 (s1223-il),http://x/1,50000,5,1.60,0.035
S1223 (s1223-il),http://x/2,100000,0,1.15,0.025
S1223 (s1223-il),http://x/2,100000,5,1.65,0.028
NACA 2412 (naca2412-il),http://x/3,50000,0,0.20,0.012
";

    #[test]
    fn filters_by_substring_case_insensitive() {
        let table = read_polar(SAMPLE.as_bytes(), "s1223").unwrap();
        assert_eq!(table.name(), "S1223 (s1223-il)");
        assert_eq!(table.len(), 4);
        assert_eq!(table.reynolds_numbers(), &[50_000.0, 100_000.0]);
        let c = table.coefficients(50_000.0, 2.5);
        assert!((c.cl - 1.35).abs() < 1e-12);
    }

    #[test]
    fn unknown_airfoil_is_missing_data() {
        let err = read_polar(SAMPLE.as_bytes(), "clark y").unwrap_err();
        assert!(matches!(err, SimError::MissingData(_)));
    }

    #[test]
    fn ambiguous_substring_is_rejected() {
        let data = format!(
            "{SAMPLE}S1223 (s1223-il) smoothed,http://x/4,50000,0,1.20,0.031\n"
        );
        let err = read_polar(data.as_bytes(), "s1223").unwrap_err();
        assert!(matches!(err, SimError::ContradictoryData(_)));

        // The full name picks one foil out of several partial matches
        let table = read_polar(data.as_bytes(), "s1223 (S1223-IL)").unwrap();
        assert_eq!(table.name(), "S1223 (s1223-il)");
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn snake_case_headers_are_accepted() {
        let data = "name,reynolds_number,alpha_deg,cl,cd\nfoil,80000,2,0.5,0.02\n";
        let table = read_polar(data.as_bytes(), "FOIL").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn lists_distinct_names() {
        let names = list_airfoils(SAMPLE.as_bytes()).unwrap();
        assert_eq!(names, vec!["NACA 2412 (naca2412-il)", "S1223 (s1223-il)"]);
    }

    #[test]
    fn malformed_number_is_csv_error() {
        let data = "Name,Reynold's Number,Alpha,CL,CD\nfoil,abc,2,0.5,0.02\n";
        assert!(matches!(read_polar(data.as_bytes(), "foil"), Err(SimError::Csv(_))));
    }
}
