use crate::normalize::normalize;
use crate::types::{RawRecord, Restaurant};
use crate::{Dataset, ForkcastError};
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, error, info};

/// Row counts observed while cleaning one raw listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub raw_rows: usize,
    pub missing_values: usize,
    pub duplicates: usize,
    pub zero_cost: usize,
    pub kept: usize,
}

pub fn read_raw<R: Read>(reader: R) -> Result<Vec<RawRecord>, ForkcastError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let rows = rdr
        .deserialize::<RawRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    debug!(rows = rows.len(), "Read raw restaurant records");
    Ok(rows)
}

pub fn read_raw_path(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, ForkcastError> {
    let file = std::fs::File::open(path)?;
    read_raw(file)
}

pub fn clean(raw: Vec<RawRecord>) -> Result<Dataset, ForkcastError> {
    clean_with_report(raw).map(|(dataset, _)| dataset)
}

/// Normalizes every row, then drops rows with missing values, exact
/// duplicates and rows with a zero cost for two, in that order.
pub fn clean_with_report(raw: Vec<RawRecord>) -> Result<(Dataset, CleanReport), ForkcastError> {
    let raw_rows = raw.len();

    let enriched = raw
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            normalize(record).inspect_err(|e| {
                error!(row = idx, error = %e, "Failed to normalize restaurant record");
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let complete: Vec<Restaurant> = enriched
        .into_iter()
        .filter_map(|record| record.into_restaurant())
        .collect();
    let missing_values = raw_rows - complete.len();

    let distinct = drop_duplicates(complete);
    let duplicates = raw_rows - missing_values - distinct.len();

    let priced: Vec<Restaurant> = distinct
        .into_iter()
        .filter(|row| row.average_cost_for_two != 0.0)
        .collect();
    let zero_cost = raw_rows - missing_values - duplicates - priced.len();

    let report = CleanReport {
        raw_rows,
        missing_values,
        duplicates,
        zero_cost,
        kept: priced.len(),
    };
    info!(
        raw_rows,
        missing_values, duplicates, zero_cost, kept = report.kept, "Cleaned restaurant dataset"
    );
    Ok((Dataset::new(priced), report))
}

fn drop_duplicates(rows: Vec<Restaurant>) -> Vec<Restaurant> {
    let mut seen = HashSet::new();
    let keep: Vec<bool> = rows.iter().map(|row| seen.insert(row.row_key())).collect();
    rows.into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect()
}
