use crate::Dataset;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Rows whose country is one of `countries`. Unknown names simply match nothing.
pub fn filter_by_country<S: AsRef<str>>(dataset: &Dataset, countries: &[S]) -> Dataset {
    let selected: HashSet<&str> = countries.iter().map(AsRef::as_ref).collect();
    let filtered = dataset.retain_rows(|row| selected.contains(row.country_name.as_str()));
    debug!(
        selected = selected.len(),
        rows = filtered.len(),
        "Filtered dataset by country"
    );
    filtered
}

pub fn filter_by_cuisines<S: AsRef<str>>(dataset: &Dataset, cuisines: &[S]) -> Dataset {
    let selected: HashSet<&str> = cuisines.iter().map(AsRef::as_ref).collect();
    dataset.retain_rows(|row| selected.contains(row.cuisines.as_str()))
}

/// Keeps the countries offering at least `min` distinct primary cuisines.
pub fn filter_by_cuisine_variety(dataset: &Dataset, min: usize) -> Dataset {
    let mut variety: HashMap<&str, HashSet<&str>> = HashMap::new();
    for row in dataset {
        variety
            .entry(row.country_name.as_str())
            .or_default()
            .insert(row.cuisines.as_str());
    }
    let eligible: HashSet<&str> = variety
        .into_iter()
        .filter(|(_, cuisines)| cuisines.len() >= min)
        .map(|(country, _)| country)
        .collect();
    dataset.retain_rows(|row| eligible.contains(row.country_name.as_str()))
}

/// Distinct primary cuisines in order of first appearance.
pub fn cuisine_options(dataset: &Dataset) -> Vec<String> {
    let mut seen = HashSet::new();
    dataset
        .iter()
        .filter(|row| seen.insert(row.cuisines.as_str()))
        .map(|row| row.cuisines.clone())
        .collect()
}
