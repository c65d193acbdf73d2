mod aggregate;
mod cleaning;
pub mod config;
mod export;
mod filter;
pub mod logging;
pub mod lookup;
mod normalize;
mod table;
mod types;
mod views;

use std::path::Path;
use thiserror::Error;
use tracing::info;

pub use aggregate::{
    RankOrder, best_rated_cities, cities_per_country, cuisine_ratings, cuisine_variety_per_city,
    highlight_at, home_metrics, map_markers, mean_cost_per_country, mean_votes_per_country,
    restaurant_highlights, restaurants_per_country, top_cities, top_restaurants,
    worst_rated_cities,
};
pub use cleaning::{CleanReport, clean, clean_with_report, read_raw, read_raw_path};
pub use export::{export_bytes, write_csv};
pub use filter::{cuisine_options, filter_by_country, filter_by_cuisine_variety, filter_by_cuisines};
pub use normalize::{normalize, primary_cuisine};
pub use table::{
    CityCount, CountryCount, CountryMean, CuisineRating, HomeMetrics, MapMarker,
    RestaurantHighlight, RestaurantRank, Table,
};
pub use types::{EnrichedRecord, PriceRange, RawRecord, Restaurant};
pub use views::{CitiesView, CountriesView, CuisinesView, Explorer, HomeView, ViewParams};

#[derive(Debug, Error)]
pub enum ForkcastError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("No {table} entry for code {key}")]
    Lookup { table: &'static str, key: String },
    #[error("Requested rank {requested} but only {available} rows are available")]
    InsufficientData { requested: usize, available: usize },
}

/// The cleaned, deduplicated restaurant listing every view works on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<Restaurant>,
}

impl Dataset {
    pub fn new(rows: Vec<Restaurant>) -> Self {
        Dataset { rows }
    }

    /// Reads the raw listing at `path` and runs it through [`clean`].
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, ForkcastError> {
        let path = path.as_ref();
        let raw = read_raw_path(path)?;
        let dataset = clean(raw)?;
        info!(path = %path.display(), rows = dataset.len(), "Loaded restaurant dataset");
        Ok(dataset)
    }

    pub fn rows(&self) -> &[Restaurant] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Restaurant> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn retain_rows(&self, keep: impl Fn(&Restaurant) -> bool) -> Dataset {
        Dataset::new(self.rows.iter().filter(|row| keep(row)).cloned().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Restaurant;
    type IntoIter = std::slice::Iter<'a, Restaurant>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
