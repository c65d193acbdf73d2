use crate::aggregate::{
    RankOrder, best_rated_cities, cities_per_country, cuisine_ratings, cuisine_variety_per_city,
    home_metrics, map_markers, mean_cost_per_country, mean_votes_per_country,
    restaurant_highlights, restaurants_per_country, top_cities, top_restaurants,
    worst_rated_cities,
};
use crate::config::Config;
use crate::export::write_csv;
use crate::filter::{filter_by_country, filter_by_cuisine_variety, filter_by_cuisines};
use crate::table::{
    CityCount, CountryCount, CountryMean, CuisineRating, HomeMetrics, MapMarker,
    RestaurantHighlight, RestaurantRank, Table,
};
use crate::{Dataset, ForkcastError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};
use tracing::{debug, info};

const HIGHLIGHTS: usize = 5;

/// What a viewer selected in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewParams {
    pub countries: Vec<String>,
    pub top_n: usize,
    pub cuisines: Vec<String>,
}

impl Default for ViewParams {
    fn default() -> Self {
        Config::default().view_params()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub metrics: HomeMetrics,
    pub markers: Vec<MapMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountriesView {
    pub restaurants: Table<CountryCount>,
    pub cities: Table<CountryCount>,
    pub mean_votes: Table<CountryMean>,
    pub mean_cost: Table<CountryMean>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitiesView {
    pub top_cities: Table<CityCount>,
    pub best_rated: Table<CityCount>,
    pub worst_rated: Table<CityCount>,
    pub cuisine_variety: Table<CityCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuisinesView {
    pub highlights: Vec<RestaurantHighlight>,
    pub top_restaurants: Table<RestaurantRank>,
    pub best_cuisines: Table<CuisineRating>,
    pub worst_cuisines: Table<CuisineRating>,
}

// Cleaned datasets keyed by canonical input path.
static CACHE: LazyLock<Mutex<HashMap<PathBuf, Arc<Dataset>>>> = LazyLock::new(Default::default);

/// Read-only entry point shared by every view. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Explorer {
    dataset: Arc<Dataset>,
}

impl Explorer {
    pub fn new(dataset: Dataset) -> Self {
        Explorer {
            dataset: Arc::new(dataset),
        }
    }

    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, ForkcastError> {
        Ok(Explorer::new(Dataset::from_csv(path)?))
    }

    /// Like [`Explorer::from_csv`], but each input file is cleaned at most
    /// once per process.
    pub fn shared(path: impl AsRef<Path>) -> Result<Self, ForkcastError> {
        let key = std::fs::canonicalize(path)?;
        let cached = CACHE
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(dataset) = cached {
            debug!(path = %key.display(), "Reusing cleaned dataset");
            return Ok(Explorer { dataset });
        }

        let dataset = Arc::new(Dataset::from_csv(&key)?);
        let dataset = CACHE
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(dataset)
            .clone();
        Ok(Explorer { dataset })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn select(&self, params: &ViewParams) -> Dataset {
        filter_by_country(&self.dataset, &params.countries)
    }

    pub fn home(&self, params: &ViewParams) -> HomeView {
        let selected = self.select(params);
        HomeView {
            metrics: home_metrics(&selected),
            markers: map_markers(&selected),
        }
    }

    pub fn countries(&self, params: &ViewParams) -> CountriesView {
        let selected = self.select(params);
        CountriesView {
            restaurants: restaurants_per_country(&selected),
            cities: cities_per_country(&selected),
            mean_votes: mean_votes_per_country(&selected),
            mean_cost: mean_cost_per_country(&selected),
        }
    }

    pub fn cities(&self, params: &ViewParams) -> CitiesView {
        let selected = self.select(params);
        CitiesView {
            top_cities: top_cities(&selected),
            best_rated: best_rated_cities(&selected),
            worst_rated: worst_rated_cities(&selected),
            cuisine_variety: cuisine_variety_per_city(&selected),
        }
    }

    /// Cuisine rankings cover every cuisine of the eligible countries; the
    /// highlights and restaurant ranking only the selected cuisines.
    pub fn cuisines(&self, params: &ViewParams) -> CuisinesView {
        let eligible = filter_by_cuisine_variety(&self.select(params), params.top_n);
        let chosen = filter_by_cuisines(&eligible, &params.cuisines);
        info!(
            eligible = eligible.len(),
            chosen = chosen.len(),
            top_n = params.top_n,
            "Built cuisines view"
        );
        CuisinesView {
            highlights: restaurant_highlights(&chosen, HIGHLIGHTS),
            top_restaurants: top_restaurants(&chosen, params.top_n),
            best_cuisines: cuisine_ratings(&eligible, params.top_n, RankOrder::Best),
            worst_cuisines: cuisine_ratings(&eligible, params.top_n, RankOrder::Worst),
        }
    }

    pub fn export_csv<W: Write>(&self, params: &ViewParams, writer: W) -> Result<(), ForkcastError> {
        write_csv(&self.select(params), writer)
    }

    pub fn export_bytes(&self, params: &ViewParams) -> Result<Vec<u8>, ForkcastError> {
        crate::export::export_bytes(&self.select(params))
    }
}
