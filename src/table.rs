use crate::ForkcastError;
use serde::Serialize;
use std::io::Write;

/// A chart-ready result: display title, display column labels and typed rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table<R> {
    pub title: String,
    pub columns: Vec<&'static str>,
    pub rows: Vec<R>,
}

impl<R: Serialize> Table<R> {
    pub fn new(title: impl Into<String>, columns: &[&'static str], rows: Vec<R>) -> Self {
        Table {
            title: title.into(),
            columns: columns.to_vec(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_json(&self) -> Result<String, ForkcastError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Writes the rows under the display labels rather than the field names.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ForkcastError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCount {
    pub country: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryMean {
    pub country: String,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCount {
    pub city: String,
    pub country: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuisineRating {
    pub cuisine: String,
    pub mean_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantRank {
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub country_name: String,
    pub city: String,
    pub cuisines: String,
    pub average_cost_for_two: f64,
    pub currency: String,
    pub aggregate_rating: f64,
    pub votes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantHighlight {
    pub restaurant_id: i64,
    pub cuisines: String,
    pub currency: String,
    pub restaurant_name: String,
    pub aggregate_rating: f64,
    pub city: String,
    pub country_name: String,
    pub average_cost_for_two: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub city: String,
    pub cuisines: String,
    pub color_name: String,
    pub currency: String,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub aggregate_rating: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub average_cost_for_two: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HomeMetrics {
    pub restaurants: usize,
    pub countries: usize,
    pub cities: usize,
    pub votes: i64,
    pub cuisines: usize,
}
