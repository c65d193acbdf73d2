use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;

/// One untouched row of the source listing. Every column may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Restaurant ID", default, deserialize_with = "deserialize_whole")]
    pub restaurant_id: Option<i64>,
    #[serde(rename = "Restaurant Name", default)]
    pub restaurant_name: Option<String>,
    #[serde(rename = "Country Code", default, deserialize_with = "deserialize_whole")]
    pub country_code: Option<i64>,
    #[serde(rename = "City", default)]
    pub city: Option<String>,
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
    #[serde(rename = "Locality", default)]
    pub locality: Option<String>,
    #[serde(rename = "Locality Verbose", default)]
    pub locality_verbose: Option<String>,
    #[serde(rename = "Longitude", default)]
    pub longitude: Option<f64>,
    #[serde(rename = "Latitude", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "Cuisines", default)]
    pub cuisines: Option<String>,
    #[serde(rename = "Average Cost for two", default)]
    pub average_cost_for_two: Option<f64>,
    #[serde(rename = "Currency", default)]
    pub currency: Option<String>,
    #[serde(rename = "Has Table booking", default, deserialize_with = "deserialize_flag")]
    pub has_table_booking: Option<bool>,
    #[serde(rename = "Has Online delivery", default, deserialize_with = "deserialize_flag")]
    pub has_online_delivery: Option<bool>,
    #[serde(rename = "Is delivering now", default, deserialize_with = "deserialize_flag")]
    pub is_delivering_now: Option<bool>,
    /// Unreadable tiers become `None` and later fall into the default label.
    #[serde(rename = "Price range", default, deserialize_with = "deserialize_tier")]
    pub price_range: Option<i64>,
    #[serde(rename = "Aggregate rating", default)]
    pub aggregate_rating: Option<f64>,
    #[serde(rename = "Rating color", default)]
    pub rating_color: Option<String>,
    #[serde(rename = "Rating text", default)]
    pub rating_text: Option<String>,
    #[serde(rename = "Votes", default, deserialize_with = "deserialize_whole")]
    pub votes: Option<i64>,
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "1" | "yes" | "true" => Ok(Some(true)),
        "0" | "no" | "false" => Ok(Some(false)),
        other => Err(de::Error::custom(format!("invalid flag value {other:?}"))),
    }
}

/// Integer cell, also accepting the `2.0` form written for integer columns
/// that contain gaps.
fn parse_whole(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
            .map(|v| v as i64)
    })
}

fn deserialize_whole<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_whole(text)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid integer {text:?}"))),
    }
}

fn deserialize_tier<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_whole))
}

fn serialize_flag<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    Cheap,
    Normal,
    Expensive,
    Gourmet,
}

impl PriceRange {
    pub fn as_str(self) -> &'static str {
        match self {
            PriceRange::Cheap => "cheap",
            PriceRange::Normal => "normal",
            PriceRange::Expensive => "expensive",
            PriceRange::Gourmet => "gourmet",
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw record after code lookups and cuisine reduction, before the
/// missing-value check.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub restaurant_id: Option<i64>,
    pub restaurant_name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub locality: Option<String>,
    pub locality_verbose: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub cuisines: String,
    pub average_cost_for_two: Option<f64>,
    pub currency: Option<String>,
    pub has_table_booking: Option<bool>,
    pub has_online_delivery: Option<bool>,
    pub is_delivering_now: Option<bool>,
    pub aggregate_rating: Option<f64>,
    pub rating_text: Option<String>,
    pub votes: Option<i64>,
    pub country_name: String,
    pub price_range_name: PriceRange,
    pub color_name: String,
}

impl EnrichedRecord {
    /// Projects onto the clean column set; `None` when any retained column is missing.
    pub fn into_restaurant(self) -> Option<Restaurant> {
        Some(Restaurant {
            restaurant_id: self.restaurant_id?,
            restaurant_name: self.restaurant_name?,
            city: self.city?,
            address: self.address?,
            locality: self.locality?,
            locality_verbose: self.locality_verbose?,
            longitude: self.longitude.filter(|v| !v.is_nan())?,
            latitude: self.latitude.filter(|v| !v.is_nan())?,
            cuisines: self.cuisines,
            average_cost_for_two: self.average_cost_for_two.filter(|v| !v.is_nan())?,
            currency: self.currency?,
            has_table_booking: self.has_table_booking?,
            has_online_delivery: self.has_online_delivery?,
            is_delivering_now: self.is_delivering_now?,
            aggregate_rating: self.aggregate_rating.filter(|v| !v.is_nan())?,
            rating_text: self.rating_text?,
            votes: self.votes?,
            country_name: self.country_name,
            price_range_name: self.price_range_name,
            color_name: self.color_name,
        })
    }
}

/// One row of the clean dataset. Serializes with the canonical column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restaurant {
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub city: String,
    pub address: String,
    pub locality: String,
    pub locality_verbose: String,
    pub longitude: f64,
    pub latitude: f64,
    pub cuisines: String,
    pub average_cost_for_two: f64,
    pub currency: String,
    #[serde(serialize_with = "serialize_flag")]
    pub has_table_booking: bool,
    #[serde(serialize_with = "serialize_flag")]
    pub has_online_delivery: bool,
    #[serde(serialize_with = "serialize_flag")]
    pub is_delivering_now: bool,
    pub aggregate_rating: f64,
    pub rating_text: String,
    pub votes: i64,
    pub country_name: String,
    pub price_range_name: PriceRange,
    pub color_name: String,
}

impl Restaurant {
    pub(crate) fn row_key(&self) -> RowKey<'_> {
        RowKey {
            restaurant_id: self.restaurant_id,
            restaurant_name: &self.restaurant_name,
            city: &self.city,
            address: &self.address,
            locality: &self.locality,
            locality_verbose: &self.locality_verbose,
            longitude: float_key(self.longitude),
            latitude: float_key(self.latitude),
            cuisines: &self.cuisines,
            average_cost_for_two: float_key(self.average_cost_for_two),
            currency: &self.currency,
            flags: (
                self.has_table_booking,
                self.has_online_delivery,
                self.is_delivering_now,
            ),
            aggregate_rating: float_key(self.aggregate_rating),
            rating_text: &self.rating_text,
            votes: self.votes,
            country_name: &self.country_name,
            price_range_name: self.price_range_name,
            color_name: &self.color_name,
        }
    }
}

/// Hashable view over every column of a [`Restaurant`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct RowKey<'a> {
    restaurant_id: i64,
    restaurant_name: &'a str,
    city: &'a str,
    address: &'a str,
    locality: &'a str,
    locality_verbose: &'a str,
    longitude: u64,
    latitude: u64,
    cuisines: &'a str,
    average_cost_for_two: u64,
    currency: &'a str,
    flags: (bool, bool, bool),
    aggregate_rating: u64,
    rating_text: &'a str,
    votes: i64,
    country_name: &'a str,
    price_range_name: PriceRange,
    color_name: &'a str,
}

/// Bit pattern of a float for hashing; `-0.0` and `0.0` share a key.
pub(crate) fn float_key(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

#[cfg(test)]
pub(crate) fn sample(id: i64, name: &str, country: &str) -> Restaurant {
    Restaurant {
        restaurant_id: id,
        restaurant_name: name.to_string(),
        city: "Rio de Janeiro".to_string(),
        address: "Rua A, 1".to_string(),
        locality: "Centro".to_string(),
        locality_verbose: "Centro, Rio de Janeiro".to_string(),
        longitude: -43.2,
        latitude: -22.9,
        cuisines: "Brazilian".to_string(),
        average_cost_for_two: 100.0,
        currency: "Brazilian Real(R$)".to_string(),
        has_table_booking: false,
        has_online_delivery: true,
        is_delivering_now: false,
        aggregate_rating: 4.0,
        rating_text: "Very Good".to_string(),
        votes: 100,
        country_name: country.to_string(),
        price_range_name: PriceRange::Expensive,
        color_name: "green".to_string(),
    }
}
