use crate::lookup::{color_name, country_name, price_range};
use crate::types::{EnrichedRecord, RawRecord};
use crate::ForkcastError;

const MISSING: &str = "<missing>";

/// First comma-separated token of a cuisines list, untrimmed.
pub fn primary_cuisine(cuisines: Option<&str>) -> String {
    cuisines
        .unwrap_or("")
        .split(',')
        .next()
        .unwrap_or("")
        .to_string()
}

/// Resolves the country, price and color codes of one raw record and
/// reduces its cuisines to the primary one.
pub fn normalize(raw: &RawRecord) -> Result<EnrichedRecord, ForkcastError> {
    let country = match raw.country_code {
        Some(code) => country_name(code)?,
        None => {
            return Err(ForkcastError::Lookup {
                table: "country",
                key: MISSING.to_string(),
            });
        }
    };
    let color = match raw.rating_color.as_deref() {
        Some(code) => color_name(code)?,
        None => {
            return Err(ForkcastError::Lookup {
                table: "color",
                key: MISSING.to_string(),
            });
        }
    };

    Ok(EnrichedRecord {
        restaurant_id: raw.restaurant_id,
        restaurant_name: raw.restaurant_name.clone(),
        city: raw.city.clone(),
        address: raw.address.clone(),
        locality: raw.locality.clone(),
        locality_verbose: raw.locality_verbose.clone(),
        longitude: raw.longitude,
        latitude: raw.latitude,
        cuisines: primary_cuisine(raw.cuisines.as_deref()),
        average_cost_for_two: raw.average_cost_for_two,
        currency: raw.currency.clone(),
        has_table_booking: raw.has_table_booking,
        has_online_delivery: raw.has_online_delivery,
        is_delivering_now: raw.is_delivering_now,
        aggregate_rating: raw.aggregate_rating,
        rating_text: raw.rating_text.clone(),
        votes: raw.votes,
        country_name: country.to_string(),
        price_range_name: price_range(raw.price_range),
        color_name: color.to_string(),
    })
}
