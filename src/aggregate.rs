use crate::table::{
    CityCount, CountryCount, CountryMean, CuisineRating, HomeMetrics, MapMarker,
    RestaurantHighlight, RestaurantRank, Table,
};
use crate::types::{Restaurant, float_key};
use crate::{Dataset, ForkcastError};
use statrs::statistics::{Data, Distribution, Median};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;
use tracing::debug;

const TOP_CITIES: usize = 10;
const TOP_RATED_CITIES: usize = 7;
const GOOD_RATING: f64 = 4.0;
const POOR_RATING: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    Best,
    Worst,
}

fn distinct_by<'a, K, F>(rows: impl IntoIterator<Item = &'a Restaurant>, key: F) -> Vec<&'a Restaurant>
where
    K: Hash + Eq,
    F: Fn(&'a Restaurant) -> K,
{
    let mut seen = HashSet::new();
    rows.into_iter().filter(|row| seen.insert(key(*row))).collect()
}

fn truncate_top<T>(rows: &mut Vec<T>, n: usize, what: &str) {
    if rows.len() < n {
        debug!(requested = n, available = rows.len(), table = what, "Top-N request clamped");
    }
    rows.truncate(n);
}

fn mean(values: Vec<f64>) -> f64 {
    Data::new(values).mean().unwrap_or(f64::NAN)
}

fn median(values: Vec<f64>) -> f64 {
    Data::new(values).median()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn count_per_country(rows: Vec<&Restaurant>) -> Vec<CountryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.country_name.as_str()).or_insert(0) += 1;
    }
    let mut sorted: Vec<CountryCount> = counts
        .into_iter()
        .map(|(country, count)| CountryCount {
            country: country.to_string(),
            count,
        })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted
}

fn count_per_city(rows: Vec<&Restaurant>) -> Vec<CityCount> {
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for row in rows {
        *counts
            .entry((row.city.as_str(), row.country_name.as_str()))
            .or_insert(0) += 1;
    }
    let mut sorted: Vec<CityCount> = counts
        .into_iter()
        .map(|((city, country), count)| CityCount {
            city: city.to_string(),
            country: country.to_string(),
            count,
        })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted
}

fn mean_per_country(dataset: &Dataset, value: impl Fn(&Restaurant) -> f64) -> Vec<CountryMean> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in dataset {
        groups
            .entry(row.country_name.as_str())
            .or_default()
            .push(value(row));
    }
    let mut sorted: Vec<CountryMean> = groups
        .into_iter()
        .map(|(country, values)| CountryMean {
            country: country.to_string(),
            mean: mean(values),
        })
        .collect();
    sorted.sort_by(|a, b| b.mean.partial_cmp(&a.mean).unwrap_or(Ordering::Equal));
    sorted
}

pub fn restaurants_per_country(dataset: &Dataset) -> Table<CountryCount> {
    let rows = distinct_by(dataset, |r| (r.country_name.as_str(), r.restaurant_name.as_str()));
    Table::new(
        "Restaurants registered per country",
        &["Countries", "Restaurants"],
        count_per_country(rows),
    )
}

pub fn cities_per_country(dataset: &Dataset) -> Table<CountryCount> {
    let rows = distinct_by(dataset, |r| (r.country_name.as_str(), r.city.as_str()));
    Table::new(
        "Cities registered per country",
        &["Countries", "Cities"],
        count_per_country(rows),
    )
}

pub fn mean_votes_per_country(dataset: &Dataset) -> Table<CountryMean> {
    Table::new(
        "Mean votes per country",
        &["Countries", "Votes"],
        mean_per_country(dataset, |r| r.votes as f64),
    )
}

pub fn mean_cost_per_country(dataset: &Dataset) -> Table<CountryMean> {
    Table::new(
        "Mean cost for two per country",
        &["Countries", "Cost for two"],
        mean_per_country(dataset, |r| r.average_cost_for_two),
    )
}

pub fn top_cities(dataset: &Dataset) -> Table<CityCount> {
    let rows = distinct_by(dataset, |r| {
        (r.city.as_str(), r.country_name.as_str(), r.restaurant_name.as_str())
    });
    let mut cities = count_per_city(rows);
    truncate_top(&mut cities, TOP_CITIES, "top_cities");
    Table::new(
        "Top 10 cities by number of restaurants",
        &["Cities", "Country", "Restaurants"],
        cities,
    )
}

fn rated_cities(dataset: &Dataset, keep: impl Fn(f64) -> bool, what: &str) -> Vec<CityCount> {
    let rated = dataset.iter().filter(|r| keep(r.aggregate_rating));
    let rows = distinct_by(rated, |r| {
        (r.country_name.as_str(), r.city.as_str(), r.restaurant_name.as_str())
    });
    let mut cities = count_per_city(rows);
    truncate_top(&mut cities, TOP_RATED_CITIES, what);
    cities
}

pub fn best_rated_cities(dataset: &Dataset) -> Table<CityCount> {
    Table::new(
        "Cities with ratings above 4",
        &["Cities", "Country", "Restaurants"],
        rated_cities(dataset, |rating| rating > GOOD_RATING, "best_rated_cities"),
    )
}

pub fn worst_rated_cities(dataset: &Dataset) -> Table<CityCount> {
    Table::new(
        "Cities with ratings below 2",
        &["Cities", "Country", "Restaurants"],
        rated_cities(dataset, |rating| rating < POOR_RATING, "worst_rated_cities"),
    )
}

pub fn cuisine_variety_per_city(dataset: &Dataset) -> Table<CityCount> {
    let rows = distinct_by(dataset, |r| {
        (r.country_name.as_str(), r.city.as_str(), r.cuisines.as_str())
    });
    let mut cities = count_per_city(rows);
    truncate_top(&mut cities, TOP_CITIES, "cuisine_variety_per_city");
    Table::new(
        "Top 10 cities by distinct cuisines",
        &["Cities", "Country", "Distinct cuisines"],
        cities,
    )
}

/// Highest rated restaurants; equal ratings rank the higher id first.
pub fn top_restaurants(dataset: &Dataset, top_n: usize) -> Table<RestaurantRank> {
    let rows = distinct_by(dataset, |r| {
        (
            r.restaurant_id,
            r.restaurant_name.as_str(),
            r.country_name.as_str(),
            r.city.as_str(),
            r.cuisines.as_str(),
            float_key(r.average_cost_for_two),
            r.currency.as_str(),
            float_key(r.aggregate_rating),
            r.votes,
        )
    });
    let mut ranked: Vec<RestaurantRank> = rows
        .into_iter()
        .map(|r| RestaurantRank {
            restaurant_id: r.restaurant_id,
            restaurant_name: r.restaurant_name.clone(),
            country_name: r.country_name.clone(),
            city: r.city.clone(),
            cuisines: r.cuisines.clone(),
            average_cost_for_two: r.average_cost_for_two,
            currency: r.currency.clone(),
            aggregate_rating: r.aggregate_rating,
            votes: r.votes,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.aggregate_rating
            .partial_cmp(&a.aggregate_rating)
            .unwrap_or(Ordering::Equal)
            .then(b.restaurant_id.cmp(&a.restaurant_id))
    });
    truncate_top(&mut ranked, top_n, "top_restaurants");
    Table::new(
        format!("Top {top_n} restaurants"),
        &[
            "Id",
            "Restaurant",
            "Country",
            "City",
            "Cuisine",
            "Cost for two",
            "Currency",
            "Rating",
            "Votes",
        ],
        ranked,
    )
}

/// Mean rating per primary cuisine, rounded to two decimals after ranking.
pub fn cuisine_ratings(dataset: &Dataset, top_n: usize, order: RankOrder) -> Table<CuisineRating> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in dataset {
        groups
            .entry(row.cuisines.as_str())
            .or_default()
            .push(row.aggregate_rating);
    }
    let mut ratings: Vec<CuisineRating> = groups
        .into_iter()
        .map(|(cuisine, values)| CuisineRating {
            cuisine: cuisine.to_string(),
            mean_rating: mean(values),
        })
        .collect();
    ratings.sort_by(|a, b| {
        let ord = a
            .mean_rating
            .partial_cmp(&b.mean_rating)
            .unwrap_or(Ordering::Equal);
        match order {
            RankOrder::Worst => ord,
            RankOrder::Best => ord.reverse(),
        }
    });
    truncate_top(&mut ratings, top_n, "cuisine_ratings");
    for rating in &mut ratings {
        rating.mean_rating = round2(rating.mean_rating);
    }
    let label = match order {
        RankOrder::Best => "best",
        RankOrder::Worst => "worst",
    };
    Table::new(
        format!("Top {top_n} {label} cuisines"),
        &["Cuisine", "Mean rating"],
        ratings,
    )
}

fn ranked_highlights(dataset: &Dataset) -> Vec<RestaurantHighlight> {
    let rows = distinct_by(dataset, |r| {
        (
            r.restaurant_id,
            r.cuisines.as_str(),
            r.currency.as_str(),
            r.restaurant_name.as_str(),
            float_key(r.aggregate_rating),
            r.city.as_str(),
            r.country_name.as_str(),
            float_key(r.average_cost_for_two),
        )
    });
    let mut ranked: Vec<RestaurantHighlight> = rows
        .into_iter()
        .map(|r| RestaurantHighlight {
            restaurant_id: r.restaurant_id,
            cuisines: r.cuisines.clone(),
            currency: r.currency.clone(),
            restaurant_name: r.restaurant_name.clone(),
            aggregate_rating: r.aggregate_rating,
            city: r.city.clone(),
            country_name: r.country_name.clone(),
            average_cost_for_two: r.average_cost_for_two,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.aggregate_rating
            .partial_cmp(&a.aggregate_rating)
            .unwrap_or(Ordering::Equal)
            .then(b.restaurant_id.cmp(&a.restaurant_id))
            .then(b.restaurant_name.cmp(&a.restaurant_name))
    });
    ranked
}

pub fn restaurant_highlights(dataset: &Dataset, count: usize) -> Vec<RestaurantHighlight> {
    let mut ranked = ranked_highlights(dataset);
    truncate_top(&mut ranked, count, "restaurant_highlights");
    ranked
}

/// The `rank`-th (0-based) highlighted restaurant.
pub fn highlight_at(dataset: &Dataset, rank: usize) -> Result<RestaurantHighlight, ForkcastError> {
    let mut ranked = ranked_highlights(dataset);
    let available = ranked.len();
    if rank >= available {
        return Err(ForkcastError::InsufficientData {
            requested: rank + 1,
            available,
        });
    }
    Ok(ranked.swap_remove(rank))
}

pub fn map_markers(dataset: &Dataset) -> Vec<MapMarker> {
    type MarkerKey<'a> = (&'a str, &'a str, &'a str, &'a str, i64, &'a str);
    let mut groups: BTreeMap<MarkerKey<'_>, Vec<&Restaurant>> = BTreeMap::new();
    for row in dataset {
        groups
            .entry((
                row.city.as_str(),
                row.cuisines.as_str(),
                row.color_name.as_str(),
                row.currency.as_str(),
                row.restaurant_id,
                row.restaurant_name.as_str(),
            ))
            .or_default()
            .push(row);
    }
    groups
        .into_iter()
        .map(|((city, cuisines, color_name, currency, restaurant_id, restaurant_name), rows)| {
            let column = |f: fn(&Restaurant) -> f64| rows.iter().map(|r| f(r)).collect::<Vec<_>>();
            MapMarker {
                city: city.to_string(),
                cuisines: cuisines.to_string(),
                color_name: color_name.to_string(),
                currency: currency.to_string(),
                restaurant_id,
                restaurant_name: restaurant_name.to_string(),
                aggregate_rating: median(column(|r| r.aggregate_rating)),
                latitude: median(column(|r| r.latitude)),
                longitude: median(column(|r| r.longitude)),
                average_cost_for_two: median(column(|r| r.average_cost_for_two)),
            }
        })
        .collect()
}

fn distinct_count<'a>(dataset: &'a Dataset, field: impl Fn(&'a Restaurant) -> &'a str) -> usize {
    dataset.iter().map(field).collect::<HashSet<_>>().len()
}

pub fn home_metrics(dataset: &Dataset) -> HomeMetrics {
    let votes = distinct_by(dataset, |r| (r.restaurant_name.as_str(), r.votes))
        .into_iter()
        .map(|r| r.votes)
        .sum::<i64>();
    HomeMetrics {
        restaurants: distinct_count(dataset, |r| r.restaurant_name.as_str()),
        countries: distinct_count(dataset, |r| r.country_name.as_str()),
        cities: distinct_count(dataset, |r| r.city.as_str()),
        votes,
        cuisines: distinct_count(dataset, |r| r.cuisines.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sample;

    fn row(id: i64, name: &str, country: &str, city: &str, cuisine: &str, rating: f64) -> Restaurant {
        let mut r = sample(id, name, country);
        r.city = city.to_string();
        r.cuisines = cuisine.to_string();
        r.aggregate_rating = rating;
        r
    }

    fn dataset() -> Dataset {
        let mut rows = vec![
            row(1, "Alpha", "Brazil", "Rio", "Brazilian", 4.5),
            row(2, "Beta", "Brazil", "Rio", "Italian", 4.0),
            row(3, "Gamma", "Brazil", "Sao Paulo", "Japanese", 1.5),
            row(4, "Delta", "India", "Delhi", "North Indian", 3.0),
            row(5, "Alpha", "Brazil", "Rio", "Brazilian", 4.5),
            row(6, "Eta", "Qatar", "Doha", "Arabian", 4.9),
        ];
        rows[0].votes = 100;
        rows[1].votes = 300;
        rows[3].votes = 50;
        rows[3].average_cost_for_two = 700.0;
        rows[4].votes = 100;
        Dataset::new(rows)
    }

    #[test]
    fn test_restaurants_per_country() {
        let table = restaurants_per_country(&dataset());
        let counts: Vec<(&str, usize)> =
            table.rows.iter().map(|r| (r.country.as_str(), r.count)).collect();
        // "Alpha" appears twice in Brazil but counts once.
        assert_eq!(counts, vec![("Brazil", 3), ("India", 1), ("Qatar", 1)]);
        assert_eq!(table.columns, vec!["Countries", "Restaurants"]);
    }

    #[test]
    fn test_cities_per_country() {
        let table = cities_per_country(&dataset());
        assert_eq!(table.rows[0].country, "Brazil");
        assert_eq!(table.rows[0].count, 2);
        assert_eq!(table.rows.len(), 3);
    }

    #[test]
    fn test_mean_votes_and_cost() {
        let votes = mean_votes_per_country(&dataset());
        assert_eq!(votes.rows[0].country, "Brazil");
        assert!((votes.rows[0].mean - 150.0).abs() < 1e-9);

        let cost = mean_cost_per_country(&dataset());
        assert_eq!(cost.rows[0].country, "India");
        assert_eq!(cost.rows[0].mean, 700.0);
    }

    #[test]
    fn test_top_cities_counts_distinct_names() {
        let table = top_cities(&dataset());
        assert_eq!(table.rows[0].city, "Rio");
        assert_eq!(table.rows[0].count, 2);
        assert_eq!(table.rows.len(), 4);
    }

    #[test]
    fn test_rated_cities_are_strict() {
        let best = best_rated_cities(&dataset());
        let cities: Vec<&str> = best.rows.iter().map(|r| r.city.as_str()).collect();
        // Beta sits exactly on 4.0 and is excluded.
        assert_eq!(cities, vec!["Doha", "Rio"]);
        assert!(best.rows.iter().all(|r| r.count == 1));

        let worst = worst_rated_cities(&dataset());
        assert_eq!(worst.rows.len(), 1);
        assert_eq!(worst.rows[0].city, "Sao Paulo");
    }

    #[test]
    fn test_rated_cities_truncate_to_seven() {
        let rows = (0..10)
            .map(|i| row(i, "R", "Brazil", &format!("City {i}"), "Bar", 4.8))
            .collect();
        assert_eq!(best_rated_cities(&Dataset::new(rows)).len(), 7);
    }

    #[test]
    fn test_cuisine_variety_per_city() {
        let table = cuisine_variety_per_city(&dataset());
        assert_eq!(table.rows[0].city, "Rio");
        assert_eq!(table.rows[0].count, 2);
    }

    #[test]
    fn test_top_restaurants_tie_break_on_id() {
        let data = Dataset::new(vec![
            row(10, "Low id", "Brazil", "Rio", "Bar", 4.9),
            row(20, "High id", "Brazil", "Rio", "Bar", 4.9),
            row(30, "Lower rating", "Brazil", "Rio", "Bar", 4.0),
        ]);
        let table = top_restaurants(&data, 10);
        let ids: Vec<i64> = table.rows.iter().map(|r| r.restaurant_id).collect();
        assert_eq!(ids, vec![20, 10, 30]);
        assert_eq!(table.title, "Top 10 restaurants");
    }

    #[test]
    fn test_top_restaurants_clamps() {
        assert_eq!(top_restaurants(&dataset(), 2).len(), 2);
        assert_eq!(top_restaurants(&dataset(), 50).len(), 6);
        assert!(top_restaurants(&Dataset::default(), 10).is_empty());
    }

    #[test]
    fn test_cuisine_ratings_rounded() {
        let data = Dataset::new(vec![
            row(1, "A", "Brazil", "Rio", "Bar", 4.1),
            row(2, "B", "Brazil", "Rio", "Bar", 4.2),
            row(3, "C", "Brazil", "Rio", "Bar", 4.2),
            row(4, "D", "Brazil", "Rio", "Cafe", 2.0),
        ]);
        let best = cuisine_ratings(&data, 10, RankOrder::Best);
        assert_eq!(best.rows[0].cuisine, "Bar");
        assert_eq!(best.rows[0].mean_rating, 4.17);
        assert_eq!(best.rows[1].mean_rating, 2.0);

        let worst = cuisine_ratings(&data, 1, RankOrder::Worst);
        assert_eq!(worst.len(), 1);
        assert_eq!(worst.rows[0].cuisine, "Cafe");
        assert_eq!(worst.title, "Top 1 worst cuisines");
    }

    #[test]
    fn test_highlights_and_positional_access() {
        let highlights = restaurant_highlights(&dataset(), 5);
        let ids: Vec<i64> = highlights.iter().map(|h| h.restaurant_id).collect();
        assert_eq!(ids, vec![6, 5, 1, 2, 4]);

        assert_eq!(highlight_at(&dataset(), 0).unwrap().restaurant_id, 6);
        assert!(matches!(
            highlight_at(&dataset(), 6),
            Err(ForkcastError::InsufficientData {
                requested: 7,
                available: 6
            })
        ));
    }

    #[test]
    fn test_map_markers_take_medians() {
        let mut a = row(1, "Alpha", "Brazil", "Rio", "Bar", 4.0);
        let mut b = a.clone();
        b.address = "Other".to_string();
        b.aggregate_rating = 5.0;
        b.latitude = -20.0;
        a.latitude = -22.0;
        let c = row(2, "Beta", "Brazil", "Rio", "Bar", 3.0);
        let markers = map_markers(&Dataset::new(vec![a, b, c]));
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].restaurant_id, 1);
        assert_eq!(markers[0].aggregate_rating, 4.5);
        assert_eq!(markers[0].latitude, -21.0);
        assert_eq!(markers[1].aggregate_rating, 3.0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(vec![4.0, 1.0, 2.0, 3.0]), 2.5);
        assert!(median(vec![]).is_nan());
    }

    #[test]
    fn test_home_metrics() {
        let metrics = home_metrics(&dataset());
        assert_eq!(
            metrics,
            HomeMetrics {
                restaurants: 5,
                countries: 3,
                cities: 4,
                votes: 100 + 300 + 100 + 50 + 100,
                cuisines: 5,
            }
        );
    }

    #[test]
    fn test_empty_dataset_yields_empty_tables() {
        let empty = Dataset::default();
        assert!(restaurants_per_country(&empty).is_empty());
        assert!(mean_votes_per_country(&empty).is_empty());
        assert!(cuisine_variety_per_city(&empty).is_empty());
        assert!(map_markers(&empty).is_empty());
        assert_eq!(home_metrics(&empty), HomeMetrics::default());
    }
}
