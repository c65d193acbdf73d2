//! Closed code tables used while enriching raw records.

use crate::ForkcastError;
use crate::types::PriceRange;

pub const COUNTRIES: [(i64, &str); 15] = [
    (1, "India"),
    (14, "Australia"),
    (30, "Brazil"),
    (37, "Canada"),
    (94, "Indonesia"),
    (148, "New Zeland"),
    (162, "Philippines"),
    (166, "Qatar"),
    (184, "Singapure"),
    (189, "South Africa"),
    (191, "Sri Lanka"),
    (208, "Turkey"),
    (214, "United Arab Emirates"),
    (215, "England"),
    (216, "United States of America"),
];

// "CBCBC8" and "FF7800" share a name.
pub const COLORS: [(&str, &str); 7] = [
    ("3F7E00", "darkgreen"),
    ("5BA829", "green"),
    ("9ACD32", "lightgreen"),
    ("CDD614", "orange"),
    ("FFBA00", "red"),
    ("CBCBC8", "darkred"),
    ("FF7800", "darkred"),
];

pub fn country_name(code: i64) -> Result<&'static str, ForkcastError> {
    COUNTRIES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
        .ok_or_else(|| ForkcastError::Lookup {
            table: "country",
            key: code.to_string(),
        })
}

pub fn color_name(code: &str) -> Result<&'static str, ForkcastError> {
    COLORS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
        .ok_or_else(|| ForkcastError::Lookup {
            table: "color",
            key: code.to_string(),
        })
}

/// Tiers 1-3 map to their own label; anything else, missing included, is gourmet.
pub fn price_range(tier: Option<i64>) -> PriceRange {
    match tier {
        Some(1) => PriceRange::Cheap,
        Some(2) => PriceRange::Normal,
        Some(3) => PriceRange::Expensive,
        _ => PriceRange::Gourmet,
    }
}

/// Every country a viewer can select, in code order.
pub fn country_names() -> Vec<&'static str> {
    COUNTRIES.iter().map(|(_, name)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_lookup() {
        assert_eq!(country_name(1).unwrap(), "India");
        assert_eq!(country_name(216).unwrap(), "United States of America");
        assert!(matches!(
            country_name(999),
            Err(ForkcastError::Lookup { table: "country", .. })
        ));
    }

    #[test]
    fn test_price_tiers() {
        assert_eq!(price_range(Some(1)).as_str(), "cheap");
        assert_eq!(price_range(Some(2)).as_str(), "normal");
        assert_eq!(price_range(Some(3)).as_str(), "expensive");
        assert_eq!(price_range(Some(4)).as_str(), "gourmet");
        assert_eq!(price_range(Some(999)).as_str(), "gourmet");
        assert_eq!(price_range(Some(-3)).as_str(), "gourmet");
        assert_eq!(price_range(None).as_str(), "gourmet");
    }

    #[test]
    fn test_color_lookup() {
        assert_eq!(color_name("CBCBC8").unwrap(), "darkred");
        assert_eq!(color_name("FF7800").unwrap(), "darkred");
        assert_eq!(color_name("3F7E00").unwrap(), "darkgreen");
        assert!(color_name("000000").is_err());
        assert!(color_name("3f7e00").is_err());
    }

    #[test]
    fn test_country_names_complete() {
        let names = country_names();
        assert_eq!(names.len(), 15);
        assert!(names.contains(&"Brazil"));
    }
}
