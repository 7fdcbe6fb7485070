//! Filtering and ordering of the park catalog.
//!
//! Recomputed from scratch on every query; there is no index and no pagination.

use std::{cmp::Ordering, convert::TryFrom};

use crate::catalog::{Park, facilities};

/// Facility names that count as "water access".
const WATER_FACILITIES: [&str; 3] = [
    facilities::WATER_FOUNTAIN.name,
    facilities::DOG_WATER.name,
    facilities::SWIM_AREA.name,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Rating,
    #[default]
    Distance,
    Reviews,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Rating => "rating",
            SortKey::Distance => "distance",
            SortKey::Reviews => "reviews",
        }
    }

    pub const fn all() -> &'static [SortKey] {
        &[SortKey::Rating, SortKey::Distance, SortKey::Reviews]
    }

    fn compare(&self, a: &Park, b: &Park) -> Ordering {
        match self {
            SortKey::Rating => b.rating.total_cmp(&a.rating),
            SortKey::Distance => {
                parse_leading_distance(a.distance).total_cmp(&parse_leading_distance(b.distance))
            }
            SortKey::Reviews => b.reviews.cmp(&a.reviews),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SortKey {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "rating" => Ok(SortKey::Rating),
            "distance" => Ok(SortKey::Distance),
            "reviews" => Ok(SortKey::Reviews),
            _ => Err(anyhow::anyhow!(
                "Unknown sort key '{value}'. Supported keys: rating, distance, reviews."
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParkQuery {
    pub search: String,
    pub off_leash: bool,
    pub fenced: bool,
    pub water: bool,
    pub max_distance_km: f64,
    pub sort: SortKey,
}

impl ParkQuery {
    pub const DEFAULT_MAX_DISTANCE_KM: f64 = 30.0;

    fn matches(&self, park: &Park, term: &str) -> bool {
        let matches_term = park.name.to_lowercase().contains(term)
            || park.location.to_lowercase().contains(term)
            || park.description.to_lowercase().contains(term);

        let matches_off_leash = !self.off_leash || park.rules.off_leash_areas;
        let matches_fenced = !self.fenced || park.has_facility(facilities::FENCED.name);
        let matches_water =
            !self.water || WATER_FACILITIES.iter().any(|name| park.has_facility(name));
        let matches_distance = parse_leading_distance(park.distance) <= self.max_distance_km;

        matches_term && matches_off_leash && matches_fenced && matches_water && matches_distance
    }
}

impl Default for ParkQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            off_leash: false,
            fenced: false,
            water: false,
            max_distance_km: Self::DEFAULT_MAX_DISTANCE_KM,
            sort: SortKey::default(),
        }
    }
}

/// Leading number of a free-text distance such as `"2.3 km"` or `"2.3km"`.
///
/// Missing or unparseable text yields 0, so such parks always pass a distance bound.
pub fn parse_leading_distance(distance: Option<&str>) -> f64 {
    distance
        .and_then(|text| text.split_whitespace().next())
        .and_then(numeric_prefix)
        .unwrap_or(0.0)
}

/// Longest prefix of `token` that parses as a finite number.
fn numeric_prefix(token: &str) -> Option<f64> {
    token
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .rev()
        .find_map(|end| token[..end].parse::<f64>().ok().filter(|v| v.is_finite()))
}

/// Apply every predicate of `query` (ANDed) and order the survivors.
///
/// The sort is stable, so ties keep catalog order.
pub fn filter_parks<'a>(parks: &'a [Park], query: &ParkQuery) -> Vec<&'a Park> {
    let term = query.search.trim().to_lowercase();

    let mut filtered: Vec<&Park> = parks.iter().filter(|park| query.matches(park, &term)).collect();
    filtered.sort_by(|a, b| query.sort.compare(a, b));
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn slugs(parks: &[&Park]) -> Vec<&'static str> {
        parks.iter().map(|p| p.slug).collect()
    }

    #[test]
    fn max_distance_three_keeps_two_nearest() {
        let query = ParkQuery {
            max_distance_km: 3.0,
            ..ParkQuery::default()
        };
        let result = filter_parks(catalog::all(), &query);

        assert_eq!(slugs(&result), vec!["parramatta-park", "granville-park"]);
    }

    #[test]
    fn off_leash_filter_is_reachable() {
        let query = ParkQuery {
            off_leash: true,
            ..ParkQuery::default()
        };
        assert_eq!(filter_parks(catalog::all(), &query).len(), 5);
    }

    #[test]
    fn sort_by_reviews_descending() {
        let query = ParkQuery {
            sort: SortKey::Reviews,
            ..ParkQuery::default()
        };
        let result = filter_parks(catalog::all(), &query);

        let reviews: Vec<u32> = result.iter().map(|p| p.reviews).collect();
        assert_eq!(reviews, vec![892, 654, 567, 423, 389]);
        assert_eq!(
            slugs(&result),
            vec![
                "parramatta-park",
                "lake-parramatta-reserve",
                "merrylands-park",
                "granville-park",
                "westmead-park",
            ]
        );
    }

    #[test]
    fn sort_by_rating_descending() {
        let query = ParkQuery {
            sort: SortKey::Rating,
            ..ParkQuery::default()
        };
        let ratings: Vec<f64> =
            filter_parks(catalog::all(), &query).iter().map(|p| p.rating).collect();
        assert_eq!(ratings, vec![4.7, 4.6, 4.5, 4.4, 4.3]);
    }

    #[test]
    fn default_query_orders_by_distance() {
        let result = filter_parks(catalog::all(), &ParkQuery::default());
        assert_eq!(
            slugs(&result),
            vec![
                "parramatta-park",
                "granville-park",
                "lake-parramatta-reserve",
                "merrylands-park",
                "westmead-park",
            ]
        );
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let by_name = ParkQuery {
            search: "WESTMEAD".into(),
            ..ParkQuery::default()
        };
        assert_eq!(
            slugs(&filter_parks(catalog::all(), &by_name)),
            vec!["westmead-park"]
        );

        let by_location = ParkQuery {
            search: "north parramatta".into(),
            ..ParkQuery::default()
        };
        assert_eq!(
            slugs(&filter_parks(catalog::all(), &by_location)),
            vec!["lake-parramatta-reserve"]
        );

        let by_description = ParkQuery {
            search: "fenced".into(),
            ..ParkQuery::default()
        };
        assert_eq!(
            slugs(&filter_parks(catalog::all(), &by_description)),
            vec!["granville-park"]
        );
    }

    #[test]
    fn facility_filters_are_anded() {
        let query = ParkQuery {
            fenced: true,
            water: true,
            ..ParkQuery::default()
        };
        assert_eq!(
            slugs(&filter_parks(catalog::all(), &query)),
            vec!["granville-park"]
        );

        let none = ParkQuery {
            fenced: true,
            max_distance_km: 1.0,
            ..ParkQuery::default()
        };
        assert!(filter_parks(catalog::all(), &none).is_empty());
    }

    #[test]
    fn unparseable_distance_counts_as_zero() {
        assert_eq!(parse_leading_distance(Some("2.3 km")), 2.3);
        assert_eq!(parse_leading_distance(Some("about 2 km")), 0.0);
        assert_eq!(parse_leading_distance(Some("")), 0.0);
        assert_eq!(parse_leading_distance(None), 0.0);
    }

    #[test]
    fn distance_unit_may_be_glued_to_the_number() {
        assert_eq!(parse_leading_distance(Some("2.3km")), 2.3);
        assert_eq!(parse_leading_distance(Some("  12km away")), 12.0);
        assert_eq!(parse_leading_distance(Some("1.5.2 km")), 1.5);
        assert_eq!(parse_leading_distance(Some("km")), 0.0);
        assert_eq!(parse_leading_distance(Some("~3km")), 0.0);
    }

    #[test]
    fn sort_key_roundtrip_and_unknown() {
        for key in SortKey::all() {
            assert_eq!(SortKey::try_from(key.as_str()).expect("roundtrip"), *key);
        }
        let err = SortKey::try_from("popularity").unwrap_err();
        assert!(err.to_string().contains("Unknown sort key"));
    }
}
