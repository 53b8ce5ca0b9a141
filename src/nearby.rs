//! The nearby-places pipeline: fetch, categorize, rank.

use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;

use crate::{
    category::{self, CATEGORIES},
    geo::GeoLocation,
    overpass::{OverpassClient, OverpassElement},
    prelude::*,
};

/// A named, categorized, distance-annotated place.
#[must_use]
#[derive(Debug, Serialize)]
pub struct Place {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: &'static str,
    pub category_icon: &'static str,
    pub distance_km: f64,
    pub tags: HashMap<String, String>,
}

#[must_use]
#[derive(Clone)]
pub struct NearbySearch {
    overpass: OverpassClient,
}

impl NearbySearch {
    pub const fn new(overpass: OverpassClient) -> Self {
        Self { overpass }
    }

    /// Query all the configured categories around the center and return the
    /// ranked places.
    ///
    /// The result is recomputed wholesale on every call: there is no cache
    /// and no partial merging with earlier results.
    #[instrument(skip_all)]
    pub async fn search(&self, center: GeoLocation, radius_km: f64) -> Result<Vec<Place>> {
        let filters = CATEGORIES.iter().flat_map(|rule| rule.filters.iter().copied());
        let response = self.overpass.query_around(center, radius_km, filters).await?;
        let places = rank(center, response.elements);
        info!(n_places = places.len(), "📍 Ranked nearby places");
        Ok(places)
    }
}

/// Turn raw records into the ranked place list.
///
/// Unnamed records are dropped, the rest are categorized and annotated with
/// the distance to the center, sorted by it ascending, and de-duplicated by
/// name keeping the nearest instance.
pub fn rank(center: GeoLocation, elements: Vec<OverpassElement>) -> Vec<Place> {
    elements
        .into_iter()
        .filter_map(|element| {
            let name = element.name()?.to_string();
            let rule = category::match_category(&element.tags);
            Some(Place {
                id: element.id,
                name,
                latitude: element.lat,
                longitude: element.lon,
                category: rule.id,
                category_icon: rule.icon,
                distance_km: center.distance_km(element.location()),
                tags: element.tags,
            })
        })
        .sorted_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
        .unique_by(|place| place.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KATHMANDU: GeoLocation = GeoLocation { latitude: 27.7172, longitude: 85.3240 };

    fn element(id: i64, lat: f64, lon: f64, pairs: &[(&str, &str)]) -> OverpassElement {
        let tags: HashMap<_, _> =
            pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect();
        OverpassElement { id, lat, lon, tags }
    }

    #[test]
    fn unnamed_records_are_dropped() {
        let places =
            rank(KATHMANDU, vec![element(1, 27.72, 85.32, &[("amenity", "hospital")])]);
        assert!(places.is_empty());
    }

    #[test]
    fn hospital_scenario_ok() {
        let places = rank(KATHMANDU, vec![element(
            1,
            KATHMANDU.latitude + 0.01,
            KATHMANDU.longitude,
            &[("amenity", "hospital"), ("name", "Bir Hospital")],
        )]);
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].category, "hospitals");
        assert_eq!(places[0].category_icon, "🏥");
        assert!((1.0..=1.3).contains(&places[0].distance_km));
    }

    #[test]
    fn places_are_sorted_by_distance() {
        let places = rank(KATHMANDU, vec![
            element(1, 27.76, 85.32, &[("amenity", "cafe"), ("name", "Far Cafe")]),
            element(2, 27.72, 85.32, &[("amenity", "cafe"), ("name", "Near Cafe")]),
            element(3, 27.74, 85.32, &[("amenity", "cafe"), ("name", "Mid Cafe")]),
        ]);
        let names: Vec<_> = places.iter().map(|place| place.name.as_str()).collect();
        assert_eq!(names, &["Near Cafe", "Mid Cafe", "Far Cafe"]);
        for pair in places.windows(2) {
            assert!(pair[0].distance_km <= pair[1].distance_km);
        }
    }

    #[test]
    fn duplicate_names_keep_the_nearest() {
        let places = rank(KATHMANDU, vec![
            element(1, 27.75, 85.32, &[("amenity", "cafe"), ("name", "Himalayan Java")]),
            element(2, 27.72, 85.32, &[("amenity", "cafe"), ("name", "Himalayan Java")]),
        ]);
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].id, 2);
    }

    #[test]
    fn every_place_gets_a_configured_category() {
        let places = rank(KATHMANDU, vec![
            element(1, 27.72, 85.32, &[("tourism", "gallery"), ("name", "Gallery")]),
            element(2, 27.72, 85.33, &[("highway", "bus_stop"), ("name", "Stop")]),
        ]);
        for place in &places {
            assert!(category::find(place.category).is_some());
        }
    }
}
