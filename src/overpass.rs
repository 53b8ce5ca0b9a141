//! Overpass API client.

use std::{collections::HashMap, fmt::Write, time::Duration};

use reqwest_middleware::ClientWithMiddleware;

use crate::{category::TagFilter, geo::GeoLocation, prelude::*};

const INTERPRETER_URL: &str = "https://overpass-api.de/api/interpreter";

/// Overpass queries may legitimately take longer than regular API calls.
const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

#[must_use]
#[derive(Clone)]
pub struct OverpassClient(pub ClientWithMiddleware);

impl OverpassClient {
    /// Run a composite around-point query for all the given tag filters.
    #[instrument(skip_all, fields(radius_km = radius_km))]
    pub async fn query_around(
        &self,
        center: GeoLocation,
        radius_km: f64,
        filters: impl IntoIterator<Item = TagFilter>,
    ) -> Result<OverpassResponse> {
        let query = build_query(center, radius_km, filters);
        info!(%center.latitude, %center.longitude, radius_km, "🗺️ Querying Overpass…");
        self.0
            .post(INTERPRETER_URL)
            .timeout(QUERY_TIMEOUT)
            .body(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("failed to deserialize the Overpass response")
    }
}

/// Build one Overpass QL query bundling a `node["k"="v"](around:…)` clause
/// per filter, so all the categories cost a single round-trip.
fn build_query(
    center: GeoLocation,
    radius_km: f64,
    filters: impl IntoIterator<Item = TagFilter>,
) -> String {
    let radius_meters = radius_km * 1000.0;
    let mut query = String::from("[out:json][timeout:25];\n(\n");
    for filter in filters {
        writeln!(
            query,
            "  node[\"{}\"=\"{}\"](around:{radius_meters},{},{});",
            filter.key, filter.value, center.latitude, center.longitude,
        )
        .unwrap();
    }
    query.push_str(");\nout body;");
    query
}

#[must_use]
#[derive(serde::Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<OverpassElement>,
}

/// A raw tagged point record, owned by the Overpass response.
#[must_use]
#[derive(serde::Deserialize)]
pub struct OverpassElement {
    pub id: i64,

    pub lat: f64,

    pub lon: f64,

    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl OverpassElement {
    #[must_use]
    pub fn location(&self) -> GeoLocation {
        GeoLocation { latitude: self.lat, longitude: self.lon }
    }

    /// The `name` tag, if any. Unnamed records are dropped by the pipeline.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.tags.get("name").map(String::as_str)
    }
}
