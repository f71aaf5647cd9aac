//! Nominatim-compatible forward geocoder.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use aqi_core::{Coordinate, Place};

use crate::http::{send_json, trim_base};
use crate::ports::Geocoder;
use crate::UpstreamError;

const SERVICE: &str = "geocoder";

pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    timeout: Duration,
    /// Comma-separated ISO country codes passed as `countrycodes`.
    country_codes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            timeout,
            country_codes: None,
        }
    }

    pub fn with_country_codes(mut self, codes: Option<String>) -> Self {
        self.country_codes = codes
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        self
    }
}

fn place_from_result(query: &str, result: SearchResult) -> Result<Place, UpstreamError> {
    let lat: f64 = result
        .lat
        .parse()
        .map_err(|_| UpstreamError::payload(SERVICE, format!("bad latitude {:?}", result.lat)))?;
    let lon: f64 = result
        .lon
        .parse()
        .map_err(|_| UpstreamError::payload(SERVICE, format!("bad longitude {:?}", result.lon)))?;
    let coordinate =
        Coordinate::try_new(lat, lon).map_err(|err| UpstreamError::payload(SERVICE, err.to_string()))?;

    let name = result
        .name
        .filter(|name| !name.trim().is_empty())
        .or_else(|| {
            result
                .display_name
                .as_deref()
                .and_then(|display| display.split(',').next())
                .map(|first| first.trim().to_string())
                .filter(|first| !first.is_empty())
        })
        .unwrap_or_else(|| query.trim().to_string());

    Ok(Place { name, coordinate })
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, city: &str) -> Result<Place, UpstreamError> {
        let url = format!("{}/search", self.base_url);
        let mut params = vec![
            ("q", city.to_string()),
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
        ];
        if let Some(codes) = &self.country_codes {
            params.push(("countrycodes", codes.clone()));
        }

        let request = self.client.get(url).query(&params).timeout(self.timeout);
        let results: Vec<SearchResult> = send_json(SERVICE, request).await?;

        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::NotFound(city.to_string()))?;
        let place = place_from_result(city, first)?;
        tracing::debug!(
            "Geocoded '{}' to ({:.5}, {:.5})",
            city,
            place.coordinate.lat,
            place.coordinate.lon
        );
        Ok(place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: Option<&str>, display: Option<&str>) -> SearchResult {
        SearchResult {
            lat: "28.6139".into(),
            lon: "77.2090".into(),
            name: name.map(str::to_string),
            display_name: display.map(str::to_string),
        }
    }

    #[test]
    fn prefers_name_field() {
        let place = place_from_result("delhi", result(Some("Delhi"), Some("Delhi, India"))).unwrap();
        assert_eq!(place.name, "Delhi");
        assert_eq!(place.coordinate, Coordinate::new(28.6139, 77.2090));
    }

    #[test]
    fn falls_back_to_display_name_then_query() {
        let place = place_from_result("agra", result(None, Some("Agra, Uttar Pradesh, India"))).unwrap();
        assert_eq!(place.name, "Agra");

        let place = place_from_result(" agra ", result(Some(" "), None)).unwrap();
        assert_eq!(place.name, "agra");
    }

    #[test]
    fn rejects_unparseable_coordinates() {
        let bad = SearchResult {
            lat: "north".into(),
            lon: "77.2".into(),
            name: None,
            display_name: None,
        };
        assert!(matches!(
            place_from_result("x", bad),
            Err(UpstreamError::Payload { .. })
        ));
    }
}
