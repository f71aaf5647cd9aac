//! Core data models for route exposure responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{AqiCategory, Traffic, Zone};
use crate::error::CoreError;

/// Placeholder area label used when no place name can be resolved.
pub const AREA_PLACEHOLDER: &str = "Along Route";

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a validated coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(lat: f64, lon: f64) -> Result<Self, CoreError> {
        let coordinate = Self { lat, lon };
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(CoreError::InvalidCoordinate { lat, lon })
        }
    }

    /// Build from a GeoJSON `[lon, lat]` pair.
    pub fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[1],
            lon: pair[0],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// `lat,lon` rounded to `precision` decimals. Nearby points share a key.
    pub fn key(&self, precision: usize) -> String {
        format!("{:.*},{:.*}", precision, self.lat, precision, self.lon)
    }
}

/// A geocoded city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

/// One sampled point along a route annotated with pollution and place name.
///
/// Build with [`PollutionSegment::new`] so `zone` and `category` always
/// follow from `aqi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionSegment {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub aqi: Option<u32>,
    pub zone: Zone,
    pub category: AqiCategory,
    pub area: String,
}

impl PollutionSegment {
    pub fn new(coordinate: Coordinate, aqi: Option<u32>, area: impl Into<String>) -> Self {
        Self {
            coordinate,
            aqi,
            zone: Zone::from_aqi(aqi),
            category: AqiCategory::from_aqi(aqi),
            area: area.into(),
        }
    }
}

/// One enriched candidate route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCandidate {
    /// Position in the routing engine's response.
    pub id: usize,
    pub name: String,
    pub distance_km: f64,
    pub duration_min: f64,
    /// Display form, e.g. `"12.3 km"`.
    pub distance: String,
    /// Display form, e.g. `"45 min"`.
    pub duration: String,
    pub avg_aqi: Option<u32>,
    pub traffic: Traffic,
    pub avg_speed_kmph: f64,
    pub segments: Vec<PollutionSegment>,
    pub geometry: Vec<Coordinate>,
}

/// Full answer for an origin/destination pair. This is the unit stored in the
/// response cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub origin: Place,
    pub destination: Place,
    pub routes: Vec<RouteCandidate>,
    pub generated_at: DateTime<Utc>,
}

/// One alternative returned by the routing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineRoute {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// GeoJSON order: `[lon, lat]`.
    pub geometry: Vec<[f64; 2]>,
}

impl EngineRoute {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.geometry
            .iter()
            .copied()
            .map(Coordinate::from_lon_lat)
            .collect()
    }
}

/// Candidate place-name fields from a reverse geocoder, most specific first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceFields {
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub principal_subdivision: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
}

impl PlaceFields {
    /// First non-blank field in precedence order locality, city, subdivision, country.
    pub fn label(&self) -> Option<&str> {
        [
            &self.locality,
            &self.city,
            &self.principal_subdivision,
            &self.country_name,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
    }
}

/// `[south, north, west, east]` in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn from_slice(values: &[f64]) -> Result<Self, CoreError> {
        match values {
            [south, north, west, east] => Ok(Self {
                south: *south,
                north: *north,
                west: *west,
                east: *east,
            }),
            _ => Err(CoreError::InvalidBoundingBox(values.len())),
        }
    }
}

/// Counts of mapped pollution sources inside a bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollutionSources {
    pub transport: u32,
    pub industry: u32,
    pub power: u32,
    pub construction: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_key_rounds_to_precision() {
        let a = Coordinate::new(28.600_01, 77.200_04);
        let b = Coordinate::new(28.599_99, 77.199_96);
        assert_eq!(a.key(4), "28.6000,77.2000");
        assert_eq!(a.key(4), b.key(4));
        assert_ne!(a.key(5), b.key(5));
    }

    #[test]
    fn coordinate_from_geojson_pair_swaps_axes() {
        let c = Coordinate::from_lon_lat([77.2, 28.6]);
        assert_eq!(c.lat, 28.6);
        assert_eq!(c.lon, 77.2);
    }

    #[test]
    fn try_new_rejects_out_of_range() {
        assert!(Coordinate::try_new(91.0, 0.0).is_err());
        assert!(Coordinate::try_new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::try_new(28.6, 77.2).is_ok());
    }

    #[test]
    fn place_fields_follow_precedence() {
        let fields = PlaceFields {
            locality: Some("  ".into()),
            city: None,
            principal_subdivision: Some("Haryana".into()),
            country_name: Some("India".into()),
        };
        assert_eq!(fields.label(), Some("Haryana"));
        assert_eq!(PlaceFields::default().label(), None);
    }

    #[test]
    fn segment_serializes_flat_with_null_aqi() {
        let segment = PollutionSegment::new(Coordinate::new(1.0, 2.0), None, AREA_PLACEHOLDER);
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["lat"], 1.0);
        assert_eq!(json["lon"], 2.0);
        assert!(json["aqi"].is_null());
        assert_eq!(json["zone"], "Unknown");
        assert_eq!(json["category"], "unknown");
    }

    #[test]
    fn bounding_box_requires_four_values() {
        assert!(BoundingBox::from_slice(&[1.0, 2.0, 3.0]).is_err());
        let bbox = BoundingBox::from_slice(&[28.4, 28.9, 76.8, 77.4]).unwrap();
        assert_eq!(bbox.north, 28.9);
        assert_eq!(bbox.west, 76.8);
    }
}
