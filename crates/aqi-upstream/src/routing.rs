//! OSRM driving-route client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use aqi_core::{Coordinate, EngineRoute};

use crate::http::trim_base;
use crate::ports::RoutingEngine;
use crate::UpstreamError;

const SERVICE: &str = "routing engine";

pub struct OsrmClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

impl OsrmClient {
    pub fn new(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            timeout,
        }
    }

    fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson&alternatives=true",
            self.base_url, origin.lon, origin.lat, destination.lon, destination.lat
        )
    }
}

fn into_engine_routes(payload: OsrmResponse) -> Result<Vec<EngineRoute>, UpstreamError> {
    match payload.code.as_str() {
        "Ok" => {}
        "NoRoute" | "NoSegment" => return Err(UpstreamError::NoRoute),
        other => {
            let message = payload
                .message
                .map(|m| format!("{}: {}", other, m))
                .unwrap_or_else(|| other.to_string());
            return Err(UpstreamError::payload(SERVICE, message));
        }
    }

    if payload.routes.is_empty() {
        return Err(UpstreamError::NoRoute);
    }

    Ok(payload
        .routes
        .into_iter()
        .map(|route| EngineRoute {
            distance_meters: route.distance,
            duration_seconds: route.duration,
            geometry: route.geometry.coordinates,
        })
        .collect())
}

#[async_trait]
impl RoutingEngine for OsrmClient {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<EngineRoute>, UpstreamError> {
        let response = self
            .client
            .get(self.route_url(origin, destination))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| UpstreamError::from_reqwest(SERVICE, err))?;

        let status = response.status();
        // OSRM reports NoRoute with a 4xx status and a JSON body.
        let payload: OsrmResponse = match response.json().await {
            Ok(payload) => payload,
            Err(_) if !status.is_success() => {
                return Err(UpstreamError::Status {
                    service: SERVICE,
                    status: status.as_u16(),
                })
            }
            Err(err) => return Err(UpstreamError::from_reqwest(SERVICE, err)),
        };

        let routes = into_engine_routes(payload)?;
        tracing::debug!("Routing engine returned {} alternative(s)", routes.len());
        Ok(routes)
    }
}
