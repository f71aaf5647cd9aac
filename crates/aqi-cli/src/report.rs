//! Decoding and printing of `/v1/routes` responses.

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::fmt::Write;

use aqi_core::{RouteResponse, Zone};

/// Unwrap the `{ success, ... }` envelope into a typed response.
pub fn parse_envelope(body: Value) -> Result<RouteResponse> {
    if body.get("success").and_then(Value::as_bool) != Some(true) {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request failed");
        return Err(anyhow!("server error: {}", message));
    }
    Ok(serde_json::from_value(body)?)
}

pub fn render_summary(response: &RouteResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({:.4}, {:.4}) -> {} ({:.4}, {:.4})",
        response.origin.name,
        response.origin.coordinate.lat,
        response.origin.coordinate.lon,
        response.destination.name,
        response.destination.coordinate.lat,
        response.destination.coordinate.lon,
    );
    for route in &response.routes {
        let aqi = route
            .avg_aqi
            .map(|a| a.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        let high = route
            .segments
            .iter()
            .filter(|s| s.zone == Zone::High)
            .count();
        let _ = writeln!(
            out,
            "  {}: {}, {}, avg AQI {}, {:?} traffic ({:.1} km/h), {}/{} high-risk samples",
            route.name,
            route.distance,
            route.duration,
            aqi,
            route.traffic,
            route.avg_speed_kmph,
            high,
            route.segments.len(),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> Value {
        json!({
            "success": true,
            "origin": { "name": "Delhi", "lat": 28.6139, "lon": 77.209 },
            "destination": { "name": "Agra", "lat": 27.1767, "lon": 78.0081 },
            "generatedAt": "2026-10-15T08:00:00Z",
            "routes": [{
                "id": 0,
                "name": "Route 1",
                "distanceKm": 233.1,
                "durationMin": 220.5,
                "distance": "233.1 km",
                "duration": "221 min",
                "avgAqi": 180,
                "traffic": "Light",
                "avgSpeedKmph": 63.4,
                "segments": [
                    { "lat": 28.6, "lon": 77.2, "aqi": 240, "zone": "High", "category": "veryUnhealthy", "area": "New Delhi" },
                    { "lat": 27.2, "lon": 78.0, "aqi": null, "zone": "Unknown", "category": "unknown", "area": "Along Route" }
                ],
                "geometry": [{ "lat": 28.6, "lon": 77.2 }, { "lat": 27.2, "lon": 78.0 }]
            }]
        })
    }

    #[test]
    fn summary_lists_each_route() {
        let response = parse_envelope(body()).unwrap();
        let text = render_summary(&response);
        assert!(text.starts_with("Delhi (28.6139, 77.2090) -> Agra"));
        assert!(text.contains(
            "Route 1: 233.1 km, 221 min, avg AQI 180, Light traffic (63.4 km/h), 1/2 high-risk samples"
        ));
    }

    #[test]
    fn failure_envelope_becomes_error() {
        let err = parse_envelope(json!({ "success": false, "message": "city not found: Atlantis" }))
            .unwrap_err();
        assert_eq!(err.to_string(), "server error: city not found: Atlantis");
    }
}
