//! WAQI-compatible air-quality feed client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use aqi_core::Coordinate;

use crate::http::{send_json, trim_base};
use crate::ports::AqiLookup;
use crate::UpstreamError;

const SERVICE: &str = "aqi service";

pub struct WaqiClient {
    client: Client,
    base_url: String,
    token: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    status: String,
    #[serde(default)]
    data: Value,
}

impl WaqiClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            token: token.into(),
            timeout,
        }
    }
}

/// The feed reports `"-"` for stations without a current reading.
fn reading_from_feed(feed: FeedResponse) -> Result<Option<u32>, UpstreamError> {
    if feed.status != "ok" {
        let message = feed
            .data
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| format!("status {}", feed.status));
        return Err(UpstreamError::payload(SERVICE, message));
    }

    let reading = match feed.data.get("aqi") {
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u32),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    Ok(reading)
}

#[async_trait]
impl AqiLookup for WaqiClient {
    async fn lookup(&self, at: Coordinate) -> Result<Option<u32>, UpstreamError> {
        let url = format!("{}/feed/geo:{};{}/", self.base_url, at.lat, at.lon);
        let request = self
            .client
            .get(url)
            .query(&[("token", self.token.as_str())])
            .timeout(self.timeout);
        let feed: FeedResponse = send_json(SERVICE, request).await?;
        reading_from_feed(feed)
    }
}
