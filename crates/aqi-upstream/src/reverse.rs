//! BigDataCloud-compatible reverse geocoder.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use aqi_core::{Coordinate, PlaceFields};

use crate::http::{send_json, trim_base};
use crate::ports::ReverseGeocoder;
use crate::UpstreamError;

const SERVICE: &str = "reverse geocoder";

pub struct BigDataCloudClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl BigDataCloudClient {
    pub fn new(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            timeout,
        }
    }
}

#[async_trait]
impl ReverseGeocoder for BigDataCloudClient {
    async fn lookup(&self, at: Coordinate) -> Result<PlaceFields, UpstreamError> {
        let url = format!("{}/data/reverse-geocode-client", self.base_url);
        let request = self
            .client
            .get(url)
            .query(&[
                ("latitude", at.lat.to_string()),
                ("longitude", at.lon.to_string()),
                ("localityLanguage", "en".to_string()),
            ])
            .timeout(self.timeout);
        send_json(SERVICE, request).await
    }
}
