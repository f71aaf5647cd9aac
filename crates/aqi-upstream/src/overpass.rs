//! Overpass query counting mapped pollution sources in a bounding box.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use aqi_core::{BoundingBox, PollutionSources};

use crate::http::{send_json, trim_base};
use crate::ports::PollutionSourceLookup;
use crate::UpstreamError;

const SERVICE: &str = "overpass";

pub struct OverpassClient {
    client: Client,
    url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl OverpassClient {
    /// `url` is the full interpreter endpoint.
    pub fn new(client: Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: trim_base(url),
            timeout,
        }
    }
}

fn build_query(bbox: &BoundingBox, server_timeout_s: u64) -> String {
    let area = format!("{},{},{},{}", bbox.south, bbox.west, bbox.north, bbox.east);
    format!(
        "[out:json][timeout:{timeout}];\n(\n  way[\"highway\"~\"motorway|trunk|primary|secondary\"]({area});\n  way[\"landuse\"=\"industrial\"]({area});\n  node[\"power\"=\"plant\"]({area});\n  way[\"construction\"]({area});\n);\nout tags;\n",
        timeout = server_timeout_s,
        area = area
    )
}

fn count_elements(elements: &[OverpassElement]) -> PollutionSources {
    let mut counts = PollutionSources::default();
    for element in elements {
        let tags = &element.tags;
        if tags.contains_key("highway") {
            counts.transport += 1;
        }
        if tags.get("landuse").map(String::as_str) == Some("industrial") {
            counts.industry += 1;
        }
        if tags.get("power").map(String::as_str) == Some("plant") {
            counts.power += 1;
        }
        if tags.contains_key("construction") {
            counts.construction += 1;
        }
    }
    counts
}

#[async_trait]
impl PollutionSourceLookup for OverpassClient {
    async fn count_sources(&self, bbox: BoundingBox) -> Result<PollutionSources, UpstreamError> {
        let query = build_query(&bbox, self.timeout.as_secs().max(1) * 2);
        let request = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(query)
            .timeout(self.timeout);
        let response: OverpassResponse = send_json(SERVICE, request).await?;
        let counts = count_elements(&response.elements);
        tracing::debug!(
            "Overpass returned {} elements for bbox {:?}",
            response.elements.len(),
            bbox
        );
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(pairs: &[(&str, &str)]) -> OverpassElement {
        OverpassElement {
            tags: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn counts_each_tag_family() {
        let elements = vec![
            element(&[("highway", "primary")]),
            element(&[("highway", "trunk"), ("construction", "yes")]),
            element(&[("landuse", "industrial")]),
            element(&[("landuse", "residential")]),
            element(&[("power", "plant")]),
            element(&[]),
        ];
        let counts = count_elements(&elements);
        assert_eq!(
            counts,
            PollutionSources {
                transport: 2,
                industry: 1,
                power: 1,
                construction: 1,
            }
        );
    }

    #[test]
    fn query_uses_overpass_bbox_order() {
        let bbox = BoundingBox {
            south: 1.0,
            north: 2.0,
            west: 3.0,
            east: 4.0,
        };
        let query = build_query(&bbox, 60);
        assert!(query.starts_with("[out:json][timeout:60];"));
        assert!(query.contains("node[\"power\"=\"plant\"](1,3,2,4);"));
    }
}
