//! Server configuration from environment.

use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
    pub user_agent: String,

    pub geocoder_url: String,
    /// Comma-separated ISO codes restricting geocoder matches (e.g. `in`).
    pub geocoder_country_codes: Option<String>,
    pub routing_url: String,
    pub aqi_url: String,
    pub aqi_token: String,
    pub reverse_geocoder_url: String,
    pub overpass_url: String,

    pub geocoder_timeout_s: u64,
    pub routing_timeout_s: u64,
    pub aqi_timeout_s: u64,
    pub reverse_geocoder_timeout_s: u64,
    pub overpass_timeout_s: u64,
    pub connect_timeout_s: u64,

    pub route_cache_ttl_s: u64,
    pub point_cache_ttl_s: u64,
    pub cache_sweep_interval_s: u64,
    /// 0 disables the capacity bound.
    pub cache_max_entries: usize,
    /// Decimal places kept in `aqi:`/`rev:` cache keys.
    pub coord_precision: usize,

    /// Concurrent point lookups per route.
    pub enrich_concurrency: usize,
    /// Point lookups in flight across all requests.
    pub upstream_max_in_flight: usize,
    pub sample_include_final_point: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            log_json: false,
            user_agent: format!("aqi-route-server/{}", env!("CARGO_PKG_VERSION")),
            geocoder_url: "https://nominatim.openstreetmap.org".to_string(),
            geocoder_country_codes: None,
            routing_url: "https://router.project-osrm.org".to_string(),
            aqi_url: "https://api.waqi.info".to_string(),
            aqi_token: "demo".to_string(),
            reverse_geocoder_url: "https://api.bigdatacloud.net".to_string(),
            overpass_url: "https://overpass-api.de/api/interpreter".to_string(),
            geocoder_timeout_s: 10,
            routing_timeout_s: 15,
            aqi_timeout_s: 8,
            reverse_geocoder_timeout_s: 10,
            overpass_timeout_s: 30,
            connect_timeout_s: 5,
            route_cache_ttl_s: 600,
            point_cache_ttl_s: 600,
            cache_sweep_interval_s: 120,
            cache_max_entries: 50_000,
            coord_precision: 4,
            enrich_concurrency: 8,
            upstream_max_in_flight: 32,
            sample_include_final_point: false,
        }
    }
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn string(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
}

fn flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            server_port: parsed("AQI_ROUTE_PORT", d.server_port),
            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(d.log_json),
            user_agent: string("GEOCODER_USER_AGENT", d.user_agent),
            geocoder_url: string("GEOCODER_URL", d.geocoder_url),
            geocoder_country_codes: env::var("GEOCODER_COUNTRY_CODES")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            routing_url: string("OSRM_URL", d.routing_url),
            aqi_url: string("WAQI_URL", d.aqi_url),
            aqi_token: string("WAQI_TOKEN", d.aqi_token),
            reverse_geocoder_url: string("REVERSE_GEOCODER_URL", d.reverse_geocoder_url),
            overpass_url: string("OVERPASS_URL", d.overpass_url),
            geocoder_timeout_s: parsed("GEOCODER_TIMEOUT_S", d.geocoder_timeout_s),
            routing_timeout_s: parsed("ROUTING_TIMEOUT_S", d.routing_timeout_s),
            aqi_timeout_s: parsed("AQI_TIMEOUT_S", d.aqi_timeout_s),
            reverse_geocoder_timeout_s: parsed(
                "REVERSE_GEOCODER_TIMEOUT_S",
                d.reverse_geocoder_timeout_s,
            ),
            overpass_timeout_s: parsed("OVERPASS_TIMEOUT_S", d.overpass_timeout_s),
            connect_timeout_s: parsed("CONNECT_TIMEOUT_S", d.connect_timeout_s),
            route_cache_ttl_s: parsed("ROUTE_CACHE_TTL_S", d.route_cache_ttl_s),
            point_cache_ttl_s: parsed("POINT_CACHE_TTL_S", d.point_cache_ttl_s),
            cache_sweep_interval_s: parsed("CACHE_SWEEP_INTERVAL_S", d.cache_sweep_interval_s),
            cache_max_entries: parsed("CACHE_MAX_ENTRIES", d.cache_max_entries),
            coord_precision: parsed("COORD_PRECISION", d.coord_precision).min(10),
            enrich_concurrency: parsed("ENRICH_CONCURRENCY", d.enrich_concurrency).max(1),
            upstream_max_in_flight: parsed("UPSTREAM_MAX_IN_FLIGHT", d.upstream_max_in_flight)
                .max(1),
            sample_include_final_point: flag(
                "SAMPLE_INCLUDE_FINAL_POINT",
                d.sample_include_final_point,
            ),
        }
    }
}
