//! Pure classifiers: AQI to risk zone and health category, speed to congestion.

use serde::{Deserialize, Serialize};

/// Discrete risk bucket along a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Low,
    Medium,
    High,
    Unknown,
}

impl Zone {
    pub fn from_aqi(aqi: Option<u32>) -> Self {
        match aqi {
            None => Zone::Unknown,
            Some(a) if a > 200 => Zone::High,
            Some(a) if a > 100 => Zone::Medium,
            Some(_) => Zone::Low,
        }
    }
}

/// Congestion estimate derived from average speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Traffic {
    Light,
    Moderate,
    Heavy,
}

impl Traffic {
    pub fn from_speed(avg_speed_kmph: f64) -> Self {
        if avg_speed_kmph < 15.0 {
            Traffic::Heavy
        } else if avg_speed_kmph < 30.0 {
            Traffic::Moderate
        } else {
            Traffic::Light
        }
    }
}

/// AQI health category, using the standard US EPA breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Unknown,
}

impl AqiCategory {
    pub fn from_aqi(aqi: Option<u32>) -> Self {
        match aqi {
            None => AqiCategory::Unknown,
            Some(0..=50) => AqiCategory::Good,
            Some(51..=100) => AqiCategory::Moderate,
            Some(101..=150) => AqiCategory::UnhealthySensitive,
            Some(151..=200) => AqiCategory::Unhealthy,
            Some(_) => AqiCategory::VeryUnhealthy,
        }
    }
}

/// `distance_km / (duration_sec / 3600)`; zero when the duration is not positive.
pub fn avg_speed_kmph(distance_km: f64, duration_sec: f64) -> f64 {
    if duration_sec.is_nan() || duration_sec <= 0.0 || !distance_km.is_finite() {
        return 0.0;
    }
    distance_km / (duration_sec / 3600.0)
}
