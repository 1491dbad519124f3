//! Response decoder: OpenWeather "current weather" JSON into a [`WeatherSnapshot`].

use serde::Deserialize;

use crate::{error::DecodeError, model::WeatherSnapshot};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMain {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawWeather {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawWind {
    pub speed: f64,
    pub deg: f64,
}

/// Wire shape of the payload. Only the first `weather` entry is ever used.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawWeatherPayload {
    pub main: RawMain,
    pub weather: Vec<RawWeather>,
    pub wind: RawWind,
}

impl From<RawWeatherPayload> for WeatherSnapshot {
    fn from(raw: RawWeatherPayload) -> Self {
        let description = raw
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .unwrap_or_else(|| "Unknown".to_string());

        WeatherSnapshot {
            temperature_c: raw.main.temp,
            description,
            wind_speed_mps: raw.wind.speed,
            wind_direction: format_wind_direction(raw.wind.deg),
            humidity_pct: raw.main.humidity,
        }
    }
}

/// Parse `bytes` and project them onto a snapshot. All or nothing.
pub fn decode(bytes: &[u8]) -> Result<WeatherSnapshot, DecodeError> {
    let raw: RawWeatherPayload = serde_json::from_slice(bytes)?;
    Ok(raw.into())
}

/// Whole degrees keep one decimal (`270.0°`); anything else uses the shortest
/// representation that round-trips (`22.5°`).
pub fn format_wind_direction(deg: f64) -> String {
    if deg.is_finite() && deg.fract() == 0.0 {
        format!("{deg:.1}°")
    } else {
        format!("{deg}°")
    }
}
