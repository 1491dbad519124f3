use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// City name for a single lookup, trimmed and known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    city: String,
}

impl WeatherQuery {
    pub fn new(city: impl AsRef<str>) -> Result<Self, ValidationError> {
        let city = city.as_ref().trim();
        if city.is_empty() {
            return Err(ValidationError::EmptyCity);
        }

        Ok(Self { city: city.to_owned() })
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

/// A fully populated reading, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Degrees Celsius.
    #[serde(rename = "temperature")]
    pub temperature_c: f64,
    #[serde(rename = "weatherDescription")]
    pub description: String,
    /// Metres per second.
    #[serde(rename = "windSpeed")]
    pub wind_speed_mps: f64,
    /// Raw degrees with a `°` suffix, e.g. `"270.0°"`.
    pub wind_direction: String,
    #[serde(rename = "humidity")]
    pub humidity_pct: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_trims_city() {
        let q = WeatherQuery::new("  New York\t").expect("valid city");
        assert_eq!(q.city(), "New York");
    }

    #[test]
    fn query_rejects_blank_city() {
        assert_eq!(WeatherQuery::new(""), Err(ValidationError::EmptyCity));
        assert_eq!(WeatherQuery::new("   \n"), Err(ValidationError::EmptyCity));
    }

    #[test]
    fn snapshot_serializes_with_presentation_names() {
        let snapshot = WeatherSnapshot {
            temperature_c: 21.5,
            description: "clear sky".into(),
            wind_speed_mps: 3.6,
            wind_direction: "270.0°".into(),
            humidity_pct: 40,
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["temperature"], 21.5);
        assert_eq!(json["weatherDescription"], "clear sky");
        assert_eq!(json["windSpeed"], 3.6);
        assert_eq!(json["windDirection"], "270.0°");
        assert_eq!(json["humidity"], 40);
    }
}
