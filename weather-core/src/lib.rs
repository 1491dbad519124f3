//! Core library for the `weather` app.
//!
//! This crate defines:
//! - The fetch client for the OpenWeather "current weather" endpoint
//! - Decoding of its JSON into a display-ready [`WeatherSnapshot`]
//! - A single-slot state cell observed by the presentation layer
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also back any other front end.

pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;
pub mod state;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use decode::decode;
pub use error::{DecodeError, FetchError, ValidationError, WeatherError};
pub use model::{WeatherQuery, WeatherSnapshot};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use service::WeatherService;
pub use state::{UpdatePolicy, WeatherCell, WeatherState};
