use async_trait::async_trait;
use std::fmt::Debug;

use crate::{WeatherQuery, error::FetchError};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of raw "current weather" bodies for a city.
///
/// One call is one attempt: implementations must not retry.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, query: &WeatherQuery) -> Result<Vec<u8>, FetchError>;
}
