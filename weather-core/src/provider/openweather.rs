use anyhow::Context;
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, Url};
use tracing::debug;

use crate::{
    WeatherQuery,
    config::{Config, DEFAULT_BASE_URL},
    error::FetchError,
};

use super::WeatherProvider;

/// Everything except RFC 3986 unreserved characters. Space becomes `%20`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_BASE_URL, Client::new())
    }

    pub fn with_endpoint(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        http: Client,
    ) -> Self {
        Self { api_key: api_key.into(), base_url: base_url.into(), http }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?;
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_endpoint(api_key, config.base_url.clone(), http))
    }

    /// `{base_url}?q={city}&appid={key}&units=metric`, every value percent-encoded.
    pub fn request_url(&self, query: &WeatherQuery) -> Result<Url, FetchError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|_| FetchError::InvalidUrl(self.base_url.clone()))?;

        let params = [("q", query.city()), ("appid", self.api_key.as_str()), ("units", "metric")];
        let encoded = params
            .iter()
            .map(|(k, v)| format!("{k}={}", utf8_percent_encode(v, QUERY_VALUE)))
            .collect::<Vec<_>>()
            .join("&");

        url.set_query(Some(&encoded));
        Ok(url)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, query: &WeatherQuery) -> Result<Vec<u8>, FetchError> {
        let url = self.request_url(query)?;
        debug!(city = query.city(), "Requesting current weather from OpenWeather");

        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.bytes().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&String::from_utf8_lossy(&body)),
            });
        }

        debug!(city = query.city(), bytes = body.len(), "Received OpenWeather response");
        Ok(body.to_vec())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
