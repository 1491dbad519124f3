//! Refresh pipeline: validate → fetch → decode → publish.

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    config::Config,
    decode::decode,
    error::WeatherError,
    model::{WeatherQuery, WeatherSnapshot},
    provider::{OpenWeatherProvider, WeatherProvider},
    state::{UpdatePolicy, WeatherCell, WeatherState},
};

/// Owns the provider and the state cell. Cheap to clone; clones share both.
#[derive(Debug, Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    cell: Arc<WeatherCell>,
    surface_errors: bool,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>, policy: UpdatePolicy) -> Self {
        Self { provider, cell: Arc::new(WeatherCell::new(policy)), surface_errors: false }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = OpenWeatherProvider::from_config(config)?;
        let policy = if config.supersede_stale {
            UpdatePolicy::LatestRequestWins
        } else {
            UpdatePolicy::LastWriteWins
        };

        Ok(Self::new(Arc::new(provider), policy).with_surface_errors(config.surface_errors))
    }

    /// When set, failures are written into the cell as [`WeatherState::Failed`]
    /// instead of leaving the previous state in place.
    pub fn with_surface_errors(mut self, surface: bool) -> Self {
        self.surface_errors = surface;
        self
    }

    pub fn current(&self) -> WeatherState {
        self.cell.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<WeatherState> {
        self.cell.subscribe()
    }

    /// Run one refresh for `city`. The outcome is published to the cell and
    /// also returned, so callers can react to failures directly.
    pub async fn refresh(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let query = match WeatherQuery::new(city) {
            Ok(query) => query,
            Err(err) => {
                warn!(city, error = %err, "Rejected weather query");
                return Err(err.into());
            }
        };

        let ticket = self.cell.begin();

        match self.fetch_snapshot(&query).await {
            Ok(snapshot) => {
                if self.cell.publish(ticket, snapshot.clone()) {
                    debug!(city = query.city(), ?ticket, "Published weather snapshot");
                }
                Ok(snapshot)
            }
            Err(err) => {
                warn!(city = query.city(), error = %err, "Weather refresh failed");
                if self.surface_errors {
                    self.cell.fail(ticket, err.to_string());
                }
                Err(err)
            }
        }
    }

    /// Same as [`refresh`](Self::refresh), on a background task. Not cancellable.
    pub fn spawn_refresh(
        &self,
        city: impl Into<String>,
    ) -> JoinHandle<Result<WeatherSnapshot, WeatherError>> {
        let service = self.clone();
        let city = city.into();
        tokio::spawn(async move { service.refresh(&city).await })
    }

    async fn fetch_snapshot(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, WeatherError> {
        let bytes = self.provider.fetch(query).await?;
        Ok(decode(&bytes)?)
    }
}
