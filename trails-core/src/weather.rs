//! The weather entry point used by the rest of the app.
//!
//! [`WeatherFetcher::fetch`] never returns an error: preview hosts get synthetic
//! data without touching the network, and every live failure degrades to it.

use tracing::{info, warn};

use crate::{
    Config,
    config::is_preview_host,
    model::{Coordinates, WeatherRequest, WeatherSnapshot},
    provider::{WeatherProvider, default_provider_from_config, mock::mock_snapshot},
};

#[derive(Debug)]
pub struct WeatherFetcher {
    live: Box<dyn WeatherProvider>,
    host: Option<String>,
    preview_hosts: Vec<String>,
}

impl WeatherFetcher {
    pub fn new(live: Box<dyn WeatherProvider>) -> Self {
        Self {
            live,
            host: None,
            preview_hosts: crate::config::DEFAULT_PREVIEW_HOSTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let live = default_provider_from_config(config)?;
        Ok(Self {
            host: config.host.clone(),
            preview_hosts: config.preview_hosts.clone(),
            ..Self::new(live)
        })
    }

    /// Hostname the app is running under, for preview detection.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn is_preview(&self) -> bool {
        self.host.as_deref().is_some_and(|h| is_preview_host(h, &self.preview_hosts))
    }

    /// Weather at `coordinates` (Sydney when `None`).
    pub async fn fetch(&self, coordinates: Option<Coordinates>) -> WeatherSnapshot {
        let request = WeatherRequest::new(coordinates.unwrap_or_default());
        self.fetch_request(&request).await
    }

    pub async fn fetch_request(&self, request: &WeatherRequest) -> WeatherSnapshot {
        if self.is_preview() {
            info!(host = ?self.host, "using mock weather data for preview environment");
            return self.mock(request);
        }

        match self.live.get_weather(request).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(
                    error = %format!("{err:#}"),
                    "error fetching weather data, using mock data as fallback"
                );
                self.mock(request)
            }
        }
    }

    fn mock(&self, request: &WeatherRequest) -> WeatherSnapshot {
        mock_snapshot(request.coordinates, request.now, &mut rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::SnapshotSource, provider::mock::MockProvider};
    use async_trait::async_trait;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug, Default)]
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl WeatherProvider for CountingProvider {
        async fn get_weather(&self, request: &WeatherRequest) -> anyhow::Result<WeatherSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("Open-Meteo request failed with status 503 Service Unavailable");
            }
            let mut snapshot = MockProvider::new().get_weather(request).await?;
            snapshot.source = SnapshotSource::Live;
            Ok(snapshot)
        }
    }

    fn fetcher(fail: bool) -> (WeatherFetcher, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CountingProvider {
            calls: calls.clone(),
            fail,
        };
        (WeatherFetcher::new(Box::new(provider)), calls)
    }

    #[tokio::test]
    async fn preview_host_never_hits_the_network() {
        for host in ["localhost", "abc.vusercontent.net", "x.v0.dev", "127.0.0.1"] {
            let (fetcher, calls) = fetcher(false);
            let fetcher = fetcher.with_host(host);

            let snap = fetcher.fetch(None).await;
            assert_eq!(snap.source, SnapshotSource::Mock);
            assert_eq!(snap.location, Coordinates::SYDNEY);
            assert_eq!(
                calls.load(Ordering::SeqCst),
                0,
                "{host} should be a preview host"
            );
        }
    }

    #[tokio::test]
    async fn live_result_is_returned_on_success() {
        let (fetcher, calls) = fetcher(false);
        let snap = fetcher.with_host("tailtrails.com.au").fetch(None).await;

        assert_eq!(snap.source, SnapshotSource::Live);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_degrade_to_mock_data() {
        let (fetcher, calls) = fetcher(true);
        let coords = Coordinates::new(-33.8067, 150.9878);
        let snap = fetcher.fetch(Some(coords)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(snap.is_mock());
        assert_eq!(snap.location, coords);
    }
}
