use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::Timelike;
use reqwest::{Client, header};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::model::{
    CurrentConditions, DailyOutlook, DurationUnit, SnapshotSource, WeatherRequest, WeatherSnapshot,
};

use super::WeatherProvider;

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const DAILY_FIELDS: &str =
    "uv_index_max,uv_index_clear_sky_max,sunrise,sunset,daylight_duration,sunshine_duration";
const HOURLY_FIELDS: &str = "temperature_2m,rain,showers,apparent_temperature,precipitation,\
                             cloud_cover_high,cloud_cover_mid,cloud_cover_low";
const MODEL: &str = "bom_access_global";
const TIMEZONE: &str = "Australia/Sydney";

/// Responses may be reused for an hour.
const CACHE_CONTROL: &str = "max-age=3600";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    base_url: String,
}

impl OpenMeteoProvider {
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::with_base_url(FORECAST_URL.to_string(), timeout)
    }

    /// Point the provider at another forecast endpoint (a proxy or a local stub).
    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for Open-Meteo")?;

        Ok(Self { http, base_url })
    }

    async fn fetch_forecast(&self, request: &WeatherRequest) -> Result<WeatherSnapshot> {
        let latitude = request.coordinates.latitude.to_string();
        let longitude = request.coordinates.longitude.to_string();

        let res = self
            .http
            .get(&self.base_url)
            .header(header::CACHE_CONTROL, CACHE_CONTROL)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("daily", DAILY_FIELDS),
                ("hourly", HOURLY_FIELDS),
                ("models", MODEL),
                ("timezone", TIMEZONE),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Open-Meteo response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        snapshot_from_body(&body, request)
    }
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    rain: Vec<Option<f64>>,
    #[serde(default)]
    showers: Vec<Option<f64>>,
    #[serde(default)]
    apparent_temperature: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default)]
    cloud_cover_high: Vec<Option<f64>>,
    #[serde(default)]
    cloud_cover_mid: Vec<Option<f64>>,
    #[serde(default)]
    cloud_cover_low: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    uv_index_max: Option<Vec<Option<f64>>>,
    #[serde(default)]
    sunrise: Vec<String>,
    #[serde(default)]
    sunset: Vec<String>,
    #[serde(default)]
    daylight_duration: Vec<Option<f64>>,
    #[serde(default)]
    sunshine_duration: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    hourly: Option<OmHourly>,
    daily: Option<OmDaily>,
}

/// Turn a forecast body into a snapshot for the request's local hour.
///
/// Missing `hourly`/`daily` sections are an error; individual missing values fall
/// back to fixed defaults.
fn snapshot_from_body(body: &str, request: &WeatherRequest) -> Result<WeatherSnapshot> {
    let parsed: OmForecastResponse =
        serde_json::from_str(body).context("Failed to parse Open-Meteo JSON")?;

    let (Some(hourly), Some(daily)) = (parsed.hourly, parsed.daily) else {
        return Err(anyhow!("Invalid Open-Meteo response structure: missing hourly or daily data"));
    };

    let hour = request.now.hour() as usize;
    let at = |series: &[Option<f64>], fallback: f64| {
        series.get(hour).copied().flatten().unwrap_or(fallback)
    };

    let cloud_cover = ((at(&hourly.cloud_cover_high, 0.0)
        + at(&hourly.cloud_cover_mid, 0.0)
        + at(&hourly.cloud_cover_low, 0.0))
        / 3.0)
        .round();

    let current = CurrentConditions {
        temperature: at(&hourly.temperature_2m, 20.0).round(),
        apparent_temperature: at(&hourly.apparent_temperature, 20.0).round(),
        precipitation: at(&hourly.precipitation, 0.0),
        rain: at(&hourly.rain, 0.0),
        showers: at(&hourly.showers, 0.0),
        cloud_cover,
    };

    let uv_index_max = match daily.uv_index_max {
        Some(values) => values.into_iter().map(|v| v.unwrap_or(0.0)).collect(),
        None => vec![5.0],
    };

    debug!(hour, ?current, "parsed Open-Meteo forecast");

    Ok(WeatherSnapshot {
        source: SnapshotSource::Live,
        current,
        daily: DailyOutlook {
            uv_index_max,
            sunrise: daily.sunrise,
            sunset: daily.sunset,
            daylight_duration: daily.daylight_duration.into_iter().flatten().collect(),
            sunshine_duration: daily.sunshine_duration.into_iter().flatten().collect(),
            duration_unit: DurationUnit::Seconds,
        },
        location: request.coordinates,
    })
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherSnapshot> {
        self.fetch_forecast(request).await
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
