use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Sydney CBD, used whenever the caller doesn't name a location.
    pub const SYDNEY: Coordinates = Coordinates {
        latitude: -33.8688,
        longitude: 151.2093,
    };

    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::SYDNEY
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone)]
pub struct WeatherRequest {
    pub coordinates: Coordinates,
    /// Local wall-clock time the "current" hour is taken from.
    pub now: DateTime<Local>,
}

impl WeatherRequest {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            now: Local::now(),
        }
    }
}

/// Where a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    Live,
    Mock,
}

/// Unit the daily duration arrays are expressed in.
///
/// Open-Meteo reports `daylight_duration`/`sunshine_duration` in seconds while the
/// synthetic generator produces minutes, so the unit travels with the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Seconds,
    Minutes,
}

impl DurationUnit {
    pub fn to_minutes(self, value: f64) -> f64 {
        match self {
            DurationUnit::Seconds => value / 60.0,
            DurationUnit::Minutes => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub precipitation: f64,
    pub rain: f64,
    pub showers: f64,
    pub cloud_cover: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOutlook {
    pub uv_index_max: Vec<f64>,
    pub sunrise: Vec<String>,
    pub sunset: Vec<String>,
    pub daylight_duration: Vec<f64>,
    pub sunshine_duration: Vec<f64>,
    pub duration_unit: DurationUnit,
}

impl DailyOutlook {
    /// Today's maximum UV index, if the source reported one.
    pub fn uv_today(&self) -> Option<f64> {
        self.uv_index_max.first().copied()
    }

    pub fn daylight_minutes_today(&self) -> Option<f64> {
        self.daylight_duration.first().map(|v| self.duration_unit.to_minutes(*v))
    }

    pub fn sunshine_minutes_today(&self) -> Option<f64> {
        self.sunshine_duration.first().map(|v| self.duration_unit.to_minutes(*v))
    }
}

/// One point-in-time weather read for a coordinate. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub source: SnapshotSource,
    pub current: CurrentConditions,
    pub daily: DailyOutlook,
    pub location: Coordinates,
}

impl WeatherSnapshot {
    pub fn is_mock(&self) -> bool {
        self.source == SnapshotSource::Mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_unit_converts_to_minutes() {
        assert_eq!(DurationUnit::Seconds.to_minutes(3600.0), 60.0);
        assert_eq!(DurationUnit::Minutes.to_minutes(90.0), 90.0);
    }

    #[test]
    fn daily_outlook_reports_today_in_minutes() {
        let daily = DailyOutlook {
            uv_index_max: vec![7.5, 8.0],
            sunrise: vec![],
            sunset: vec![],
            daylight_duration: vec![47_700.0],
            sunshine_duration: vec![],
            duration_unit: DurationUnit::Seconds,
        };

        assert_eq!(daily.uv_today(), Some(7.5));
        assert_eq!(daily.daylight_minutes_today(), Some(795.0));
        assert_eq!(daily.sunshine_minutes_today(), None);
    }
}
