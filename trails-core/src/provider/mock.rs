//! Synthetic Sydney weather for preview deployments and as the fallback when the
//! live provider fails. Plausible for display, not a physical model.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveTime, TimeZone, Timelike};
use rand::Rng;

use crate::model::{
    Coordinates, CurrentConditions, DailyOutlook, DurationUnit, SnapshotSource, WeatherRequest,
    WeatherSnapshot,
};

use super::WeatherProvider;

#[derive(Debug, Clone, Default)]
pub struct MockProvider;

impl MockProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WeatherProvider for MockProvider {
    async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherSnapshot> {
        Ok(mock_snapshot(request.coordinates, request.now, &mut rand::thread_rng()))
    }
}

/// Temperature and cloud bands by local hour: morning, afternoon, evening/night.
fn bands(hour: u32) -> ((f64, f64), (f64, f64)) {
    match hour {
        6..=11 => ((18.0, 22.0), (20.0, 50.0)),
        12..=17 => ((24.0, 30.0), (10.0, 50.0)),
        _ => ((16.0, 22.0), (40.0, 70.0)),
    }
}

fn local_at(now: DateTime<Local>, hour: u32, minute: u32) -> String {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
    Local
        .from_local_datetime(&now.date_naive().and_time(time))
        .earliest()
        .unwrap_or(now)
        .to_rfc3339()
}

pub fn mock_snapshot<R: Rng>(
    location: Coordinates,
    now: DateTime<Local>,
    rng: &mut R,
) -> WeatherSnapshot {
    let ((t_lo, t_hi), (c_lo, c_hi)) = bands(now.hour());

    let temperature: f64 = rng.gen_range(t_lo..t_hi);
    let cloud_cover: f64 = rng.gen_range(c_lo..c_hi);

    let mut occasional = |chance: f64, max: f64| {
        if rng.gen_bool(chance) {
            rng.gen_range(0.0..max)
        } else {
            0.0
        }
    };
    let precipitation = occasional(0.2, 2.0);
    let rain = occasional(0.2, 1.5);
    let showers = occasional(0.1, 1.0);

    let apparent_temperature = (temperature + rng.gen_range(-1.0..1.0)).round();
    let uv_index = rng.gen_range(3.0f64..11.0).round();

    WeatherSnapshot {
        source: SnapshotSource::Mock,
        current: CurrentConditions {
            temperature: temperature.round(),
            apparent_temperature,
            precipitation,
            rain,
            showers,
            cloud_cover: cloud_cover.round(),
        },
        daily: DailyOutlook {
            uv_index_max: vec![uv_index],
            sunrise: vec![local_at(now, 6, 30)],
            sunset: vec![local_at(now, 19, 45)],
            daylight_duration: vec![13.25 * 60.0],
            sunshine_duration: vec![10.5 * 60.0],
            duration_unit: DurationUnit::Minutes,
        },
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::format_sun_time;
    use rand::{SeedableRng, rngs::StdRng};

    fn at_hour(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, 10, hour, 0, 0).single().expect("valid time")
    }

    #[test]
    fn temperature_follows_time_of_day() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let morning = mock_snapshot(Coordinates::SYDNEY, at_hour(8), &mut rng);
            assert!((18.0..=22.0).contains(&morning.current.temperature));

            let afternoon = mock_snapshot(Coordinates::SYDNEY, at_hour(14), &mut rng);
            assert!((24.0..=30.0).contains(&afternoon.current.temperature));
            assert!((10.0..=50.0).contains(&afternoon.current.cloud_cover));

            let night = mock_snapshot(Coordinates::SYDNEY, at_hour(22), &mut rng);
            assert!((16.0..=22.0).contains(&night.current.temperature));
            assert!((40.0..=70.0).contains(&night.current.cloud_cover));
        }
    }

    #[test]
    fn daily_values_are_fixed_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let snap = mock_snapshot(Coordinates::SYDNEY, at_hour(9), &mut rng);

        assert!(snap.is_mock());
        let uv = snap.daily.uv_today().expect("uv");
        assert!((3.0..=11.0).contains(&uv));
        assert_eq!(snap.daily.daylight_minutes_today(), Some(795.0));
        assert_eq!(snap.daily.sunshine_minutes_today(), Some(630.0));
        assert_eq!(format_sun_time(&snap.daily.sunrise[0]), "06:30 am");
        assert_eq!(format_sun_time(&snap.daily.sunset[0]), "07:45 pm");
    }

    #[test]
    fn precipitation_is_mostly_zero() {
        let mut rng = StdRng::seed_from_u64(42);
        let dry = (0..500)
            .map(|_| mock_snapshot(Coordinates::SYDNEY, at_hour(10), &mut rng))
            .filter(|s| s.current.precipitation == 0.0)
            .count();
        assert!(dry > 300, "expected mostly dry snapshots, got {dry}/500");
    }

    #[tokio::test]
    async fn provider_keeps_requested_location() {
        let coords = Coordinates::new(-33.8317, 151.0139);
        let snap = MockProvider::new()
            .get_weather(&WeatherRequest::new(coords))
            .await
            .expect("mock never fails");
        assert_eq!(snap.location, coords);
    }
}
