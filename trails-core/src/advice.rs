//! Pure derivations from a [`WeatherSnapshot`]: condition labels, icons, UV tiers
//! and dog-walking advice.

use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::model::{CurrentConditions, WeatherSnapshot};

/// UV index assumed when a snapshot has no daily reading.
pub const FALLBACK_UV_INDEX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Condition {
    HeavyRain,
    LightRain,
    Drizzle,
    Overcast,
    Cloudy,
    PartlyCloudy,
    Sunny,
}

impl Condition {
    pub fn label(&self) -> &'static str {
        match self {
            Condition::HeavyRain => "Heavy Rain",
            Condition::LightRain => "Light Rain",
            Condition::Drizzle => "Drizzle",
            Condition::Overcast => "Overcast",
            Condition::Cloudy => "Cloudy",
            Condition::PartlyCloudy => "Partly Cloudy",
            Condition::Sunny => "Sunny",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Condition::HeavyRain | Condition::LightRain | Condition::Drizzle => "🌧️",
            Condition::Overcast => "☁️",
            Condition::Cloudy => "⛅",
            Condition::PartlyCloudy => "🌤️",
            Condition::Sunny => "☀️",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Any precipitation beats cloud cover; thresholds are strict `>` comparisons.
pub fn classify(current: &CurrentConditions) -> Condition {
    let wet = [current.precipitation, current.rain, current.showers];

    if wet.iter().any(|v| *v > 0.0) {
        if wet.iter().any(|v| *v > 2.0) {
            Condition::HeavyRain
        } else if wet.iter().any(|v| *v > 0.5) {
            Condition::LightRain
        } else {
            Condition::Drizzle
        }
    } else if current.cloud_cover > 80.0 {
        Condition::Overcast
    } else if current.cloud_cover > 50.0 {
        Condition::Cloudy
    } else if current.cloud_cover > 25.0 {
        Condition::PartlyCloudy
    } else {
        Condition::Sunny
    }
}

/// `"{temperature}°C {condition}"` with whole degrees, e.g. `"22°C Partly Cloudy"`.
pub fn describe(snapshot: &WeatherSnapshot) -> String {
    // `+ 0.0` turns a rounded -0.0 into 0.0
    let temperature = snapshot.current.temperature.round() + 0.0;
    format!("{temperature}°C {}", classify(&snapshot.current))
}

pub fn icon(snapshot: &WeatherSnapshot) -> &'static str {
    classify(&snapshot.current).icon()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UvLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvLevel {
    pub fn from_index(uv_index: f64) -> Self {
        if uv_index >= 11.0 {
            UvLevel::Extreme
        } else if uv_index >= 8.0 {
            UvLevel::VeryHigh
        } else if uv_index >= 6.0 {
            UvLevel::High
        } else if uv_index >= 3.0 {
            UvLevel::Moderate
        } else {
            UvLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UvLevel::Low => "Low",
            UvLevel::Moderate => "Moderate",
            UvLevel::High => "High",
            UvLevel::VeryHigh => "Very High",
            UvLevel::Extreme => "Extreme",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            UvLevel::Extreme => {
                "Avoid outside time during midday. Seek shade, cover up, and use SPF 50+ sunscreen."
            }
            UvLevel::VeryHigh => {
                "Minimise sun exposure between 10am-4pm. \
                 Use SPF 50+ sunscreen and protective clothing."
            }
            UvLevel::High => "Reduce sun exposure between 10am-4pm. Use SPF 30+ sunscreen and hat.",
            UvLevel::Moderate => "Stay in shade near midday. Use SPF 30+ sunscreen.",
            UvLevel::Low => "No protection needed for most dogs and people.",
        }
    }
}

impl std::fmt::Display for UvLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UvDescription {
    pub level: &'static str,
    pub advice: &'static str,
}

pub fn uv_description(uv_index: f64) -> UvDescription {
    let level = UvLevel::from_index(uv_index);
    UvDescription {
        level: level.label(),
        advice: level.advice(),
    }
}

/// Today's UV index, or [`FALLBACK_UV_INDEX`] when the snapshot carries none.
pub fn uv_index_or_default(snapshot: &WeatherSnapshot) -> f64 {
    snapshot.daily.uv_today().unwrap_or(FALLBACK_UV_INDEX)
}

/// Advice sentences for taking a dog out, joined with spaces.
///
/// Temperature, UV and rain are judged independently and every applicable
/// sentence is kept.
pub fn dog_advice(snapshot: &WeatherSnapshot) -> String {
    let CurrentConditions {
        temperature,
        precipitation,
        ..
    } = snapshot.current;
    let uv_index = snapshot.daily.uv_today().unwrap_or(0.0);

    let mut advice = Vec::with_capacity(3);

    advice.push(if temperature > 30.0 {
        "Very hot conditions - limit exercise to early morning or evening."
    } else if temperature > 25.0 {
        "Warm conditions - bring extra water and watch for signs of overheating."
    } else if temperature < 5.0 {
        "Cold conditions - consider a dog coat for short-haired breeds."
    } else {
        "Comfortable temperature for most dogs."
    });

    if uv_index >= 8.0 {
        advice.push(
            "Extreme UV - avoid midday sun and consider dog-safe sunscreen for exposed skin areas.",
        );
    } else if uv_index >= 6.0 {
        advice.push("High UV - seek shaded areas and limit direct sun exposure.");
    }

    if precipitation > 2.0 {
        advice.push("Heavy rain expected - bring towels and consider waterproof gear.");
    } else if precipitation > 0.0 {
        advice.push("Light rain possible - be prepared for wet conditions.");
    }

    advice.join(" ")
}

/// Render an ISO-8601 sunrise/sunset as a 12-hour `hh:mm am` string.
///
/// Accepts both offset-carrying timestamps and the local `YYYY-MM-DDTHH:MM` form
/// Open-Meteo returns. Empty or unparseable input gives `"N/A"`.
pub fn format_sun_time(time: &str) -> String {
    let time = time.trim();
    if time.is_empty() {
        return "N/A".to_string();
    }

    let parsed = DateTime::parse_from_rfc3339(time)
        .map(|dt| dt.with_timezone(&chrono::Local).naive_local())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M").ok())
        .or_else(|| NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S").ok());

    match parsed {
        Some(dt) => {
            let (pm, hour) = dt.hour12();
            let suffix = if pm { "pm" } else { "am" };
            format!("{hour:02}:{:02} {suffix}", dt.minute())
        }
        None => "N/A".to_string(),
    }
}

/// `"{h}h {m}m"` for a whole number of minutes; zero gives `"N/A"`.
pub fn format_duration(minutes: u32) -> String {
    if minutes == 0 {
        return "N/A".to_string();
    }
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, DailyOutlook, DurationUnit, SnapshotSource};
    use proptest::prelude::*;

    fn snapshot(
        temperature: f64,
        precipitation: f64,
        cloud_cover: f64,
        uv: Option<f64>,
    ) -> WeatherSnapshot {
        WeatherSnapshot {
            source: SnapshotSource::Mock,
            current: CurrentConditions {
                temperature,
                apparent_temperature: temperature,
                precipitation,
                rain: 0.0,
                showers: 0.0,
                cloud_cover,
            },
            daily: DailyOutlook {
                uv_index_max: uv.into_iter().collect(),
                sunrise: vec![],
                sunset: vec![],
                daylight_duration: vec![],
                sunshine_duration: vec![],
                duration_unit: DurationUnit::Minutes,
            },
            location: Coordinates::SYDNEY,
        }
    }

    #[test]
    fn cloud_boundaries_resolve_to_lower_bucket() {
        assert_eq!(
            classify(&snapshot(20.0, 0.0, 80.0, None).current),
            Condition::Cloudy
        );
        assert_eq!(
            classify(&snapshot(20.0, 0.0, 80.1, None).current),
            Condition::Overcast
        );
        assert_eq!(
            classify(&snapshot(20.0, 0.0, 50.0, None).current),
            Condition::PartlyCloudy
        );
        assert_eq!(
            classify(&snapshot(20.0, 0.0, 25.0, None).current),
            Condition::Sunny
        );
        assert_eq!(
            classify(&snapshot(20.0, 0.0, 0.0, None).current),
            Condition::Sunny
        );
    }

    #[test]
    fn rain_tiers() {
        assert_eq!(
            classify(&snapshot(20.0, 2.5, 10.0, None).current),
            Condition::HeavyRain
        );
        assert_eq!(
            classify(&snapshot(20.0, 1.0, 10.0, None).current),
            Condition::LightRain
        );
        assert_eq!(
            classify(&snapshot(20.0, 0.2, 10.0, None).current),
            Condition::Drizzle
        );

        let mut showery = snapshot(20.0, 0.0, 95.0, None);
        showery.current.showers = 3.0;
        assert_eq!(classify(&showery.current), Condition::HeavyRain);
    }

    #[test]
    fn description_includes_temperature() {
        assert_eq!(
            describe(&snapshot(22.0, 0.0, 30.0, None)),
            "22°C Partly Cloudy"
        );
        assert_eq!(
            describe(&snapshot(17.0, 3.0, 90.0, None)),
            "17°C Heavy Rain"
        );
    }

    #[test]
    fn description_never_shows_negative_zero() {
        assert_eq!(describe(&snapshot(-0.0, 0.0, 10.0, None)), "0°C Sunny");
        assert_eq!(describe(&snapshot(-0.4, 0.0, 10.0, None)), "0°C Sunny");
        assert_eq!(describe(&snapshot(-2.6, 0.0, 10.0, None)), "-3°C Sunny");
        assert_eq!(describe(&snapshot(21.5, 0.0, 10.0, None)), "22°C Sunny");
    }

    #[test]
    fn icons_per_bucket() {
        assert_eq!(icon(&snapshot(20.0, 0.0, 90.0, None)), "☁️");
        assert_eq!(icon(&snapshot(20.0, 0.0, 60.0, None)), "⛅");
        assert_eq!(icon(&snapshot(20.0, 0.0, 30.0, None)), "🌤️");
        assert_eq!(icon(&snapshot(20.0, 0.0, 10.0, None)), "☀️");
    }

    #[test]
    fn uv_tiers() {
        assert_eq!(uv_description(11.0).level, "Extreme");
        assert_eq!(uv_description(8.0).level, "Very High");
        assert_eq!(uv_description(7.9).level, "High");
        assert_eq!(uv_description(6.0).level, "High");
        assert_eq!(uv_description(3.0).level, "Moderate");
        assert_eq!(uv_description(2.9).level, "Low");
        assert!(uv_description(12.0).advice.contains("SPF 50+"));
    }

    #[test]
    fn uv_falls_back_when_missing() {
        assert_eq!(
            uv_index_or_default(&snapshot(20.0, 0.0, 0.0, None)),
            FALLBACK_UV_INDEX
        );
        assert_eq!(
            uv_index_or_default(&snapshot(20.0, 0.0, 0.0, Some(9.0))),
            9.0
        );
    }

    #[test]
    fn dog_advice_is_additive() {
        let advice = dog_advice(&snapshot(32.0, 3.0, 50.0, Some(9.0)));
        assert_eq!(
            advice,
            "Very hot conditions - limit exercise to early morning or evening. \
             Extreme UV - avoid midday sun and consider dog-safe sunscreen for exposed skin areas. \
             Heavy rain expected - bring towels and consider waterproof gear."
        );
    }

    #[test]
    fn dog_advice_temperature_bands() {
        assert!(dog_advice(&snapshot(26.0, 0.0, 0.0, None)).starts_with("Warm conditions"));
        assert!(dog_advice(&snapshot(4.0, 0.0, 0.0, None)).starts_with("Cold conditions"));
        assert_eq!(
            dog_advice(&snapshot(20.0, 0.0, 0.0, None)),
            "Comfortable temperature for most dogs."
        );
        assert!(dog_advice(&snapshot(20.0, 0.1, 0.0, Some(6.0))).contains("High UV"));
        assert!(dog_advice(&snapshot(20.0, 0.1, 0.0, None)).ends_with("wet conditions."));
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(75), "1h 15m");
        assert_eq!(format_duration(0), "N/A");
        assert_eq!(format_duration(795), "13h 15m");
    }

    #[test]
    fn sun_time_formatting() {
        assert_eq!(format_sun_time("2025-01-10T06:05"), "06:05 am");
        assert_eq!(format_sun_time("2025-01-10T19:45"), "07:45 pm");
        assert_eq!(format_sun_time(""), "N/A");
        assert_eq!(format_sun_time("not a time"), "N/A");
    }

    proptest! {
        #[test]
        fn dry_description_depends_only_on_cloud_cover(
            cloud in 0.0f64..=100.0,
            temp in -5.0f64..45.0,
        ) {
            let expected = if cloud > 80.0 {
                Condition::Overcast
            } else if cloud > 50.0 {
                Condition::Cloudy
            } else if cloud > 25.0 {
                Condition::PartlyCloudy
            } else {
                Condition::Sunny
            };
            prop_assert_eq!(
                classify(&snapshot(temp, 0.0, cloud, None).current),
                expected
            );
        }

        #[test]
        fn any_precipitation_shows_rain_icon(
            precipitation in 0.0f64..10.0,
            rain in 0.0f64..10.0,
            showers in 0.0f64..10.0,
            cloud in 0.0f64..=100.0,
        ) {
            prop_assume!(precipitation > 0.0 || rain > 0.0 || showers > 0.0);
            let mut snap = snapshot(20.0, precipitation, cloud, None);
            snap.current.rain = rain;
            snap.current.showers = showers;
            prop_assert_eq!(icon(&snap), "🌧️");
        }

        #[test]
        fn uv_level_is_monotonic(a in 0.0f64..15.0, b in 0.0f64..15.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(UvLevel::from_index(lo) as u8 <= UvLevel::from_index(hi) as u8);
        }
    }
}
