//! Visit planning: time slots, dog profile, packing checklist, and the
//! recommendations and itinerary derived from them.

use anyhow::anyhow;
use chrono::NaiveDate;
use serde::Serialize;
use std::convert::TryFrom;

use crate::{
    advice::FALLBACK_UV_INDEX,
    catalog::{self, Park},
    model::WeatherSnapshot,
};

/// Assumed when no weather snapshot is available.
const DEFAULT_TEMPERATURE: f64 = 20.0;
const DEFAULT_PRECIPITATION: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeSlot {
    EarlyMorning,
    #[default]
    Morning,
    Midday,
    Afternoon,
    Evening,
    LateEvening,
}

impl TimeSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::EarlyMorning => "early-morning",
            TimeSlot::Morning => "morning",
            TimeSlot::Midday => "midday",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
            TimeSlot::LateEvening => "late-evening",
        }
    }

    pub const fn all() -> &'static [TimeSlot] {
        &[
            TimeSlot::EarlyMorning,
            TimeSlot::Morning,
            TimeSlot::Midday,
            TimeSlot::Afternoon,
            TimeSlot::Evening,
            TimeSlot::LateEvening,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::EarlyMorning => "Early Morning (6-8 AM)",
            TimeSlot::Morning => "Morning (8-11 AM)",
            TimeSlot::Midday => "Midday (11 AM-2 PM)",
            TimeSlot::Afternoon => "Afternoon (2-5 PM)",
            TimeSlot::Evening => "Evening (5-7 PM)",
            TimeSlot::LateEvening => "Late Evening (7-9 PM)",
        }
    }

    /// Expected crowd level.
    pub fn crowd(&self) -> &'static str {
        match self {
            TimeSlot::EarlyMorning | TimeSlot::LateEvening => "Low",
            TimeSlot::Morning | TimeSlot::Afternoon => "Medium",
            TimeSlot::Midday | TimeSlot::Evening => "High",
        }
    }

    /// How the temperature usually feels.
    pub fn feel(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "Pleasant",
            TimeSlot::Midday | TimeSlot::Afternoon => "Warm",
            TimeSlot::EarlyMorning | TimeSlot::Evening | TimeSlot::LateEvening => "Cool",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DogSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl DogSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            DogSize::Small => "small",
            DogSize::Medium => "medium",
            DogSize::Large => "large",
        }
    }

    pub const fn all() -> &'static [DogSize] {
        &[DogSize::Small, DogSize::Medium, DogSize::Large]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl EnergyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLevel::Low => "low",
            EnergyLevel::Medium => "medium",
            EnergyLevel::High => "high",
        }
    }

    pub const fn all() -> &'static [EnergyLevel] {
        &[EnergyLevel::Low, EnergyLevel::Medium, EnergyLevel::High]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum VisitDuration {
    #[default]
    #[serde(rename = "1-2")]
    OneToTwo,
    #[serde(rename = "2-3")]
    TwoToThree,
    #[serde(rename = "3+")]
    ThreePlus,
}

impl VisitDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitDuration::OneToTwo => "1-2",
            VisitDuration::TwoToThree => "2-3",
            VisitDuration::ThreePlus => "3+",
        }
    }

    pub const fn all() -> &'static [VisitDuration] {
        &[VisitDuration::OneToTwo, VisitDuration::TwoToThree, VisitDuration::ThreePlus]
    }

    /// The lower bound in hours.
    pub fn min_hours(&self) -> u32 {
        match self {
            VisitDuration::OneToTwo => 1,
            VisitDuration::TwoToThree => 2,
            VisitDuration::ThreePlus => 3,
        }
    }
}

macro_rules! choice_impls {
    ($($ty:ident => $what:literal),* $(,)?) => {$(
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<&str> for $ty {
            type Error = anyhow::Error;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                let lower = value.trim().to_lowercase();
                $ty::all().iter().copied().find(|v| v.as_str() == lower).ok_or_else(|| {
                    let supported: Vec<_> = $ty::all().iter().map(|v| v.as_str()).collect();
                    anyhow!(
                        "Unknown {} '{value}'. Supported: {}.",
                        $what,
                        supported.join(", ")
                    )
                })
            }
        }
    )*};
}

choice_impls!(
    TimeSlot => "time slot",
    DogSize => "dog size",
    EnergyLevel => "energy level",
    VisitDuration => "visit duration",
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub water: bool,
    pub treats: bool,
    pub leash: bool,
    pub bags: bool,
    pub towel: bool,
    pub toys: bool,
    pub first_aid: bool,
    pub camera: bool,
}

impl Checklist {
    pub fn items(&self) -> [(&'static str, bool); 8] {
        [
            ("Water bottle & bowl", self.water),
            ("Training treats", self.treats),
            ("Leash (backup)", self.leash),
            ("Waste bags", self.bags),
            ("Towel", self.towel),
            ("Toys", self.toys),
            ("First aid kit", self.first_aid),
            ("Camera", self.camera),
        ]
    }

    pub fn packed(&self) -> usize {
        self.items().iter().filter(|(_, done)| *done).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItineraryStep {
    pub time: &'static str,
    pub activity: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisitPlan {
    pub park: &'static Park,
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub duration: VisitDuration,
    pub dog_size: DogSize,
    pub energy: EnergyLevel,
    pub checklist: Checklist,
    pub notes: String,
}

/// The exported plan file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedPlan {
    pub park: &'static str,
    pub date: String,
    pub time: &'static str,
    pub duration: String,
    pub checklist: Checklist,
    pub notes: String,
    pub recommendations: Vec<Recommendation>,
    pub itinerary: Vec<ItineraryStep>,
}

/// Park for `slug`; unknown or missing slugs fall back to the first park.
pub fn resolve_park(slug: Option<&str>) -> Option<&'static Park> {
    slug.and_then(catalog::find_by_slug).or_else(|| catalog::all().first())
}

impl VisitPlan {
    pub fn new(park: &'static Park, date: NaiveDate) -> Self {
        Self {
            park,
            date,
            time: TimeSlot::default(),
            duration: VisitDuration::default(),
            dog_size: DogSize::default(),
            energy: EnergyLevel::default(),
            checklist: Checklist::default(),
            notes: String::new(),
        }
    }

    pub fn recommendations(&self, weather: Option<&WeatherSnapshot>) -> Vec<Recommendation> {
        let temperature = weather.map_or(DEFAULT_TEMPERATURE, |w| w.current.temperature);
        let uv = weather.and_then(|w| w.daily.uv_today()).unwrap_or(FALLBACK_UV_INDEX);
        let precipitation = weather.map_or(DEFAULT_PRECIPITATION, |w| w.current.precipitation);

        let mut out = Vec::new();
        let mut push = |kind: RecommendationKind, title: &'static str, description: &'static str| {
            out.push(Recommendation {
                kind,
                title,
                description,
            });
        };

        if temperature > 25.0 {
            push(
                RecommendationKind::Warning,
                "Hot Weather Alert",
                "Bring extra water and consider early morning or evening visits. \
                 Watch for hot pavement.",
            );
        }
        if uv >= 8.0 {
            push(
                RecommendationKind::Warning,
                "High UV Index",
                "Seek shade frequently. Consider protective gear for light-colored dogs.",
            );
        }
        if precipitation > 5.0 {
            push(
                RecommendationKind::Info,
                "Rainy Conditions",
                "Bring towels and consider waterproof gear. Muddy conditions expected.",
            );
        }
        if self.time == TimeSlot::Midday {
            push(
                RecommendationKind::Warning,
                "Peak Hours",
                "Expect crowds and higher temperatures. Consider alternative times.",
            );
        }
        if self.energy == EnergyLevel::High {
            push(
                RecommendationKind::Success,
                "High Energy Dog",
                "Perfect for longer visits! Bring extra toys and consider agility areas.",
            );
        }
        if self.dog_size == DogSize::Small {
            push(
                RecommendationKind::Info,
                "Small Dog Tips",
                "Look for dedicated small dog areas. Watch for larger dogs during busy times.",
            );
        }

        out
    }

    pub fn itinerary(&self) -> Vec<ItineraryStep> {
        let step = |time: &'static str, activity: &'static str, description: &'static str| {
            ItineraryStep {
                time,
                activity,
                description,
            }
        };

        let mut steps = vec![
            step(
                "15 mins before",
                "Preparation",
                "Check weather, pack supplies, and prepare your dog",
            ),
            step(
                "Arrival",
                "Park Assessment",
                "Check conditions, other dogs, and choose the best area",
            ),
            step(
                "First 30 mins",
                "Exploration & Socialization",
                "Let your dog explore and meet other dogs gradually",
            ),
        ];
        if self.duration.min_hours() > 1 {
            steps.push(step(
                "Mid-visit",
                "Active Play",
                "Engage in fetch, training, or agility activities",
            ));
        }
        steps.push(step(
            "Before leaving",
            "Wind Down",
            "Calm activities, water break, and cleanup",
        ));

        steps
    }

    pub fn export(&self, weather: Option<&WeatherSnapshot>) -> ExportedPlan {
        ExportedPlan {
            park: self.park.name,
            date: self.date.format("%a %b %d %Y").to_string(),
            time: self.time.label(),
            duration: format!("{} hours", self.duration),
            checklist: self.checklist,
            notes: self.notes.clone(),
            recommendations: self.recommendations(weather),
            itinerary: self.itinerary(),
        }
    }

    pub fn export_file_name(&self) -> String {
        export_file_name(self.date)
    }
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("tail-trails-visit-plan-{}.json", date.format("%Y-%m-%d"))
}
