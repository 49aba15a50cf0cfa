use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Daily fouling growth in percentage points, drawn uniformly per advance.
static DAILY_GROWTH_RANGE: std::ops::Range<f64> = 2.5..4.0;
/// Initial fouling seeded on a vessel's first appearance.
static INITIAL_FOULING_RANGE: std::ops::Range<f64> = 10.0..70.0;
static INITIAL_DAYS_SINCE_CLEAN_RANGE: std::ops::Range<i64> = 0..120;

static MAX_FOULING_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FoulingClass {
    Clean,
    Low,
    Medium,
    High,
}

impl FoulingClass {
    pub fn from_percent(fouling_percent: f64) -> Self {
        if fouling_percent <= 15.0 {
            FoulingClass::Clean
        } else if fouling_percent <= 40.0 {
            FoulingClass::Low
        } else if fouling_percent <= 75.0 {
            FoulingClass::Medium
        } else {
            FoulingClass::High
        }
    }
}

/// Simulated hull fouling accumulation and its derived fuel penalty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiofoulingState {
    pub fouling_percent: f64,
    pub fouling_class: FoulingClass,
    pub days_since_clean: i64,
    pub last_clean_timestamp: DateTime<Utc>,
    pub fuel_penalty_percent: f64,
}

impl BiofoulingState {
    /// Fresh fouling record for a newly created vessel state. Called exactly
    /// once per vessel per process lifetime.
    pub fn seed(rng: &mut impl Rng, now: DateTime<Utc>) -> Self {
        let fouling_percent = rng.random_range(INITIAL_FOULING_RANGE.clone());
        let days_since_clean = rng.random_range(INITIAL_DAYS_SINCE_CLEAN_RANGE.clone());

        Self {
            fouling_percent,
            fouling_class: FoulingClass::from_percent(fouling_percent),
            days_since_clean,
            last_clean_timestamp: now - chrono::Duration::days(days_since_clean),
            fuel_penalty_percent: fuel_penalty_percent(fouling_percent),
        }
    }

    /// Grows the fouling by a stochastic daily rate scaled to the elapsed
    /// time, clamped at 100%. `days_since_clean` is intentionally left
    /// untouched, matching the observed behavior of the source system.
    pub fn advance(self, elapsed_hours: f64, rng: &mut impl Rng) -> Self {
        let daily_rate = rng.random_range(DAILY_GROWTH_RANGE.clone());
        let fouling_percent =
            (self.fouling_percent + daily_rate / 24.0 * elapsed_hours).min(MAX_FOULING_PERCENT);

        Self {
            fouling_percent,
            fouling_class: FoulingClass::from_percent(fouling_percent),
            fuel_penalty_percent: fuel_penalty_percent(fouling_percent),
            ..self
        }
    }
}

pub fn fuel_penalty_percent(fouling_percent: f64) -> f64 {
    (fouling_percent / 100.0).powf(1.2) * 25.0
}
