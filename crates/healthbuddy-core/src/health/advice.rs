//! Rule-based supplement suggestion and daily tip.
//!
//! Rules are checked in order and the first match wins: low activity, then
//! short sleep, then low hydration.

use serde::{Deserialize, Serialize};

use super::metrics::HealthMetrics;

pub const LOW_STEPS: u32 = 5_000;
pub const SHORT_SLEEP_HOURS: f32 = 6.0;
pub const LOW_WATER_ML: u32 = 1_000;

/// Which rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concern {
    LowActivity,
    ShortSleep,
    LowHydration,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub concern: Concern,
    pub supplement: String,
    pub tip: String,
}

pub fn concern(metrics: &HealthMetrics) -> Concern {
    if metrics.steps < LOW_STEPS {
        Concern::LowActivity
    } else if metrics.sleep_hours < SHORT_SLEEP_HOURS {
        Concern::ShortSleep
    } else if metrics.water_ml < LOW_WATER_ML {
        Concern::LowHydration
    } else {
        Concern::None
    }
}

impl Concern {
    pub fn supplement(&self) -> &'static str {
        match self {
            Concern::LowActivity => "Vitamin D",
            Concern::ShortSleep => "Magnesium",
            Concern::LowHydration => "Electrolytes",
            Concern::None => "Multivitamin",
        }
    }

    pub fn tip(&self) -> &'static str {
        match self {
            Concern::LowActivity => "Try to walk more today to reach your step goal.",
            Concern::ShortSleep => "You may need more sleep. Try to go to bed earlier tonight.",
            Concern::LowHydration => "Remember to stay hydrated throughout the day.",
            Concern::None => "You're doing great! Keep up the healthy habits.",
        }
    }
}

pub fn advise(metrics: &HealthMetrics) -> Advice {
    let concern = concern(metrics);
    Advice {
        concern,
        supplement: concern.supplement().to_string(),
        tip: concern.tip().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> HealthMetrics {
        HealthMetrics {
            steps: 8_000,
            sleep_hours: 7.5,
            water_ml: 1_800,
            heart_rate_bpm: 70,
        }
    }

    #[test]
    fn healthy_day_gets_multivitamin() {
        let advice = advise(&healthy());
        assert_eq!(advice.concern, Concern::None);
        assert_eq!(advice.supplement, "Multivitamin");
        assert!(advice.tip.starts_with("You're doing great"));
    }

    #[test]
    fn each_rule_alone() {
        let m = HealthMetrics { steps: 4_999, ..healthy() };
        assert_eq!(advise(&m).supplement, "Vitamin D");

        let m = HealthMetrics { sleep_hours: 5.9, ..healthy() };
        assert_eq!(advise(&m).supplement, "Magnesium");

        let m = HealthMetrics { water_ml: 999, ..healthy() };
        assert_eq!(advise(&m).supplement, "Electrolytes");
    }

    #[test]
    fn thresholds_are_exclusive() {
        let m = HealthMetrics {
            steps: LOW_STEPS,
            sleep_hours: SHORT_SLEEP_HOURS,
            water_ml: LOW_WATER_ML,
            ..healthy()
        };
        assert_eq!(concern(&m), Concern::None);
    }

    #[test]
    fn activity_outranks_sleep_and_water() {
        let m = HealthMetrics {
            steps: 3_000,
            sleep_hours: 4.2,
            water_ml: 600,
            heart_rate_bpm: 80,
        };
        assert_eq!(concern(&m), Concern::LowActivity);

        let m = HealthMetrics { steps: 6_000, ..m };
        assert_eq!(concern(&m), Concern::ShortSleep);
    }
}
