//! Mock daily health metrics.
//!
//! There is no sensor or health-platform integration: every reading comes
//! from a seedable random source.

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

/// One day's readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub steps: u32,
    /// Hours, one decimal place.
    pub sleep_hours: f32,
    pub water_ml: u32,
    pub heart_rate_bpm: u32,
}

/// Daily targets shown next to each reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyGoals {
    pub steps: u32,
    pub sleep_hours: f32,
    pub water_ml: u32,
    /// Normal resting range, inclusive.
    pub heart_rate_bpm: (u32, u32),
}

impl Default for DailyGoals {
    fn default() -> Self {
        Self {
            steps: 10_000,
            sleep_hours: 8.0,
            water_ml: 2_000,
            heart_rate_bpm: (60, 100),
        }
    }
}

impl HealthMetrics {
    /// Share of the step goal reached, 0.0 ..= 1.0.
    pub fn step_progress(&self, goals: &DailyGoals) -> f64 {
        if goals.steps == 0 {
            return 1.0;
        }
        (self.steps as f64 / goals.steps as f64).min(1.0)
    }

    pub fn heart_rate_in_range(&self, goals: &DailyGoals) -> bool {
        let (lo, hi) = goals.heart_rate_bpm;
        (lo..=hi).contains(&self.heart_rate_bpm)
    }
}

/// Produces random readings within plausible daily ranges.
#[derive(Debug, Clone)]
pub struct MetricsGenerator<R = Mcg128Xsl64> {
    rng: R,
}

impl MetricsGenerator<Mcg128Xsl64> {
    pub fn new() -> Self {
        Self::with_rng(Mcg128Xsl64::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(Mcg128Xsl64::seed_from_u64(seed))
    }
}

impl Default for MetricsGenerator<Mcg128Xsl64> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> MetricsGenerator<R> {
    pub const STEPS: std::ops::Range<u32> = 2_000..10_000;
    /// Sleep in tenths of an hour: 4.0 ..= 7.9 h.
    pub const SLEEP_TENTHS: std::ops::Range<u32> = 40..80;
    pub const WATER_ML: std::ops::Range<u32> = 500..2_000;
    pub const HEART_RATE_BPM: std::ops::Range<u32> = 60..90;

    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Fresh set of readings (the dashboard's pull-to-refresh).
    pub fn refresh(&mut self) -> HealthMetrics {
        let sleep_tenths = self.rng.gen_range(Self::SLEEP_TENTHS);
        HealthMetrics {
            steps: self.rng.gen_range(Self::STEPS),
            sleep_hours: sleep_tenths as f32 / 10.0,
            water_ml: self.rng.gen_range(Self::WATER_ML),
            heart_rate_bpm: self.rng.gen_range(Self::HEART_RATE_BPM),
        }
    }
}
