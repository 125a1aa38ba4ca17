mod advice;
mod metrics;

pub use advice::{advise, concern, Advice, Concern};
pub use metrics::{DailyGoals, HealthMetrics, MetricsGenerator};
