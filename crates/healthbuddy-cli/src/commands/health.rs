use clap::Subcommand;
use healthbuddy_core::{advise, DailyGoals, MetricsGenerator};
use serde_json::json;

#[derive(Subcommand)]
pub enum HealthAction {
    /// Today's mock metrics with the suggested supplement and tip
    Today {
        /// Seed for reproducible readings
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub fn run(action: HealthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        HealthAction::Today { seed } => {
            let mut generator = match seed {
                Some(seed) => MetricsGenerator::with_seed(seed),
                None => MetricsGenerator::new(),
            };
            let metrics = generator.refresh();
            let goals = DailyGoals::default();
            let advice = advise(&metrics);

            let out = json!({
                "metrics": metrics,
                "goals": goals,
                "step_progress": metrics.step_progress(&goals),
                "heart_rate_in_range": metrics.heart_rate_in_range(&goals),
                "advice": advice,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
