use std::collections::BTreeMap;
use std::sync::Arc;

use clap::Subcommand;
use healthbuddy_core::dispenser::{catalog, CATALOG};
use healthbuddy_core::{
    Config, ConnectionStatus, Dispenser, DispenserError, DispenserTimings, ManualScheduler,
    TokioScheduler,
};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;

#[derive(Subcommand)]
pub enum DispenserAction {
    /// Connect, dispense one supplement, then return to the dashboard
    Run {
        /// Seed for reproducible supplement selection
        #[arg(long)]
        seed: Option<u64>,
        /// Override the scan delay in milliseconds
        #[arg(long)]
        scan_delay_ms: Option<u64>,
        /// Override the dispense delay in milliseconds
        #[arg(long)]
        dispense_delay_ms: Option<u64>,
    },
    /// Run many cycles on a virtual clock and count the dispensed supplements
    Simulate {
        /// Number of dispense cycles
        #[arg(long, default_value = "1000")]
        runs: u32,
        /// Seed for reproducible supplement selection
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the supplements the dispenser can release
    Catalog,
}

pub fn run(action: DispenserAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        DispenserAction::Run {
            seed,
            scan_delay_ms,
            dispense_delay_ms,
        } => {
            if !config.dispenser.enabled {
                return Err(DispenserError::Disabled.into());
            }
            let timings = DispenserTimings::from_millis(
                scan_delay_ms.unwrap_or(config.dispenser.scan_delay_ms),
                dispense_delay_ms.unwrap_or(config.dispenser.dispense_delay_ms),
            );
            let seed = seed.or(config.dispenser.seed);

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_session(timings, seed))?;
        }
        DispenserAction::Simulate { runs, seed } => {
            let seed = seed.or(config.dispenser.seed);
            let counts = simulate(config.timings(), runs, seed)?;
            let out = json!({
                "runs": runs,
                "seed": seed,
                "counts": counts,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        DispenserAction::Catalog => {
            println!("{}", serde_json::to_string_pretty(&catalog())?);
        }
    }
    Ok(())
}

fn build(
    timings: DispenserTimings,
    seed: Option<u64>,
    scheduler: Arc<dyn healthbuddy_core::Scheduler>,
) -> Dispenser {
    match seed {
        Some(seed) => Dispenser::with_seed(timings, seed, scheduler),
        None => Dispenser::new(timings, scheduler),
    }
}

/// One screen visit: print every event as a JSON line.
async fn run_session(
    timings: DispenserTimings,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let scheduler = TokioScheduler::try_current().ok_or("no tokio runtime")?;
    let dispenser = build(timings, seed, Arc::new(scheduler));
    let mut events = dispenser.subscribe_events();

    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::warn!(error = %e, "cannot serialize event"),
                },
                Err(RecvError::Lagged(n)) => tracing::warn!(skipped = n, "event printer lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    dispenser.connect()?;
    dispenser.wait_for(ConnectionStatus::Connected).await;
    dispenser.dispense()?;
    dispenser.wait_for(ConnectionStatus::Complete).await;
    dispenser.reset();

    // Closing the channel ends the printer once it has drained.
    drop(dispenser);
    printer.await?;
    Ok(())
}

fn simulate(
    timings: DispenserTimings,
    runs: u32,
    seed: Option<u64>,
) -> Result<BTreeMap<String, u32>, DispenserError> {
    let scheduler = ManualScheduler::new();
    let dispenser = build(timings, seed, Arc::new(scheduler.clone()));
    let mut counts: BTreeMap<String, u32> = CATALOG
        .iter()
        .map(|(name, _)| (name.to_string(), 0))
        .collect();

    for _ in 0..runs {
        dispenser.connect()?;
        scheduler.advance(timings.scan_delay);
        dispenser.dispense()?;
        scheduler.advance(timings.dispense_delay);
        if let Some(item) = dispenser.dispensed_item() {
            *counts.entry(item.name).or_default() += 1;
        }
        dispenser.reset();
    }
    Ok(counts)
}
