use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "healthbuddy-cli", version, about = "Health Buddy CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulated smart dispenser
    Dispenser {
        #[command(subcommand)]
        action: commands::dispenser::DispenserAction,
    },
    /// Mock health metrics and supplement advice
    Health {
        #[command(subcommand)]
        action: commands::health::HealthAction,
    },
    /// Sign in with the demo account
    Login(commands::login::LoginArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    // Diagnostics go to stderr; stdout carries JSON only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Dispenser { action } => commands::dispenser::run(action),
        Commands::Health { action } => commands::health::run(action),
        Commands::Login(args) => commands::login::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
