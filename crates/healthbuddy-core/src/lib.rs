//! # Health Buddy Core Library
//!
//! This library provides the behavior behind the Health Buddy app: a simulated
//! Bluetooth supplement dispenser, mock daily health metrics with supplement
//! advice, and a demo login. All operations are also reachable through the
//! standalone CLI binary.
//!
//! ## Architecture
//!
//! - **Dispenser**: a status state machine whose two timed transitions run on
//!   an injectable scheduler (tokio timers, or a virtual clock in tests)
//! - **Health**: seedable mock metrics and rule-based advice
//! - **Auth**: credential check behind a stub authenticator
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Dispenser`]: timer-driven dispenser session
//! - [`DispenserSimulator`]: the underlying state machine
//! - [`MetricsGenerator`]: mock health readings
//! - [`Config`]: application configuration management

pub mod auth;
pub mod dispenser;
pub mod error;
pub mod events;
pub mod health;
pub mod storage;

pub use auth::{Authenticator, Credentials, DemoAuthenticator, Session};
pub use dispenser::{
    ConnectionStatus, DispensedItem, Dispenser, DispenserSimulator, DispenserSnapshot,
    DispenserTimings, ManualScheduler, Scheduler, TokioScheduler,
};
pub use error::{AuthError, ConfigError, CoreError, DispenserError, DispenserOperation};
pub use events::Event;
pub use health::{advise, Advice, Concern, DailyGoals, HealthMetrics, MetricsGenerator};
pub use storage::Config;
