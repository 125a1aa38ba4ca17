pub mod config;
pub mod dispenser;
pub mod health;
pub mod login;
