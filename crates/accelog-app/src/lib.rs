//! Command-line front end: configuration, logging and the individual tools.

pub mod commands;
pub mod config;
pub mod logging;
pub mod template;

pub use config::{AppConfig, ConfigError};
