//! Runtime support for the PlotPin server: layered configuration and
//! logging initialization.

pub mod config;
pub mod logging;

pub use config::{
    default_logging_config, AppConfig, AuthConfig, BootstrapAdmin, CliArgs, DatabaseConfig,
    LoggingConfig, MailConfig, Section, ServerConfig,
};
