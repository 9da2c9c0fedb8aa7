#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod app;
pub use app::CatalogApp;

mod cli;
pub use cli::{Cli, Commands};

mod config;
pub use config::AppConfig;

mod logging;
pub use logging::{DEFAULT_LOG_FILTER, log_filter};
