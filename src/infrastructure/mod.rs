//! Infrastructure: configuration, logging and content-model loading.

pub mod config;
pub mod content;
pub mod logging;

pub use config::{ConfigError, ConfigLoader};
pub use content::{ContentError, ExplorationCatalog};
pub use logging::{LogConfig, LoggerImpl};
