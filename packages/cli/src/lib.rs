// ABOUTME: Library half of the elbitat binary
// ABOUTME: Configuration, logging setup and the shared application context

pub mod config;
pub mod context;
pub mod logging;

pub use config::{Config, ConfigError, StorageBackend};
pub use context::AppContext;
pub use logging::init_logging;
