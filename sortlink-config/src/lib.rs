//! Configuration library for sortlink.
//!
//! Loads [`SortingConfig`] from a file, inline JSON or defaults, validates it,
//! and converts it into the settings the core services are built from.

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{CONFIG_JSON_VAR, CONFIG_PATH_VAR};
pub use models::{ConfigSource, IndicatorConfig, SortingConfig};
pub use sortlink_core::InvalidFieldBehavior;
pub use validation::ConfigError;
