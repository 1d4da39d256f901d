mod error;
mod loader;
#[cfg(test)]
mod tests;
pub mod types;
mod validate;

pub use error::{ConfigError, ValidationError};
pub use loader::{load_config, parse_config};
pub use types::EdgeConfig;
pub use validate::validate_config;
