//! Safe extraction of literal configuration values from Cypress
//! configuration source text, without executing it.

mod config_source;

pub use config_source::{ConfigSourceParser, ConfigurationFile};
