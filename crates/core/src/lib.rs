//! cypress-configuration - resolution of Cypress project configuration and
//! test files from layered override sources
//!
//! This crate provides functionality to:
//! - Merge CLI arguments, environment variables, the project configuration
//!   file and `cypress.env.json` into one canonical configuration object
//! - Extract literal values from `cypress.config.*` sources without
//!   executing them
//! - Expand the resolved spec patterns into a concrete list of test files
pub mod argv;
pub mod config;
pub mod env;
pub mod error;
pub mod files;
pub mod glob;
pub mod parser;
pub mod types;

// Re-export commonly used types and operations
pub use error::{Error, Result};
pub use types::{CypressEra, StringOrArray, StringOrFalse, TestingType};

pub use config::{
    determine_cypress_era, resolve_configuration, resolve_environment,
    resolve_post10_configuration, resolve_pre10_configuration, CypressConfiguration,
    CypressPost10Configuration, CypressPre10Configuration, ModuleLoader, ResolveOptions,
};
pub use files::{resolve_post10_test_files, resolve_pre10_test_files, resolve_test_files};
pub use parser::{ConfigSourceParser, ConfigurationFile};
