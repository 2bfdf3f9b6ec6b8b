//! Configuration resolution across the two Cypress eras.
//!
//! The modern (post-v10) resolver is the primary path; the legacy (pre-v10)
//! resolver covers projects still on flat `cypress.json` files. Both merge
//! defaults, the configuration file, prefixed environment variables and CLI
//! arguments in fixed precedence order, and resolve the `env` sub-map
//! independently through its own four-source chain.

mod environment;
mod era;
mod loader;
mod post10;
mod pre10;
mod validate;

pub use environment::{resolve_environment, ENVIRONMENT_FILE_NAME};
pub use era::{determine_cypress_era, POST10_CONFIG_FILE_NAMES, PRE10_CONFIG_FILE_NAME};
pub use loader::ModuleLoader;
pub use post10::{resolve_post10_configuration, CypressPost10Configuration};
pub use pre10::{resolve_pre10_configuration, CypressPre10Configuration};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{
    argv::find_argument_value,
    error::{Error, Result},
    types::{CypressEra, TestingType},
};

/// The configuration shape downstream tooling consumes; an alias for the
/// modern era's resolved configuration.
pub type CypressConfiguration = CypressPost10Configuration;

/// Inputs for a single resolution call.
///
/// Process state is always passed in explicitly; nothing in this crate reads
/// `std::env` on its own. `loader` enables dangerous parsing: when present,
/// the configuration file is executed through it instead of being parsed for
/// literals.
pub struct ResolveOptions<'a> {
    pub argv: &'a [String],
    pub env: &'a HashMap<String, String>,
    pub cwd: &'a Path,
    pub loader: Option<&'a dyn ModuleLoader>,
}

/// Resolve the configuration of a project, whatever era it uses.
///
/// Legacy-era projects are rejected with [`Error::UnsupportedEra`]:
/// per-testing-type resolution is a modern-era feature. Use
/// [`resolve_pre10_configuration`] directly for legacy projects.
pub fn resolve_configuration(
    options: &ResolveOptions,
    testing_type: TestingType,
) -> Result<CypressConfiguration> {
    match determine_cypress_era(options.argv, options.cwd)? {
        CypressEra::PreV10 => Err(Error::UnsupportedEra(
            "Unable to resolve configuration of Cypress versions below v10".to_string(),
        )),
        CypressEra::PostV10 => resolve_post10_configuration(options, testing_type),
    }
}

/// Project root: the `--project`/`-P` argument resolved against `cwd`, or
/// `cwd` itself.
pub fn resolve_project_path(argv: &[String], cwd: &Path) -> PathBuf {
    let custom = find_argument_value(argv, "--project", true)
        .or_else(|| find_argument_value(argv, "-P", false));

    match custom {
        Some(path) => ensure_is_absolute(cwd, path),
        None => cwd.to_path_buf(),
    }
}

pub(crate) fn ensure_is_absolute(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);

    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
