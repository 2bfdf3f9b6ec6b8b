//! Detection of which configuration-file schema a project uses.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::{
    argv::find_argument_value,
    error::{Error, Result},
    types::CypressEra,
};

use super::{ensure_is_absolute, resolve_project_path};

/// The legacy-era configuration filename.
pub const PRE10_CONFIG_FILE_NAME: &str = "cypress.json";

/// The modern-era configuration filenames.
pub const POST10_CONFIG_FILE_NAMES: [&str; 4] = [
    "cypress.config.js",
    "cypress.config.cjs",
    "cypress.config.mjs",
    "cypress.config.ts",
];

/// Determine the configuration era of a project.
///
/// An explicit `--config-file`/`-C` argument decides by filename; its
/// filename must be recognized and the file must exist. Otherwise the project
/// root is scanned for exactly one recognized configuration file.
pub fn determine_cypress_era(argv: &[String], cwd: &Path) -> Result<CypressEra> {
    let project_root = resolve_project_path(argv, cwd);

    let explicit = find_argument_value(argv, "--config-file", true)
        .or_else(|| find_argument_value(argv, "-C", false));

    let era = match explicit {
        Some(explicit) => {
            let path = ensure_is_absolute(&project_root, explicit);
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default();

            let era = if name == PRE10_CONFIG_FILE_NAME {
                CypressEra::PreV10
            } else if POST10_CONFIG_FILE_NAMES.contains(&name) {
                CypressEra::PostV10
            } else {
                return Err(Error::UnrecognizedConfigurationFile(format!(
                    "Unrecognized file {name}"
                )));
            };

            if !path.exists() {
                return Err(Error::MissingConfigurationFile(
                    "Missing Cypress configuration file.".to_string(),
                ));
            }

            era
        }
        None => {
            let mut names = Vec::new();

            for entry in fs::read_dir(&project_root)? {
                let name = entry?.file_name();

                if let Some(name) = name.to_str() {
                    if name == PRE10_CONFIG_FILE_NAME || POST10_CONFIG_FILE_NAMES.contains(&name) {
                        names.push(name.to_owned());
                    }
                }
            }

            match names.as_slice() {
                [] => {
                    return Err(Error::MissingConfigurationFile(
                        "Unable to find a Cypress configuration file.".to_string(),
                    ));
                }
                [name] => {
                    if name == PRE10_CONFIG_FILE_NAME {
                        CypressEra::PreV10
                    } else {
                        CypressEra::PostV10
                    }
                }
                _ => {
                    return Err(Error::MultipleConfigurationFiles(
                        "Found multiple Cypress configuration files.".to_string(),
                    ));
                }
            }
        }
    };

    debug!(
        "determined project {} to be {:?}",
        project_root.display(),
        era
    );

    Ok(era)
}
