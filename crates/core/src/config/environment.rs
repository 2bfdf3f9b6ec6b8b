//! Resolution of the `env` sub-map through its own four-source precedence:
//! `cypress.env.json` < configuration file < prefixed environment variables
//! < CLI `--env`/`-e`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    argv::{parse_key_value_pairs, traverse_argv_matching},
    env::prefixed_entries,
    error::{Error, Result},
};

/// The project-local environment file.
pub const ENVIRONMENT_FILE_NAME: &str = "cypress.env.json";

/// Resolve the environment for a project. `config_env` is the `env` value of
/// the already-merged configuration.
///
/// Unlike configuration keys, env keys are unrestricted: every key from every
/// source is retained, and prefixed environment variables contribute their
/// remainder verbatim (no camelCase normalization). `--env` follows a
/// single-occurrence policy: when repeated, only the last occurrence's
/// comma-list is used and earlier occurrences are discarded entirely.
pub fn resolve_environment(
    argv: &[String],
    env: &HashMap<String, String>,
    project_path: &Path,
    config_env: HashMap<String, String>,
) -> Result<HashMap<String, String>> {
    debug!(
        "attempting to resolve Cypress environment of {}",
        project_path.display()
    );

    let entries: Vec<&str> = traverse_argv_matching(argv, "--env", true)
        .chain(traverse_argv_matching(argv, "-e", false))
        .collect();

    if entries.len() > 1 {
        warn!(
            "You have specified -e / --env multiple times. This is likely a mistake, as only the \
             last one will take affect. Multiple values should instead be comma-separated."
        );
    }

    let mut environment = read_environment_file(project_path)?;

    environment.extend(config_env);

    for (key, value) in prefixed_entries(env) {
        environment.insert(key, value);
    }

    if let Some(argument) = entries.first() {
        for (key, value) in parse_key_value_pairs(argument) {
            environment.insert(key, value);
        }
    }

    Ok(environment)
}

fn read_environment_file(project_path: &Path) -> Result<HashMap<String, String>> {
    let path = project_path.join(ENVIRONMENT_FILE_NAME);

    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(&path)?;

    let json: Value = serde_json::from_str(&content)
        .map_err(|_| Error::Validation(format!("Malformed {}, expected JSON", path.display())))?;

    let object = json.as_object().ok_or_else(|| {
        Error::Validation(format!("Malformed {}, expected an object", path.display()))
    })?;

    let mut environment = HashMap::new();

    for (key, value) in object {
        match value {
            Value::String(value) => {
                environment.insert(key.clone(), value.clone());
            }
            other => debug!(
                "skipping non-string value for '{key}' ({other}) in {}",
                path.display()
            ),
        }
    }

    Ok(environment)
}
