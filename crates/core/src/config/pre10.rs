//! Resolution of legacy-era (Cypress below v10) configuration.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    argv::{find_argument_value, parse_key_value_pairs, traverse_argv_matching},
    env::normalized_entries,
    error::{Error, Result},
    types::{StringOrArray, StringOrFalse},
};

use super::{
    ensure_is_absolute,
    environment::resolve_environment,
    era::PRE10_CONFIG_FILE_NAME,
    resolve_project_path,
    validate::{expect_env_object, expect_string, expect_string_or_array, expect_string_or_false},
    ResolveOptions,
};

/// The fully resolved legacy-era configuration.
///
/// This is a non-exhaustive subset of the legacy schema; unrecognized keys
/// from any source are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CypressPre10Configuration {
    pub project_root: PathBuf,
    pub integration_folder: String,
    pub fixtures_folder: StringOrFalse,
    pub support_file: StringOrFalse,
    pub test_files: StringOrArray,
    pub ignore_test_files: StringOrArray,
    pub env: HashMap<String, String>,
}

impl CypressPre10Configuration {
    fn defaults(project_root: PathBuf) -> Self {
        CypressPre10Configuration {
            project_root,
            integration_folder: "cypress/integration".to_string(),
            fixtures_folder: StringOrFalse::from("cypress/fixtures"),
            support_file: StringOrFalse::from("cypress/support/index.js"),
            test_files: StringOrArray::from("**/*.*"),
            ignore_test_files: StringOrArray::from("*.hot-update.js"),
            env: HashMap::new(),
        }
    }

    fn apply(&mut self, origin: PartialConfiguration) {
        if let Some(project_root) = origin.project_root {
            self.project_root = PathBuf::from(project_root);
        }
        if let Some(integration_folder) = origin.integration_folder {
            self.integration_folder = integration_folder;
        }
        if let Some(fixtures_folder) = origin.fixtures_folder {
            self.fixtures_folder = fixtures_folder;
        }
        if let Some(support_file) = origin.support_file {
            self.support_file = support_file;
        }
        if let Some(test_files) = origin.test_files {
            self.test_files = test_files;
        }
        if let Some(ignore_test_files) = origin.ignore_test_files {
            self.ignore_test_files = ignore_test_files;
        }
        if let Some(env) = origin.env {
            self.env = env;
        }
    }
}

#[derive(Debug, Clone, Default)]
struct PartialConfiguration {
    project_root: Option<String>,
    integration_folder: Option<String>,
    fixtures_folder: Option<StringOrFalse>,
    support_file: Option<StringOrFalse>,
    test_files: Option<StringOrArray>,
    ignore_test_files: Option<StringOrArray>,
    env: Option<HashMap<String, String>>,
}

impl PartialConfiguration {
    fn apply_entry(&mut self, key: &str, value: &Value) -> Result<()> {
        match key {
            "projectRoot" => self.project_root = Some(expect_string(key, value)?),
            "integrationFolder" => self.integration_folder = Some(expect_string(key, value)?),
            "fixturesFolder" => self.fixtures_folder = Some(expect_string_or_false(key, value)?),
            "supportFile" => self.support_file = Some(expect_string_or_false(key, value)?),
            "testFiles" => self.test_files = Some(expect_string_or_array(key, value)?),
            "ignoreTestFiles" => {
                self.ignore_test_files = Some(expect_string_or_array(key, value)?);
            }
            "env" => self.env = Some(expect_env_object(key, value)?),
            _ => {}
        }

        Ok(())
    }
}

/// Resolve the legacy-era configuration.
///
/// Same source precedence as the modern resolver. The configuration file is
/// flat JSON; a missing file leaves the file origin empty rather than
/// failing, since `cypress.json` was optional for legacy projects.
pub fn resolve_pre10_configuration(options: &ResolveOptions) -> Result<CypressPre10Configuration> {
    debug!("attempting to resolve Cypress configuration (pre-v10)");

    let project_path = resolve_project_path(options.argv, options.cwd);

    let mut arguments: Vec<&str> = traverse_argv_matching(options.argv, "--config", true)
        .chain(traverse_argv_matching(options.argv, "-c", false))
        .collect();

    arguments.reverse();

    let mut cli_origin = PartialConfiguration::default();

    for argument in arguments {
        for (key, value) in parse_key_value_pairs(argument) {
            cli_origin.apply_entry(&key, &Value::String(value))?;
        }
    }

    let mut env_origin = PartialConfiguration::default();

    for (key, value) in normalized_entries(options.env) {
        env_origin.apply_entry(&key, &Value::String(value))?;
    }

    let config_file = find_argument_value(options.argv, "--config-file", true)
        .or_else(|| find_argument_value(options.argv, "-C", false))
        .unwrap_or(PRE10_CONFIG_FILE_NAME);

    let config_path = ensure_is_absolute(&project_path, config_file);

    let mut config_origin = PartialConfiguration::default();

    if config_path.exists() {
        for (key, value) in parse_json_file(&config_path)? {
            config_origin.apply_entry(&key, &value)?;
        }
    }

    let mut configuration = CypressPre10Configuration::defaults(project_path.clone());

    for origin in [config_origin, env_origin, cli_origin] {
        configuration.apply(origin);
    }

    configuration.env = resolve_environment(
        options.argv,
        options.env,
        &project_path,
        std::mem::take(&mut configuration.env),
    )?;

    debug!("resolved configuration of {configuration:?}");

    Ok(configuration)
}

fn parse_json_file(path: &Path) -> Result<serde_json::Map<String, Value>> {
    let content = fs::read_to_string(path)?;

    let json: Value = serde_json::from_str(&content)
        .map_err(|_| Error::Validation(format!("Malformed {}, expected JSON", path.display())))?;

    match json {
        Value::Object(object) => Ok(object),
        _ => Err(Error::Validation(format!(
            "Malformed {}, expected an object",
            path.display()
        ))),
    }
}
