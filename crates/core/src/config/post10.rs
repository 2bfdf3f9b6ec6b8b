//! Resolution of modern-era (Cypress v10+) configuration.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    argv::{find_argument_value, parse_key_value_pairs, traverse_argv_matching},
    env::normalized_entries,
    error::{Error, Result},
    parser::ConfigSourceParser,
    types::{StringOrArray, TestingType},
};

use super::{
    ensure_is_absolute,
    environment::resolve_environment,
    era::POST10_CONFIG_FILE_NAMES,
    loader::ModuleLoader,
    resolve_project_path,
    validate::{expect_env_object, expect_string, expect_string_or_array},
    ResolveOptions,
};

/// The fully resolved modern-era configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CypressPost10Configuration {
    pub project_root: PathBuf,
    pub spec_pattern: StringOrArray,
    pub exclude_spec_pattern: StringOrArray,
    pub reporter: String,
    pub env: HashMap<String, String>,
}

impl CypressPost10Configuration {
    /// The hardcoded per-testing-type baseline.
    fn defaults(testing_type: TestingType, project_root: PathBuf) -> Self {
        let (spec_pattern, exclude_spec_pattern) = match testing_type {
            TestingType::E2e => (
                StringOrArray::from("cypress/e2e/**/*.cy.{js,jsx,ts,tsx}"),
                StringOrArray::from("*.hot-update.js"),
            ),
            TestingType::Component => (
                StringOrArray::from("**/*.cy.{js,jsx,ts,tsx}"),
                StringOrArray::from(vec!["/snapshots/*", "/image_snapshots/*"]),
            ),
        };

        CypressPost10Configuration {
            project_root,
            spec_pattern,
            exclude_spec_pattern,
            reporter: "spec".to_string(),
            env: HashMap::new(),
        }
    }

    fn apply(&mut self, origin: PartialConfiguration) {
        if let Some(project_root) = origin.project_root {
            self.project_root = PathBuf::from(project_root);
        }
        if let Some(spec_pattern) = origin.spec_pattern {
            self.spec_pattern = spec_pattern;
        }
        if let Some(exclude_spec_pattern) = origin.exclude_spec_pattern {
            self.exclude_spec_pattern = exclude_spec_pattern;
        }
        if let Some(reporter) = origin.reporter {
            self.reporter = reporter;
        }
        if let Some(env) = origin.env {
            self.env = env;
        }
    }
}

/// A partial configuration produced by one source.
#[derive(Debug, Clone, Default)]
struct PartialConfiguration {
    project_root: Option<String>,
    spec_pattern: Option<StringOrArray>,
    exclude_spec_pattern: Option<StringOrArray>,
    reporter: Option<String>,
    env: Option<HashMap<String, String>>,
}

impl PartialConfiguration {
    /// Validate one entry against the recognized-key allow-list. Recognized
    /// keys with a value of the wrong type are an error regardless of
    /// source; unrecognized keys are dropped silently.
    fn apply_entry(&mut self, key: &str, value: &Value) -> Result<()> {
        match key {
            "projectRoot" => self.project_root = Some(expect_string(key, value)?),
            "specPattern" => self.spec_pattern = Some(expect_string_or_array(key, value)?),
            "excludeSpecPattern" => {
                self.exclude_spec_pattern = Some(expect_string_or_array(key, value)?);
            }
            "reporter" => self.reporter = Some(expect_string(key, value)?),
            "env" => self.env = Some(expect_env_object(key, value)?),
            _ => {}
        }

        Ok(())
    }
}

/// Resolve the modern-era configuration for one testing type.
///
/// Sources are merged key-by-key in precedence order `Default < ConfigFile <
/// Environment < CommandLine`; the `env` field is then replaced by the
/// independently resolved environment.
pub fn resolve_post10_configuration(
    options: &ResolveOptions,
    testing_type: TestingType,
) -> Result<CypressPost10Configuration> {
    debug!("attempting to resolve Cypress configuration ({testing_type})");

    let project_path = resolve_project_path(options.argv, options.cwd);

    let cli_origin = resolve_cli_origin(options.argv)?;

    let mut env_origin = PartialConfiguration::default();

    for (key, value) in normalized_entries(options.env) {
        env_origin.apply_entry(&key, &Value::String(value))?;
    }

    let config_file = resolve_configuration_file(options.argv, &project_path)?;
    let config_path = ensure_is_absolute(&project_path, &config_file);

    let mut config_origin = PartialConfiguration::default();

    for (key, value) in parse_configuration_file(&config_path, testing_type, options.loader)? {
        config_origin.apply_entry(&key, &value)?;
    }

    let mut configuration =
        CypressPost10Configuration::defaults(testing_type, project_path.clone());

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

/// Fold every `--config`/`-c` occurrence into one partial configuration.
///
/// Occurrences are collected long-form-first in reverse order and the whole
/// collection is reversed before folding, so the long form's last occurrence
/// wins overall.
fn resolve_cli_origin(argv: &[String]) -> Result<PartialConfiguration> {
    let mut arguments: Vec<&str> = traverse_argv_matching(argv, "--config", true)
        .chain(traverse_argv_matching(argv, "-c", false))
        .collect();

    arguments.reverse();

    let mut origin = PartialConfiguration::default();

    for argument in arguments {
        for (key, value) in parse_key_value_pairs(argument) {
            origin.apply_entry(&key, &Value::String(value))?;
        }
    }

    Ok(origin)
}

fn resolve_configuration_file(argv: &[String], project_root: &Path) -> Result<String> {
    if let Some(value) = find_argument_value(argv, "--config-file", true)
        .or_else(|| find_argument_value(argv, "-C", false))
    {
        return Ok(value.to_owned());
    }

    find_configuration_in_fs(project_root)
}

fn find_configuration_in_fs(project_root: &Path) -> Result<String> {
    let mut names = Vec::new();

    for entry in fs::read_dir(project_root)? {
        let name = entry?.file_name();

        if let Some(name) = name.to_str() {
            if POST10_CONFIG_FILE_NAMES.contains(&name) {
                names.push(name.to_owned());
            }
        }
    }

    match names.len() {
        0 => Err(Error::MissingConfigurationFile(
            "Unable to find a Cypress configuration file.".to_string(),
        )),
        1 => Ok(names.remove(0)),
        _ => Err(Error::MultipleConfigurationFiles(
            "Found multiple Cypress configuration files.".to_string(),
        )),
    }
}

/// The configuration file's entries for the active testing type, either
/// extracted safely or loaded through the supplied module loader.
fn parse_configuration_file(
    path: &Path,
    testing_type: TestingType,
    loader: Option<&dyn ModuleLoader>,
) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Err(Error::MissingConfigurationFile(
            "Missing Cypress configuration file.".to_string(),
        ));
    }

    match loader {
        Some(loader) => {
            let mut exported = loader.load(path)?;

            if let Value::Object(object) = &exported {
                if let Some(default) = object.get("default") {
                    if !default.is_null() {
                        exported = default.clone();
                    }
                }
            }

            let sub_object = match exported {
                Value::Object(mut object) => object.remove(&testing_type.to_string()),
                other => {
                    debug!("configuration module exported {other}, expected an object");
                    None
                }
            };

            match sub_object {
                Some(Value::Object(properties)) => Ok(properties),
                _ => Ok(Map::new()),
            }
        }
        None => {
            let source = fs::read_to_string(path)?;
            let mut parser = ConfigSourceParser::new()?;
            let configuration = parser.parse(&source)?;

            Ok(configuration
                .testing_type(testing_type)
                .cloned()
                .unwrap_or_default())
        }
    }
}
