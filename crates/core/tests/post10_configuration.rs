mod common;

use std::collections::HashMap;
use std::path::Path;

use serde_json::{json, Value};

use cypress_configuration_core::{
    resolve_post10_configuration, CypressPost10Configuration, Error, ModuleLoader, ResolveOptions,
    Result, StringOrArray, TestingType,
};

use common::{argv, env, Project};

const TESTING_TYPES: [TestingType; 2] = [TestingType::E2e, TestingType::Component];

fn default_spec_pattern(testing_type: TestingType) -> StringOrArray {
    match testing_type {
        TestingType::E2e => StringOrArray::from("cypress/e2e/**/*.cy.{js,jsx,ts,tsx}"),
        TestingType::Component => StringOrArray::from("**/*.cy.{js,jsx,ts,tsx}"),
    }
}

fn resolve(
    project: &Project,
    args: &[&str],
    environment: &[(&str, &str)],
    testing_type: TestingType,
) -> Result<CypressPost10Configuration> {
    let argv = argv(args);
    let env = env(environment);

    resolve_post10_configuration(
        &ResolveOptions {
            argv: &argv,
            env: &env,
            cwd: project.path(),
            loader: None,
        },
        testing_type,
    )
}

#[test]
fn default_resolution_e2e() {
    let project = Project::with_config("module.exports = {};");
    let configuration = resolve(&project, &[], &[], TestingType::E2e).unwrap();

    assert_eq!(configuration.project_root, project.path());
    assert_eq!(
        configuration.spec_pattern,
        StringOrArray::from("cypress/e2e/**/*.cy.{js,jsx,ts,tsx}")
    );
    assert_eq!(
        configuration.exclude_spec_pattern,
        StringOrArray::from("*.hot-update.js")
    );
    assert_eq!(configuration.reporter, "spec");
    assert_eq!(configuration.env, HashMap::new());
}

#[test]
fn default_resolution_component() {
    let project = Project::with_config("module.exports = {};");
    let configuration = resolve(&project, &[], &[], TestingType::Component).unwrap();

    assert_eq!(
        configuration.spec_pattern,
        StringOrArray::from("**/*.cy.{js,jsx,ts,tsx}")
    );
    assert_eq!(
        configuration.exclude_spec_pattern,
        StringOrArray::from(vec!["/snapshots/*", "/image_snapshots/*"])
    );
}

#[test]
fn cli_override_in_all_three_forms() {
    for testing_type in TESTING_TYPES {
        for args in [
            ["--config", "specPattern=foo/bar"].as_slice(),
            ["--config=specPattern=foo/bar"].as_slice(),
            ["-c", "specPattern=foo/bar"].as_slice(),
        ] {
            let project = Project::with_config("module.exports = {};");
            let configuration = resolve(&project, args, &[], testing_type).unwrap();

            assert_eq!(
                configuration.spec_pattern,
                StringOrArray::from("foo/bar"),
                "args: {args:?}"
            );
        }
    }
}

#[test]
fn cli_override_with_surrounding_comma_delimited_configuration() {
    for args in [
        ["--config", "foo=bar,specPattern=foo/bar"].as_slice(),
        ["--config=foo=bar,specPattern=foo/bar"].as_slice(),
        ["-c", "specPattern=foo/bar,foo=bar"].as_slice(),
        ["--config=specPattern=foo/bar,foo=bar"].as_slice(),
    ] {
        let project = Project::with_config("module.exports = {};");
        let configuration = resolve(&project, args, &[], TestingType::E2e).unwrap();

        assert_eq!(
            configuration.spec_pattern,
            StringOrArray::from("foo/bar"),
            "args: {args:?}"
        );
    }
}

#[test]
fn repeated_cli_override_last_occurrence_wins() {
    for args in [
        ["--config", "specPattern=baz", "--config", "specPattern=foo/bar"].as_slice(),
        ["--config=specPattern=baz", "--config=specPattern=foo/bar"].as_slice(),
        ["-c", "specPattern=baz", "-c", "specPattern=foo/bar"].as_slice(),
    ] {
        let project = Project::with_config("module.exports = {};");
        let configuration = resolve(&project, args, &[], TestingType::E2e).unwrap();

        assert_eq!(
            configuration.spec_pattern,
            StringOrArray::from("foo/bar"),
            "args: {args:?}"
        );
    }
}

#[test]
fn environment_variable_overrides() {
    for testing_type in TESTING_TYPES {
        for name in [
            "CYPRESS_specPattern",
            "cypress_specPattern",
            "CYPRESS_spec_pattern",
            "cypress_spec_pattern",
            "CYPRESS_SPEC_PATTERN",
            "cypress_SPEC_PATTERN",
        ] {
            let project = Project::with_config("module.exports = {};");
            let configuration =
                resolve(&project, &[], &[(name, "foo/bar")], testing_type).unwrap();

            assert_eq!(
                configuration.spec_pattern,
                StringOrArray::from("foo/bar"),
                "variable: {name}"
            );
        }
    }
}

#[test]
fn lowercase_variable_without_underscores_does_not_override() {
    for testing_type in TESTING_TYPES {
        for name in ["CYPRESS_specpattern", "cypress_specpattern"] {
            let project = Project::with_config("module.exports = {};");
            let configuration =
                resolve(&project, &[], &[(name, "foo/bar")], testing_type).unwrap();

            assert_eq!(
                configuration.spec_pattern,
                default_spec_pattern(testing_type),
                "variable: {name}"
            );
        }
    }
}

#[test]
fn safe_parsing_of_all_recognized_file_forms() {
    for testing_type in TESTING_TYPES {
        let cjs = format!("module.exports = {{ {testing_type}: {{ specPattern: 'foo/bar' }} }};");
        let esm = format!("export default {{ {testing_type}: {{ specPattern: 'foo/bar' }} }};");
        let ts = format!(
            "declare const foo: string;\nexport default {{ {testing_type}: {{ specPattern: 'foo/bar' }} }};"
        );

        let cases: [(&str, &[&str], &str); 4] = [
            ("cypress.config.js", &[], cjs.as_str()),
            ("cypress.config.cjs", &["--config-file", "cypress.config.cjs"], cjs.as_str()),
            ("cypress.config.mjs", &["--config-file", "cypress.config.mjs"], esm.as_str()),
            ("cypress.config.ts", &["--config-file", "cypress.config.ts"], ts.as_str()),
        ];

        for (file, args, source) in cases {
            let project = Project::empty();
            project.write(file, source);

            let configuration = resolve(&project, args, &[], testing_type).unwrap();

            assert_eq!(
                configuration.spec_pattern,
                StringOrArray::from("foo/bar"),
                "file: {file}"
            );
        }
    }
}

#[test]
fn config_file_in_custom_location() {
    for args in [
        ["--config-file", "foo.js"].as_slice(),
        ["--config-file=foo.js"].as_slice(),
        ["-C", "foo.js"].as_slice(),
    ] {
        let project = Project::empty();
        project.write(
            "foo.js",
            "module.exports = { e2e: { specPattern: 'foo/bar' } };",
        );

        let configuration = resolve(&project, args, &[], TestingType::E2e).unwrap();

        assert_eq!(
            configuration.spec_pattern,
            StringOrArray::from("foo/bar"),
            "args: {args:?}"
        );
    }
}

#[test]
fn custom_project_path() {
    for args in [
        ["--project", "foo"].as_slice(),
        ["--project=foo"].as_slice(),
        ["-P", "foo"].as_slice(),
    ] {
        let project = Project::empty();
        project.write(
            "foo/cypress.config.js",
            "module.exports = { e2e: { specPattern: 'foo/bar' } };",
        );

        let configuration = resolve(&project, args, &[], TestingType::E2e).unwrap();

        assert_eq!(configuration.project_root, project.path().join("foo"));
        assert_eq!(configuration.spec_pattern, StringOrArray::from("foo/bar"));
    }
}

#[test]
fn custom_project_path_with_custom_config_location() {
    for args in [
        ["--config-file", "foo.js", "--project", "foo"].as_slice(),
        ["--config-file=foo.js", "--project", "foo"].as_slice(),
        ["-C", "foo.js", "--project", "foo"].as_slice(),
    ] {
        let project = Project::empty();
        project.write(
            "foo/foo.js",
            "module.exports = { e2e: { specPattern: 'foo/bar' } };",
        );

        let configuration = resolve(&project, args, &[], TestingType::E2e).unwrap();

        assert_eq!(configuration.spec_pattern, StringOrArray::from("foo/bar"));
    }
}

#[test]
fn testing_types_resolve_independently() {
    let project = Project::with_config(
        "module.exports = { e2e: { specPattern: 'e2e/**' }, component: { specPattern: 'cmp/**' } };",
    );

    let e2e = resolve(&project, &[], &[], TestingType::E2e).unwrap();
    let component = resolve(&project, &[], &[], TestingType::Component).unwrap();

    assert_eq!(e2e.spec_pattern, StringOrArray::from("e2e/**"));
    assert_eq!(component.spec_pattern, StringOrArray::from("cmp/**"));
}

#[test]
fn reporter_from_config_file() {
    let project = Project::with_config("module.exports = { e2e: { reporter: 'junit' } };");
    let configuration = resolve(&project, &[], &[], TestingType::E2e).unwrap();

    assert_eq!(configuration.reporter, "junit");
}

#[test]
fn source_precedence_is_cli_over_environment_over_config_file() {
    let project =
        Project::with_config("module.exports = { e2e: { specPattern: 'from-file' } };");

    let from_env = resolve(
        &project,
        &[],
        &[("CYPRESS_specPattern", "from-env")],
        TestingType::E2e,
    )
    .unwrap();
    assert_eq!(from_env.spec_pattern, StringOrArray::from("from-env"));

    let from_cli = resolve(
        &project,
        &["--config", "specPattern=from-cli"],
        &[("CYPRESS_specPattern", "from-env")],
        TestingType::E2e,
    )
    .unwrap();
    assert_eq!(from_cli.spec_pattern, StringOrArray::from("from-cli"));
}

#[test]
fn missing_configuration_file() {
    let project = Project::empty();
    let error = resolve(&project, &[], &[], TestingType::E2e).unwrap_err();

    assert!(matches!(error, Error::MissingConfigurationFile(_)));
}

#[test]
fn multiple_configuration_files() {
    let project = Project::with_config("module.exports = {};");
    project.write("cypress.config.ts", "export default {};");

    let error = resolve(&project, &[], &[], TestingType::E2e).unwrap_err();

    assert!(matches!(error, Error::MultipleConfigurationFiles(_)));
}

#[test]
fn explicitly_named_nonexistent_file() {
    let project = Project::empty();
    let error = resolve(&project, &["--config-file", "foo.js"], &[], TestingType::E2e).unwrap_err();

    assert!(matches!(error, Error::MissingConfigurationFile(_)));
}

#[test]
fn invalid_cli_value_type() {
    let project = Project::with_config("module.exports = {};");
    let error = resolve(&project, &["--config", "env=foo"], &[], TestingType::E2e).unwrap_err();

    assert!(matches!(error, Error::Validation(_)));
    assert!(error.to_string().contains("Expected a plain object (env)"));
}

#[test]
fn non_literal_configuration_value() {
    let project =
        Project::with_config("module.exports = { e2e: { specPattern: getPattern() } };");
    let error = resolve(&project, &[], &[], TestingType::E2e).unwrap_err();

    assert!(matches!(error, Error::Parse(_)));
}

struct StubLoader(Value);

impl ModuleLoader for StubLoader {
    fn load(&self, _path: &Path) -> Result<Value> {
        Ok(self.0.clone())
    }
}

#[test]
fn dangerous_parsing_through_a_loader() {
    let project = Project::with_config(
        "module.exports = { e2e: { specPattern: ['foo', 'bar'].join('/') } };",
    );

    let loader = StubLoader(json!({
        "default": { "e2e": { "specPattern": "foo/bar" } }
    }));

    let args = argv(&[]);
    let environment = env(&[]);

    let configuration = resolve_post10_configuration(
        &ResolveOptions {
            argv: &args,
            env: &environment,
            cwd: project.path(),
            loader: Some(&loader),
        },
        TestingType::E2e,
    )
    .unwrap();

    assert_eq!(configuration.spec_pattern, StringOrArray::from("foo/bar"));
}

#[test]
fn dangerous_parsing_without_default_export() {
    let project = Project::with_config("module.exports = {};");

    let loader = StubLoader(json!({
        "component": { "specPattern": ["a/**", "b/**"] }
    }));

    let args = argv(&[]);
    let environment = env(&[]);

    let configuration = resolve_post10_configuration(
        &ResolveOptions {
            argv: &args,
            env: &environment,
            cwd: project.path(),
            loader: Some(&loader),
        },
        TestingType::Component,
    )
    .unwrap();

    assert_eq!(
        configuration.spec_pattern,
        StringOrArray::from(vec!["a/**", "b/**"])
    );
}

#[test]
fn dangerous_parsing_validates_types() {
    let project = Project::with_config("module.exports = {};");

    let loader = StubLoader(json!({
        "e2e": { "specPattern": 3 }
    }));

    let args = argv(&[]);
    let environment = env(&[]);

    let error = resolve_post10_configuration(
        &ResolveOptions {
            argv: &args,
            env: &environment,
            cwd: project.path(),
            loader: Some(&loader),
        },
        TestingType::E2e,
    )
    .unwrap_err();

    assert!(matches!(error, Error::Validation(_)));
}
