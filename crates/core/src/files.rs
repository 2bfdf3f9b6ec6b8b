//! Expansion of resolved spec patterns into concrete test-file lists.

use std::path::PathBuf;

use tracing::debug;

use crate::{
    config::{ensure_is_absolute, CypressConfiguration, CypressPre10Configuration},
    error::Result,
    glob::{glob_files, matches_pattern, GlobOptions},
};

/// Expand the resolved configuration's spec patterns into a deduplicated,
/// sorted list of absolute test-file paths. An empty result is valid.
pub fn resolve_test_files(configuration: &CypressConfiguration) -> Result<Vec<PathBuf>> {
    resolve_post10_test_files(configuration)
}

/// Modern-era test-file resolution: every include pattern is expanded
/// against the project root with the exclude patterns as the glob engine's
/// ignore list.
pub fn resolve_post10_test_files(
    configuration: &CypressConfiguration,
) -> Result<Vec<PathBuf>> {
    let ignore: Vec<String> = configuration
        .exclude_spec_pattern
        .iter()
        .map(str::to_owned)
        .collect();

    let options = GlobOptions {
        cwd: &configuration.project_root,
        ignore: &ignore,
    };

    let mut files = Vec::new();

    for pattern in configuration.spec_pattern.iter() {
        files.extend(glob_files(pattern, &options)?);
    }

    files.sort();
    files.dedup();

    debug!("resolved test files {files:?}");

    Ok(files)
}

/// Legacy-era test-file resolution: patterns are expanded against the
/// integration folder with the support file and the fixtures subtree as
/// built-in ignores, then filtered through a second per-pattern exclusion
/// pass over `ignoreTestFiles`.
pub fn resolve_pre10_test_files(
    configuration: &CypressPre10Configuration,
) -> Result<Vec<PathBuf>> {
    let mut ignore = Vec::new();

    if let Some(support_file) = configuration.support_file.as_option() {
        ignore.push(support_file.to_owned());
    }

    if let Some(fixtures_folder) = configuration.fixtures_folder.as_option() {
        ignore.push(format!("{}/**/*", fixtures_folder.trim_end_matches('/')));
    }

    let cwd = ensure_is_absolute(
        &configuration.project_root,
        &configuration.integration_folder,
    );

    let options = GlobOptions {
        cwd: &cwd,
        ignore: &ignore,
    };

    let mut files = Vec::new();

    for pattern in configuration.test_files.iter() {
        files.extend(glob_files(pattern, &options)?);
    }

    let mut resolved = Vec::new();

    for file in files {
        let mut excluded = false;

        for pattern in configuration.ignore_test_files.iter() {
            if matches_pattern(&file, pattern)? {
                excluded = true;
                break;
            }
        }

        if !excluded {
            resolved.push(file);
        }
    }

    resolved.sort();
    resolved.dedup();

    debug!("resolved test files {resolved:?}");

    Ok(resolved)
}
