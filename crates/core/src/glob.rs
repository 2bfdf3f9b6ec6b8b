//! A small glob engine over `walkdir` + `globset`.
//!
//! Patterns follow glob semantics where `*` does not cross path separators,
//! `**` does, and brace sets (`*.cy.{js,ts}`) expand. Dotfiles are matched
//! like any other file.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Options for a single expansion: the directory to expand within and the
/// ignore list applied to every match.
pub struct GlobOptions<'a> {
    pub cwd: &'a Path,
    pub ignore: &'a [String],
}

fn compile(pattern: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| Error::Pattern(format!("Invalid glob pattern '{pattern}': {e}")))
}

struct IgnoreMatcher {
    matcher: GlobMatcher,
    match_basename: bool,
}

impl IgnoreMatcher {
    fn new(pattern: &str) -> Result<Self> {
        Ok(IgnoreMatcher {
            matcher: compile(pattern)?,
            match_basename: !pattern.contains('/'),
        })
    }

    fn is_match(&self, relative: &Path) -> bool {
        if self.matcher.is_match(relative) {
            return true;
        }

        self.match_basename
            && relative
                .file_name()
                .is_some_and(|name| self.matcher.is_match(Path::new(name)))
    }
}

/// Expand `pattern` against `options.cwd`, returning the sorted paths of
/// matching files (directories are never returned). Matches are dropped when
/// any ignore pattern matches their relative path, or their basename for
/// slash-free ignore patterns. Paths are absolute when `cwd` is absolute.
pub fn glob_files(pattern: &str, options: &GlobOptions) -> Result<Vec<PathBuf>> {
    let include = compile(pattern)?;

    let ignore = options
        .ignore
        .iter()
        .map(|pattern| IgnoreMatcher::new(pattern))
        .collect::<Result<Vec<_>>>()?;

    let mut files = Vec::new();

    for entry in WalkDir::new(options.cwd).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(options.cwd) else {
            continue;
        };

        if !include.is_match(relative) {
            continue;
        }

        if ignore.iter().any(|matcher| matcher.is_match(relative)) {
            continue;
        }

        files.push(entry.path().to_path_buf());
    }

    files.sort();

    Ok(files)
}

/// Match a single path against a pattern. Slash-free patterns match against
/// the path's basename; dotfiles receive no special treatment.
pub fn matches_pattern(path: &Path, pattern: &str) -> Result<bool> {
    let matcher = compile(pattern)?;

    if !pattern.contains('/') {
        if let Some(name) = path.file_name() {
            return Ok(matcher.is_match(Path::new(name)));
        }
    }

    Ok(matcher.is_match(path))
}
