//! Shared fixture for configuration-resolution tests: a temporary project
//! directory populated with configuration files.
#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Project {
            dir: TempDir::new().unwrap(),
        }
    }

    /// A project with the given `cypress.config.js` contents.
    pub fn with_config(source: &str) -> Self {
        let project = Self::empty();
        project.write("cypress.config.js", source);
        project
    }

    pub fn write(&self, path: &str, content: &str) -> &Self {
        let path = self.dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

pub fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}

pub fn env(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
