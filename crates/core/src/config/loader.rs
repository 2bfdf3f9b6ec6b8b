use std::path::Path;

use serde_json::Value;

use crate::error::Result;

/// Loads a configuration module by executing it ("dangerous parsing").
///
/// Implementations evaluate the file at `path`, typically by delegating to a
/// JavaScript runtime with a source transform applied first for TypeScript
/// and ES-module sources, and return the module's exports as JSON-compatible
/// data. A non-null `default` key on the returned object takes precedence
/// over the object itself.
///
/// Supplying a loader through [`super::ResolveOptions`] accepts arbitrary
/// computed configuration values, at the cost of executing untrusted code;
/// without one, the safe parser extracts literal values only. The loader is
/// scoped to the borrow passed into a single resolution call and nothing is
/// installed globally.
pub trait ModuleLoader {
    fn load(&self, path: &Path) -> Result<Value>;
}
