//! Per-key type predicates, applied uniformly to every configuration source.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::{
    error::{Error, Result},
    types::{StringOrArray, StringOrFalse},
};

pub(crate) fn expect_string(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(value) => Ok(value.clone()),
        other => Err(Error::Validation(format!(
            "Expected a string ({key}), but got {other}"
        ))),
    }
}

pub(crate) fn expect_string_or_array(key: &str, value: &Value) -> Result<StringOrArray> {
    match value {
        Value::String(value) => Ok(StringOrArray::One(value.clone())),
        Value::Array(values) => {
            let mut patterns = Vec::with_capacity(values.len());

            for value in values {
                match value {
                    Value::String(value) => patterns.push(value.clone()),
                    _ => {
                        return Err(Error::Validation(format!(
                            "Expected a string or array of strings ({key}), but got {value}"
                        )));
                    }
                }
            }

            Ok(StringOrArray::Many(patterns))
        }
        other => Err(Error::Validation(format!(
            "Expected a string or array of strings ({key}), but got {other}"
        ))),
    }
}

pub(crate) fn expect_string_or_false(key: &str, value: &Value) -> Result<StringOrFalse> {
    match value {
        Value::String(value) => Ok(StringOrFalse::Value(value.clone())),
        Value::Bool(false) => Ok(StringOrFalse::False),
        other => Err(Error::Validation(format!(
            "Expected a string or false ({key}), but got {other}"
        ))),
    }
}

/// An `env` value must be a plain object; string-valued entries are kept,
/// anything else inside it is skipped.
pub(crate) fn expect_env_object(key: &str, value: &Value) -> Result<HashMap<String, String>> {
    match value {
        Value::Object(object) => {
            let mut env = HashMap::new();

            for (name, value) in object {
                match value {
                    Value::String(value) => {
                        env.insert(name.clone(), value.clone());
                    }
                    other => debug!("skipping non-string env value for '{name}' ({other})"),
                }
            }

            Ok(env)
        }
        other => Err(Error::Validation(format!(
            "Expected a plain object ({key}), but got {other}"
        ))),
    }
}
