//! Shared value types for resolved configurations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which partition of a modern configuration applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestingType {
    E2e,
    Component,
}

impl fmt::Display for TestingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestingType::E2e => write!(f, "e2e"),
            TestingType::Component => write!(f, "component"),
        }
    }
}

impl FromStr for TestingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "e2e" => Ok(TestingType::E2e),
            "component" => Ok(TestingType::Component),
            _ => Err(format!(
                "unknown testing type '{s}', expected one of: e2e, component"
            )),
        }
    }
}

/// Which of the two mutually-exclusive configuration-file schemas a project
/// uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CypressEra {
    PostV10,
    PreV10,
}

/// A value that Cypress accepts as either a single string or an array of
/// strings, e.g. `specPattern`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrArray {
    One(String),
    Many(Vec<String>),
}

impl StringOrArray {
    /// View the value as a flat list of patterns.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            StringOrArray::One(value) => std::slice::from_ref(value).iter(),
            StringOrArray::Many(values) => values.iter(),
        }
        .map(String::as_str)
    }
}

impl From<&str> for StringOrArray {
    fn from(value: &str) -> Self {
        StringOrArray::One(value.to_owned())
    }
}

impl From<Vec<&str>> for StringOrArray {
    fn from(values: Vec<&str>) -> Self {
        StringOrArray::Many(values.into_iter().map(str::to_owned).collect())
    }
}

/// A value that Cypress accepts as either a string or the literal `false`,
/// e.g. `supportFile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringOrFalse {
    Value(String),
    False,
}

impl StringOrFalse {
    pub fn as_option(&self) -> Option<&str> {
        match self {
            StringOrFalse::Value(value) => Some(value),
            StringOrFalse::False => None,
        }
    }
}

impl From<&str> for StringOrFalse {
    fn from(value: &str) -> Self {
        StringOrFalse::Value(value.to_owned())
    }
}

impl Serialize for StringOrFalse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            StringOrFalse::Value(value) => serializer.serialize_str(value),
            StringOrFalse::False => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for StringOrFalse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = StringOrFalse;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or false")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(StringOrFalse::Value(value.to_owned()))
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if value {
                    Err(E::custom("expected a string or false, got true"))
                } else {
                    Ok(StringOrFalse::False)
                }
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}
