use serde_json::{Map, Value};
use tracing::debug;
use tree_sitter::{Node, Parser};

use crate::{
    error::{Error, Result},
    types::TestingType,
};

/// Literal values extracted from a configuration file, keyed by testing type.
///
/// Values are kept as `serde_json` maps so that the resolver can validate
/// them through the same predicates as every other configuration source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationFile {
    pub e2e: Option<Map<String, Value>>,
    pub component: Option<Map<String, Value>>,
}

impl ConfigurationFile {
    pub fn testing_type(&self, testing_type: TestingType) -> Option<&Map<String, Value>> {
        match testing_type {
            TestingType::E2e => self.e2e.as_ref(),
            TestingType::Component => self.component.as_ref(),
        }
    }
}

/// Parser for Cypress configuration sources (`cypress.config.{js,cjs,mjs,ts}`).
///
/// Recognizes four top-level shapes:
///
/// 1. `module.exports = { ... };`
/// 2. `module.exports = defineConfig({ ... });`
/// 3. `export default { ... };`
/// 4. `export default defineConfig({ ... });`
///
/// Only literal values are extracted; a non-literal value for a recognized
/// property is an error. Sources that match none of the shapes produce an
/// empty result.
pub struct ConfigSourceParser {
    parser: Parser,
}

impl ConfigSourceParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|e| Error::TreeSitter(format!("Failed to set language: {e}")))?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str) -> Result<ConfigurationFile> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::Parse("Failed to parse configuration source".to_string()))?;

        let root = tree.root_node();

        if root.has_error() {
            return Err(Error::Parse(
                "Configuration file contains syntax errors".to_string(),
            ));
        }

        let mut cursor = root.walk();

        for statement in root.named_children(&mut cursor) {
            if let Some(object) = exported_config_object(statement, source) {
                return extract_configuration(object, source);
            }
        }

        Ok(ConfigurationFile::default())
    }
}

fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// The configuration object exported by a top-level statement, if the
/// statement matches one of the recognized shapes.
fn exported_config_object<'t>(statement: Node<'t>, source: &str) -> Option<Node<'t>> {
    match statement.kind() {
        // module.exports = <expression>;
        "expression_statement" => {
            let expression = statement.named_child(0)?;

            if expression.kind() != "assignment_expression" {
                return None;
            }

            let left = expression.child_by_field_name("left")?;

            if !is_module_exports(left, source) {
                return None;
            }

            config_expression(expression.child_by_field_name("right")?, source)
        }
        // export default <expression>;
        "export_statement" => {
            let value = statement.child_by_field_name("value")?;
            config_expression(value, source)
        }
        _ => None,
    }
}

fn is_module_exports(node: Node, source: &str) -> bool {
    if node.kind() != "member_expression" {
        return false;
    }

    let object = node.child_by_field_name("object");
    let property = node.child_by_field_name("property");

    matches!(
        (object, property),
        (Some(object), Some(property))
            if object.kind() == "identifier"
                && node_text(object, source) == "module"
                && property.kind() == "property_identifier"
                && node_text(property, source) == "exports"
    )
}

/// Unwrap a bare object literal or a `defineConfig({ ... })` call. Any other
/// wrapper is unrecognized and skipped.
fn config_expression<'t>(node: Node<'t>, source: &str) -> Option<Node<'t>> {
    match node.kind() {
        "object" => Some(node),
        "call_expression" => {
            let function = node.child_by_field_name("function")?;

            if function.kind() != "identifier" || node_text(function, source) != "defineConfig" {
                return None;
            }

            let arguments = node.child_by_field_name("arguments")?;
            let mut cursor = arguments.walk();

            arguments
                .named_children(&mut cursor)
                .find(|argument| argument.kind() == "object")
        }
        _ => None,
    }
}

fn extract_configuration(object: Node, source: &str) -> Result<ConfigurationFile> {
    let mut configuration = ConfigurationFile::default();

    for (key, value) in object_properties(object) {
        match node_text(key, source) {
            "e2e" if value.kind() == "object" => {
                configuration.e2e = Some(extract_testing_type_object(value, source)?);
            }
            "component" if value.kind() == "object" => {
                configuration.component = Some(extract_testing_type_object(value, source)?);
            }
            _ => {}
        }
    }

    Ok(configuration)
}

fn extract_testing_type_object(object: Node, source: &str) -> Result<Map<String, Value>> {
    let mut properties = Map::new();

    for (key, value) in object_properties(object) {
        let key = node_text(key, source);

        match key {
            "specPattern" | "excludeSpecPattern" => {
                properties.insert(key.to_owned(), string_or_array_value(key, value, source)?);
            }
            "reporter" => {
                if value.kind() != "string" {
                    return Err(Error::Parse(format!(
                        "Expected a string literal for {key}, but got {}",
                        value.kind()
                    )));
                }
                properties.insert(key.to_owned(), Value::String(string_value(value, source)));
            }
            "env" => {
                properties.insert(key.to_owned(), env_object_value(value, source)?);
            }
            _ => {}
        }
    }

    Ok(properties)
}

fn string_or_array_value(key: &str, value: Node, source: &str) -> Result<Value> {
    match value.kind() {
        "string" => Ok(Value::String(string_value(value, source))),
        "array" => {
            let mut cursor = value.walk();
            let mut elements = Vec::new();

            for element in value.named_children(&mut cursor) {
                if element.kind() == "comment" {
                    continue;
                }

                if element.kind() != "string" {
                    return Err(Error::Parse(format!(
                        "Expected a string literal for {key}, but got {}",
                        element.kind()
                    )));
                }

                elements.push(Value::String(string_value(element, source)));
            }

            Ok(Value::Array(elements))
        }
        kind => Err(Error::Parse(format!(
            "Expected a string or array of string literals for {key}, but got {kind}"
        ))),
    }
}

/// An `env` property must be an object literal; string-literal-valued
/// properties are kept, anything else inside it is skipped.
fn env_object_value(value: Node, source: &str) -> Result<Value> {
    if value.kind() != "object" {
        return Err(Error::Parse(format!(
            "Expected an object literal for env, but got {}",
            value.kind()
        )));
    }

    let mut env = Map::new();

    for (key, value) in object_properties(value) {
        if value.kind() == "string" {
            env.insert(
                node_text(key, source).to_owned(),
                Value::String(string_value(value, source)),
            );
        } else {
            debug!(
                "skipping non-string env value for '{}' ({})",
                node_text(key, source),
                value.kind()
            );
        }
    }

    Ok(Value::Object(env))
}

/// Identifier-keyed properties of an object literal. Computed keys, string
/// keys, spreads and methods are not recognized.
fn object_properties(object: Node) -> Vec<(Node, Node)> {
    let mut cursor = object.walk();
    let mut properties = Vec::new();

    for child in object.named_children(&mut cursor) {
        if child.kind() != "pair" {
            continue;
        }

        let key = child.child_by_field_name("key");
        let value = child.child_by_field_name("value");

        if let (Some(key), Some(value)) = (key, value) {
            if key.kind() == "property_identifier" {
                properties.push((key, value));
            }
        }
    }

    properties
}

/// The content of a string literal, with escape sequences resolved.
fn string_value(node: Node, source: &str) -> String {
    let mut cursor = node.walk();
    let mut value = String::new();

    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "string_fragment" => value.push_str(node_text(child, source)),
            "escape_sequence" => {
                let sequence = node_text(child, source);
                match sequence.chars().nth(1) {
                    Some('n') => value.push('\n'),
                    Some('r') => value.push('\r'),
                    Some('t') => value.push('\t'),
                    Some(other) => value.push(other),
                    None => {}
                }
            }
            _ => {}
        }
    }

    value
}
