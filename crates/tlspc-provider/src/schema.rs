//! Declared attribute schemas
//!
//! Every resource and data source publishes a [`Schema`]. Incoming JSON is
//! checked against it before any reconciler code runs: required attributes
//! must be present, primitive types must match and validators must pass.
//! Computed attributes are never checked on input.

use crate::validators::Validator;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub description: String,
    pub attributes: BTreeMap<String, Attribute>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    Required,
    Optional,
    Computed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    Int32,
    Int64,
    Set { element: Box<AttributeType> },
    Map { element: Box<AttributeType> },
    Object { attributes: BTreeMap<String, Attribute> },
    SetOfObjects { attributes: BTreeMap<String, Attribute> },
}

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub ty: AttributeType,
    pub mode: AttributeMode,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

/// A single problem found in a configuration, addressed by attribute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl Schema {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Schema with the computed `id` attribute every resource carries.
    pub fn resource(description: impl Into<String>) -> Self {
        Self::new(description).with_attribute(
            "id",
            Attribute::computed(AttributeType::String).describe("Identifier"),
        )
    }

    pub fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        match config.as_object() {
            Some(_) => validate_object(&self.attributes, config, "", &mut diags),
            None => diags.push(Diagnostic {
                path: "<root>".to_string(),
                message: "configuration must be a JSON object".to_string(),
            }),
        }
        diags
    }
}

impl Attribute {
    fn new(ty: AttributeType, mode: AttributeMode) -> Self {
        Self {
            ty,
            mode,
            sensitive: false,
            description: String::new(),
            validators: Vec::new(),
        }
    }

    pub fn required(ty: AttributeType) -> Self {
        Self::new(ty, AttributeMode::Required)
    }

    pub fn optional(ty: AttributeType) -> Self {
        Self::new(ty, AttributeMode::Optional)
    }

    pub fn computed(ty: AttributeType) -> Self {
        Self::new(ty, AttributeMode::Computed)
    }

    pub fn required_string() -> Self {
        Self::required(AttributeType::String)
    }

    pub fn optional_string() -> Self {
        Self::optional(AttributeType::String)
    }

    pub fn computed_string() -> Self {
        Self::computed(AttributeType::String)
    }

    pub fn string_set() -> AttributeType {
        AttributeType::Set {
            element: Box::new(AttributeType::String),
        }
    }

    pub fn string_map() -> AttributeType {
        AttributeType::Map {
            element: Box::new(AttributeType::String),
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validated(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }
}

pub fn object(attributes: impl IntoIterator<Item = (&'static str, Attribute)>) -> AttributeType {
    AttributeType::Object {
        attributes: attributes
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    }
}

pub fn set_of_objects(
    attributes: impl IntoIterator<Item = (&'static str, Attribute)>,
) -> AttributeType {
    AttributeType::SetOfObjects {
        attributes: attributes
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn validate_object(
    attributes: &BTreeMap<String, Attribute>,
    value: &Value,
    prefix: &str,
    diags: &mut Vec<Diagnostic>,
) {
    for (name, attribute) in attributes {
        if attribute.mode == AttributeMode::Computed {
            continue;
        }
        let path = join(prefix, name);
        match value.get(name).filter(|v| !v.is_null()) {
            None if attribute.mode == AttributeMode::Required => diags.push(Diagnostic {
                path,
                message: "required attribute is missing".to_string(),
            }),
            None => {}
            Some(v) => validate_value(attribute, v, &path, diags),
        }
    }
}

fn validate_value(attribute: &Attribute, value: &Value, path: &str, diags: &mut Vec<Diagnostic>) {
    if let Some(message) = type_error(&attribute.ty, value, path, diags) {
        diags.push(Diagnostic {
            path: path.to_string(),
            message,
        });
        return;
    }
    for validator in &attribute.validators {
        if let Some(message) = validator.check(value) {
            diags.push(Diagnostic {
                path: path.to_string(),
                message,
            });
        }
    }
}

/// Shallow type check; nested objects push their own diagnostics.
fn type_error(
    ty: &AttributeType,
    value: &Value,
    path: &str,
    diags: &mut Vec<Diagnostic>,
) -> Option<String> {
    match ty {
        AttributeType::String => (!value.is_string()).then(|| "expected a string".to_string()),
        AttributeType::Bool => (!value.is_boolean()).then(|| "expected a boolean".to_string()),
        AttributeType::Int32 => match value.as_i64() {
            Some(n) if i32::try_from(n).is_ok() => None,
            _ => Some("expected a 32-bit integer".to_string()),
        },
        AttributeType::Int64 => value
            .as_i64()
            .is_none()
            .then(|| "expected an integer".to_string()),
        AttributeType::Set { element } => match value.as_array() {
            None => Some("expected a set".to_string()),
            Some(items) => items.iter().enumerate().find_map(|(i, item)| {
                type_error(element, item, &format!("{}[{}]", path, i), diags)
                    .map(|m| format!("element {}: {}", i, m))
            }),
        },
        AttributeType::Map { element } => match value.as_object() {
            None => Some("expected a map".to_string()),
            Some(entries) => entries.iter().find_map(|(k, item)| {
                type_error(element, item, &join(path, k), diags)
                    .map(|m| format!("entry {:?}: {}", k, m))
            }),
        },
        AttributeType::Object { attributes } => {
            if !value.is_object() {
                return Some("expected an object".to_string());
            }
            validate_object(attributes, value, path, diags);
            None
        }
        AttributeType::SetOfObjects { attributes } => match value.as_array() {
            None => Some("expected a set of objects".to_string()),
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, i);
                    if item.is_object() {
                        validate_object(attributes, item, &item_path, diags);
                    } else {
                        diags.push(Diagnostic {
                            path: item_path,
                            message: "expected an object".to_string(),
                        });
                    }
                }
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Schema {
        Schema::resource("sample")
            .with_attribute("name", Attribute::required_string())
            .with_attribute(
                "owner",
                Attribute::required_string().validated(Validator::Uuid),
            )
            .with_attribute("lifetime", Attribute::optional(AttributeType::Int32))
            .with_attribute(
                "rules",
                Attribute::optional(set_of_objects([
                    ("claim_name", Attribute::required_string()),
                    (
                        "operator",
                        Attribute::required_string()
                            .validated(Validator::one_of(&["EQUALS", "CONTAINS"])),
                    ),
                ])),
            )
    }

    #[test]
    fn test_valid_config() {
        let diags = sample().validate(&json!({
            "name": "n",
            "owner": "0f6a7c1e-5b1d-4c3e-9a8f-2d4b6e8a0c1f",
            "lifetime": 30,
            "rules": [{"claim_name": "groups", "operator": "EQUALS"}]
        }));
        assert!(diags.is_empty(), "{diags:?}");
    }

    #[test]
    fn test_missing_required_and_bad_uuid() {
        let diags = sample().validate(&json!({"owner": "not-a-uuid", "id": 5}));
        let paths: Vec<_> = diags.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["name", "owner"]);
    }

    #[test]
    fn test_null_counts_as_missing() {
        let diags = sample().validate(&json!({"name": null, "owner": null}));
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_nested_rule_checked() {
        let diags = sample().validate(&json!({
            "name": "n",
            "owner": "0f6a7c1e-5b1d-4c3e-9a8f-2d4b6e8a0c1f",
            "rules": [{"claim_name": "groups", "operator": "LIKE"}]
        }));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].path, "rules[0].operator");
    }

    #[test]
    fn test_int32_range() {
        let diags = sample().validate(&json!({
            "name": "n",
            "owner": "0f6a7c1e-5b1d-4c3e-9a8f-2d4b6e8a0c1f",
            "lifetime": 5_000_000_000i64
        }));
        assert_eq!(diags[0].path, "lifetime");
    }

    #[test]
    fn test_non_object_root() {
        assert_eq!(sample().validate(&json!([1])).len(), 1);
    }
}
