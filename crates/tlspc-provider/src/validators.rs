//! Value validators attached to schema attributes

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    /// String must parse as a UUID.
    Uuid,
    /// String must be one of the listed values.
    OneOf { values: Vec<&'static str> },
    /// Every element of a set must satisfy the inner validator.
    ValueStringsAre { inner: Box<Validator> },
}

impl Validator {
    pub fn one_of(values: &[&'static str]) -> Self {
        Validator::OneOf {
            values: values.to_vec(),
        }
    }

    pub fn each(inner: Validator) -> Self {
        Validator::ValueStringsAre {
            inner: Box::new(inner),
        }
    }

    /// Check a non-null value. Returns a message when the value is rejected.
    pub fn check(&self, value: &Value) -> Option<String> {
        match self {
            Validator::Uuid => match value.as_str() {
                Some(s) => uuid_error(s),
                None => Some("value must be a string".to_string()),
            },
            Validator::OneOf { values } => match value.as_str() {
                Some(s) if values.contains(&s) => None,
                Some(s) => Some(format!(
                    "value {:?} must be one of: {}",
                    s,
                    values.join(", ")
                )),
                None => Some("value must be a string".to_string()),
            },
            Validator::ValueStringsAre { inner } => match value.as_array() {
                Some(items) => items.iter().filter(|v| !v.is_null()).find_map(|v| inner.check(v)),
                None => Some("value must be a set".to_string()),
            },
        }
    }
}

/// `None` when `s` is a valid UUID.
pub fn uuid_error(s: &str) -> Option<String> {
    uuid::Uuid::parse_str(s)
        .err()
        .map(|e| format!("String must be a uuid: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ID: &str = "0f6a7c1e-5b1d-4c3e-9a8f-2d4b6e8a0c1f";

    #[test]
    fn test_uuid() {
        assert!(Validator::Uuid.check(&json!(ID)).is_none());
        let msg = Validator::Uuid.check(&json!("team-a")).unwrap();
        assert!(msg.starts_with("String must be a uuid"));
        assert!(Validator::Uuid.check(&json!(12)).is_some());
    }

    #[test]
    fn test_one_of() {
        let v = Validator::one_of(&["USER", "TEAM"]);
        assert!(v.check(&json!("TEAM")).is_none());
        assert!(v.check(&json!("team")).unwrap().contains("USER, TEAM"));
    }

    #[test]
    fn test_each_element() {
        let v = Validator::each(Validator::Uuid);
        assert!(v.check(&json!([ID])).is_none());
        assert!(v.check(&json!([ID, "nope"])).is_some());
        assert!(v.check(&json!("nope")).is_some());
    }
}
