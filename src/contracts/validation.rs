//! Primitive validation rules derived from a [`Schema`](super::Schema).
//!
//! Rules are per-field and carry no cross-field constraints. A field's list
//! always starts with `required` or `nullable` and holds at most one type
//! rule; unknown type tags contribute no type rule, so the field accepts any
//! value of any shape.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use super::schema::Primitive;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("url pattern is valid"));

/// A single validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present and not blank: `null`, whitespace-only strings and empty
    /// arrays all count as missing
    Required,
    Nullable,
    String,
    Integer,
    Numeric,
    Boolean,
    Array,
    Email,
    Uuid,
    Url,
    Date,
    DateTime,
}

impl Rule {
    /// Type rule for a primitive tag. `object`, `file` and unknown tags have none.
    pub fn for_primitive(primitive: &Primitive) -> Option<Rule> {
        match primitive {
            Primitive::String => Some(Rule::String),
            Primitive::Integer => Some(Rule::Integer),
            Primitive::Number => Some(Rule::Numeric),
            Primitive::Boolean => Some(Rule::Boolean),
            Primitive::Array => Some(Rule::Array),
            Primitive::Email => Some(Rule::Email),
            Primitive::Uuid => Some(Rule::Uuid),
            Primitive::Url => Some(Rule::Url),
            Primitive::Date => Some(Rule::Date),
            Primitive::DateTime => Some(Rule::DateTime),
            Primitive::Object | Primitive::File | Primitive::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Nullable => "nullable",
            Rule::String => "string",
            Rule::Integer => "integer",
            Rule::Numeric => "numeric",
            Rule::Boolean => "boolean",
            Rule::Array => "array",
            Rule::Email => "email",
            Rule::Uuid => "uuid",
            Rule::Url => "url",
            Rule::Date => "date",
            Rule::DateTime => "date_format:rfc3339",
        }
    }

    /// Whether a present, non-null value satisfies this rule
    fn accepts(&self, value: &Value) -> bool {
        match self {
            Rule::Required | Rule::Nullable => true,
            Rule::String => value.is_string(),
            Rule::Integer => value.is_i64() || value.is_u64(),
            Rule::Numeric => value.is_number(),
            Rule::Boolean => value.is_boolean(),
            Rule::Array => value.is_array() || value.is_object(),
            Rule::Email => value.as_str().is_some_and(|s| EMAIL.is_match(s)),
            Rule::Uuid => value
                .as_str()
                .is_some_and(|s| uuid::Uuid::parse_str(s).is_ok()),
            Rule::Url => value.as_str().is_some_and(|s| URL.is_match(s)),
            Rule::Date => value
                .as_str()
                .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
            Rule::DateTime => value
                .as_str()
                .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok()),
        }
    }

    fn message(&self, field: &str) -> String {
        match self {
            Rule::Required => format!("The {} field is required.", field),
            Rule::Nullable => String::new(),
            Rule::String => format!("The {} field must be a string.", field),
            Rule::Integer => format!("The {} field must be an integer.", field),
            Rule::Numeric => format!("The {} field must be a number.", field),
            Rule::Boolean => format!("The {} field must be true or false.", field),
            Rule::Array => format!("The {} field must be an array.", field),
            Rule::Email => format!("The {} field must be a valid email address.", field),
            Rule::Uuid => format!("The {} field must be a valid UUID.", field),
            Rule::Url => format!("The {} field must be a valid URL.", field),
            Rule::Date => format!("The {} field must be a date (YYYY-MM-DD).", field),
            Rule::DateTime => format!("The {} field must be an RFC 3339 timestamp.", field),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed rule for one field
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    #[serde(serialize_with = "serialize_rule")]
    pub rule: Rule,
    pub message: String,
}

fn serialize_rule<S: Serializer>(rule: &Rule, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(rule.as_str())
}

/// Ordered mapping of field name to rule list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationRules {
    fields: Vec<(String, Vec<Rule>)>,
}

impl ValidationRules {
    pub(crate) fn insert(&mut self, field: &str, rules: Vec<Rule>) {
        match self.fields.iter_mut().find(|(f, _)| f == field) {
            Some((_, existing)) => *existing = rules,
            None => self.fields.push((field.to_string(), rules)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&[Rule]> {
        self.fields
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, r)| r.as_slice())
    }

    /// Pipe-joined rule string, e.g. `required|email`
    pub fn rule_string(&self, field: &str) -> Option<String> {
        self.get(field).map(|rules| {
            rules
                .iter()
                .map(Rule::as_str)
                .collect::<Vec<_>>()
                .join("|")
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.fields.iter().map(|(f, r)| (f.as_str(), r.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `{field: "rule|rule"}` map
    pub fn to_map(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(field, _)| {
                let joined = self.rule_string(field).unwrap_or_default();
                (field.clone(), Value::String(joined))
            })
            .collect()
    }

    /// Apply the rules to a JSON request body
    pub fn check(&self, body: &Value) -> Result<(), Vec<FieldError>> {
        let Some(object) = body.as_object() else {
            return Err(vec![FieldError {
                field: "body".to_string(),
                rule: Rule::Array,
                message: "The request body must be a JSON object.".to_string(),
            }]);
        };

        let mut errors = Vec::new();
        for (field, rules) in &self.fields {
            match object.get(field).filter(|v| !is_blank(v)) {
                None => {
                    if rules.contains(&Rule::Required) {
                        errors.push(FieldError {
                            field: field.clone(),
                            rule: Rule::Required,
                            message: Rule::Required.message(field),
                        });
                    }
                }
                Some(value) => {
                    if let Some(rule) = rules.iter().find(|r| !r.accepts(value)) {
                        errors.push(FieldError {
                            field: field.clone(),
                            rule: *rule,
                            message: rule.message(field),
                        });
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Values treated as absent, the way empty form input is
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

impl Serialize for ValidationRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::schema::Schema;
    use serde_json::json;

    fn contact_rules() -> ValidationRules {
        Schema::object()
            .property("email", "email", true)
            .property("age", "integer", false)
            .property("mystery", "foo", false)
            .property("token", "foo", true)
            .property("website", "url", false)
            .property("id", "uuid", false)
            .property("born", "date", false)
            .property("sent_at", "datetime", false)
            .to_validation_rules()
    }

    #[test]
    fn test_rule_strings() {
        let rules = contact_rules();
        assert_eq!(rules.rule_string("email").unwrap(), "required|email");
        assert_eq!(rules.rule_string("age").unwrap(), "nullable|integer");
        assert_eq!(rules.rule_string("mystery").unwrap(), "nullable");
        assert_eq!(rules.rule_string("token").unwrap(), "required");
        assert_eq!(
            rules.rule_string("sent_at").unwrap(),
            "nullable|date_format:rfc3339"
        );
        assert!(rules.rule_string("missing").is_none());
    }

    #[test]
    fn test_alias_rules() {
        let rules = Schema::object()
            .property("a", "int", false)
            .property("b", "float", false)
            .property("c", "double", false)
            .property("d", "bool", false)
            .property("e", "array", false)
            .to_validation_rules();
        assert_eq!(rules.get("a").unwrap(), &[Rule::Nullable, Rule::Integer]);
        assert_eq!(rules.get("b").unwrap(), &[Rule::Nullable, Rule::Numeric]);
        assert_eq!(rules.get("c").unwrap(), &[Rule::Nullable, Rule::Numeric]);
        assert_eq!(rules.get("d").unwrap(), &[Rule::Nullable, Rule::Boolean]);
        assert_eq!(rules.get("e").unwrap(), &[Rule::Nullable, Rule::Array]);
    }

    #[test]
    fn test_nested_schema_has_no_type_rule() {
        let rules = Schema::object()
            .property("seo", Schema::object(), true)
            .to_validation_rules();
        assert_eq!(rules.get("seo").unwrap(), &[Rule::Required]);
    }

    #[test]
    fn test_to_map_keeps_order() {
        let map = contact_rules().to_map();
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys[0], "email");
        assert_eq!(keys[1], "age");
        assert_eq!(map["email"], "required|email");
    }

    #[test]
    fn test_check_accepts_valid_body() {
        let body = json!({
            "email": "ada@example.com",
            "age": 36,
            "mystery": { "anything": [1, 2] },
            "token": 42,
            "website": "https://example.com/about",
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "born": "1815-12-10",
            "sent_at": "2024-05-01T10:00:00+02:00"
        });
        assert!(contact_rules().check(&body).is_ok());
    }

    #[test]
    fn test_check_reports_each_field() {
        let body = json!({
            "email": "not-an-email",
            "age": "thirty",
            "website": "ftp://example.com",
            "id": "123",
            "born": "10/12/1815",
            "sent_at": "yesterday"
        });
        let errors = contact_rules().check(&body).unwrap_err();
        let failed: Vec<(&str, Rule)> = errors.iter().map(|e| (e.field.as_str(), e.rule)).collect();
        assert_eq!(
            failed,
            vec![
                ("email", Rule::Email),
                ("age", Rule::Integer),
                ("token", Rule::Required),
                ("website", Rule::Url),
                ("id", Rule::Uuid),
                ("born", Rule::Date),
                ("sent_at", Rule::DateTime),
            ]
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let rules = Schema::object()
            .property("name", "string", true)
            .property("nickname", "string", false)
            .to_validation_rules();
        let errors = rules
            .check(&json!({ "name": null, "nickname": null }))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "name: The name field is required.");
    }

    #[test]
    fn test_blank_values_fail_required() {
        let rules = Schema::object()
            .property("name", "string", true)
            .property("tags", "array", true)
            .property("phone", "string", false)
            .to_validation_rules();

        let errors = rules
            .check(&json!({ "name": "   ", "tags": [], "phone": "" }))
            .unwrap_err();
        let failed: Vec<(&str, Rule)> = errors.iter().map(|e| (e.field.as_str(), e.rule)).collect();
        assert_eq!(failed, [("name", Rule::Required), ("tags", Rule::Required)]);

        assert!(rules
            .check(&json!({ "name": "Ada", "tags": ["x"], "phone": "" }))
            .is_ok());
    }

    #[test]
    fn test_check_rejects_non_object_body() {
        let errors = contact_rules().check(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(errors[0].field, "body");
    }

    #[test]
    fn test_serialize_as_rule_strings() {
        let rules = Schema::object()
            .property("email", "email", true)
            .to_validation_rules();
        assert_eq!(
            serde_json::to_value(&rules).unwrap(),
            json!({ "email": "required|email" })
        );
    }
}
