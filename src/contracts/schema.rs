//! Schema builder for request, response, query and path shapes.
//!
//! A [`Schema`] is either an object (ordered, named properties) or an array
//! (an optional element type). It renders to a plain JSON document for
//! documentation and derives primitive validation rules per property.
//!
//! ```rust,ignore
//! let body = Schema::object()
//!     .property("email", "email", true)
//!     .property_with("name", Property::new("string").example("Ada"))
//!     .required(["name"]);
//! ```

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::validation::{Rule, ValidationRules};

/// Primitive type tags a property may carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Email,
    Uuid,
    Url,
    Date,
    DateTime,
    Object,
    File,
    /// Unrecognised tag, kept verbatim. Derives no type rule.
    Other(String),
}

impl Primitive {
    /// Parse a tag, accepting the short aliases `int`, `float`, `double`, `bool`
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => Primitive::String,
            "integer" | "int" => Primitive::Integer,
            "number" | "float" | "double" => Primitive::Number,
            "boolean" | "bool" => Primitive::Boolean,
            "array" => Primitive::Array,
            "email" => Primitive::Email,
            "uuid" => Primitive::Uuid,
            "url" => Primitive::Url,
            "date" => Primitive::Date,
            "datetime" => Primitive::DateTime,
            "object" => Primitive::Object,
            "file" => Primitive::File,
            other => Primitive::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Primitive::String => "string",
            Primitive::Integer => "integer",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
            Primitive::Array => "array",
            Primitive::Email => "email",
            Primitive::Uuid => "uuid",
            Primitive::Url => "url",
            Primitive::Date => "date",
            Primitive::DateTime => "datetime",
            Primitive::Object => "object",
            Primitive::File => "file",
            Primitive::Other(tag) => tag,
        }
    }
}

/// Type of a property: a primitive tag or a nested schema
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyType {
    /// `tag` is kept as declared (`int` stays `int`); `primitive` is its
    /// canonical reading
    Primitive { primitive: Primitive, tag: String },
    Nested(Box<Schema>),
}

impl PropertyType {
    /// Documentation form: the tag string, or the nested schema document
    pub fn to_value(&self) -> Value {
        match self {
            PropertyType::Primitive { tag, .. } => Value::String(tag.clone()),
            PropertyType::Nested(schema) => schema.to_value(),
        }
    }

    pub fn primitive(&self) -> Option<&Primitive> {
        match self {
            PropertyType::Primitive { primitive, .. } => Some(primitive),
            PropertyType::Nested(_) => None,
        }
    }

    /// The type rule this property derives, if any
    pub fn type_rule(&self) -> Option<Rule> {
        match self {
            PropertyType::Primitive { primitive, .. } => Rule::for_primitive(primitive),
            PropertyType::Nested(_) => None,
        }
    }
}

impl From<&str> for PropertyType {
    fn from(tag: &str) -> Self {
        PropertyType::Primitive {
            primitive: Primitive::from_tag(tag),
            tag: tag.to_string(),
        }
    }
}

impl From<Primitive> for PropertyType {
    fn from(p: Primitive) -> Self {
        PropertyType::Primitive {
            tag: p.tag().to_string(),
            primitive: p,
        }
    }
}

impl From<Schema> for PropertyType {
    fn from(schema: Schema) -> Self {
        PropertyType::Nested(Box::new(schema))
    }
}

/// A single named property
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub ty: PropertyType,
    pub required: bool,
    pub example: Option<Value>,
    pub description: Option<String>,
}

impl Property {
    pub fn new(ty: impl Into<PropertyType>) -> Self {
        Self {
            ty: ty.into(),
            required: false,
            example: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), self.ty.to_value());
        out.insert("required".into(), Value::Bool(self.required));
        if let Some(example) = &self.example {
            out.insert("example".into(), example.clone());
        }
        if let Some(description) = &self.description {
            out.insert("description".into(), Value::String(description.clone()));
        }
        Value::Object(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Object,
    Array,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Object => "object",
            SchemaKind::Array => "array",
        }
    }
}

/// Description of a JSON value shape
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    kind: SchemaKind,
    description: Option<String>,
    example: Option<Value>,
    items: Option<PropertyType>,
    properties: Vec<(String, Property)>,
    required: Vec<String>,
}

impl Schema {
    fn empty(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
            example: None,
            items: None,
            properties: Vec::new(),
            required: Vec::new(),
        }
    }

    pub fn object() -> Self {
        Self::empty(SchemaKind::Object)
    }

    pub fn array() -> Self {
        Self::empty(SchemaKind::Array)
    }

    /// Array whose elements have the given type
    pub fn array_of(items: impl Into<PropertyType>) -> Self {
        Self::array().items(items)
    }

    pub fn items(mut self, items: impl Into<PropertyType>) -> Self {
        self.items = Some(items.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Add or replace a property with just a type and required flag
    pub fn property(self, name: &str, ty: impl Into<PropertyType>, required: bool) -> Self {
        let mut property = Property::new(ty);
        property.required = required;
        self.property_with(name, property)
    }

    /// Add or replace a fully described property. Replacing keeps the
    /// original position.
    pub fn property_with(mut self, name: &str, property: Property) -> Self {
        if property.required {
            self.mark_required(name);
        }
        match self.properties.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = property,
            None => self.properties.push((name.to_string(), property)),
        }
        self
    }

    /// Mark names as required. Names without a property are still recorded.
    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            self.mark_required(name);
            if let Some((_, property)) = self.properties.iter_mut().find(|(n, _)| n == name) {
                property.required = true;
            }
        }
        self
    }

    fn mark_required(&mut self, name: &str) {
        if !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn example_value(&self) -> Option<&Value> {
        self.example.as_ref()
    }

    pub fn item_type(&self) -> Option<&PropertyType> {
        self.items.as_ref()
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.properties.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    pub fn required_names(&self) -> &[String] {
        &self.required
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Required names that have no matching property
    pub fn orphan_required(&self) -> Vec<&str> {
        self.required
            .iter()
            .filter(|r| self.get(r).is_none())
            .map(String::as_str)
            .collect()
    }

    /// Documentation form. Property order follows insertion order.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), Value::String(self.kind.as_str().to_string()));
        if let Some(description) = &self.description {
            out.insert("description".into(), Value::String(description.clone()));
        }
        if let Some(example) = &self.example {
            out.insert("example".into(), example.clone());
        }

        match self.kind {
            SchemaKind::Object => {
                if !self.properties.is_empty() {
                    let properties: Map<String, Value> = self
                        .properties
                        .iter()
                        .map(|(name, p)| (name.clone(), p.to_value()))
                        .collect();
                    out.insert("properties".into(), Value::Object(properties));
                }
                if !self.required.is_empty() {
                    out.insert("required".into(), serde_json::json!(self.required));
                }
            }
            SchemaKind::Array => {
                if let Some(items) = &self.items {
                    out.insert("items".into(), items.to_value());
                }
            }
        }

        Value::Object(out)
    }

    /// One rule list per property: `required` or `nullable`, then the type rule
    pub fn to_validation_rules(&self) -> ValidationRules {
        let mut rules = ValidationRules::default();
        for (name, property) in &self.properties {
            let mut field = vec![if property.required {
                Rule::Required
            } else {
                Rule::Nullable
            }];
            if let Some(rule) = property.ty.type_rule() {
                field.push(rule);
            }
            rules.insert(name, field);
        }
        rules
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Schema {
        Schema::object()
            .describe("Contact form submission")
            .property("name", "string", true)
            .property_with(
                "email",
                Property::new("email")
                    .required()
                    .example("ada@example.com")
                    .description("Reply address"),
            )
            .property("age", "int", false)
            .property("mystery", "foo", false)
    }

    #[test]
    fn test_property_order_is_insertion_order() {
        let value = sample().to_value();
        let keys: Vec<&String> = value["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "email", "age", "mystery"]);
    }

    #[test]
    fn test_to_value_object_shape() {
        let value = sample().to_value();
        assert_eq!(value["type"], "object");
        assert_eq!(value["description"], "Contact form submission");
        assert_eq!(value["required"], json!(["name", "email"]));
        assert_eq!(
            value["properties"]["email"],
            json!({
                "type": "email",
                "required": true,
                "example": "ada@example.com",
                "description": "Reply address"
            })
        );
        assert!(value.get("items").is_none());
    }

    #[test]
    fn test_to_value_is_repeatable() {
        let schema = sample();
        assert_eq!(schema.to_value(), schema.to_value());
        assert_eq!(schema.to_validation_rules(), schema.to_validation_rules());
    }

    #[test]
    fn test_empty_object_is_sparse() {
        let value = Schema::object().to_value();
        assert_eq!(value, json!({ "type": "object" }));
    }

    #[test]
    fn test_array_schema() {
        let value = Schema::array_of("uuid").describe("Ids").to_value();
        assert_eq!(value, json!({ "type": "array", "description": "Ids", "items": "uuid" }));
    }

    #[test]
    fn test_nested_schema_property() {
        let seo = Schema::object().property("title", "string", true);
        let value = Schema::object().property("seo", seo, false).to_value();
        assert_eq!(value["properties"]["seo"]["type"]["type"], "object");
        assert_eq!(
            value["properties"]["seo"]["type"]["properties"]["title"]["required"],
            true
        );
    }

    #[test]
    fn test_required_syncs_property_flag() {
        let schema = Schema::object()
            .property("title", "string", false)
            .required(["title"]);
        assert!(schema.is_required("title"));
        assert!(schema.get("title").unwrap().required);

        // Idempotent
        let schema = schema.required(["title"]);
        assert_eq!(schema.required_names(), &["title".to_string()]);
    }

    #[test]
    fn test_orphan_required_is_tolerated() {
        let schema = Schema::object()
            .property("title", "string", false)
            .required(["slug"]);
        assert!(schema.is_required("slug"));
        assert!(schema.get("slug").is_none());
        assert_eq!(schema.orphan_required(), vec!["slug"]);

        let value = schema.to_value();
        assert_eq!(value["required"], json!(["slug"]));
        assert!(value["properties"].get("slug").is_none());
    }

    #[test]
    fn test_replacing_property_keeps_position() {
        let schema = Schema::object()
            .property("a", "string", false)
            .property("b", "string", false)
            .property("a", "integer", true);
        let names: Vec<&str> = schema.properties().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(schema.get("a").unwrap().ty, PropertyType::from("integer"));
    }

    #[test]
    fn test_aliases_normalize() {
        assert_eq!(Primitive::from_tag("bool"), Primitive::Boolean);
        assert_eq!(Primitive::from_tag("double"), Primitive::Number);
        assert_eq!(Primitive::from_tag("int").tag(), "integer");
        assert_eq!(Primitive::from_tag("foo").tag(), "foo");
    }

    #[test]
    fn test_alias_tag_documented_as_declared() {
        let schema = Schema::object()
            .property("n", "int", false)
            .property("flag", "bool", true);

        let value = schema.to_value();
        assert_eq!(value["properties"]["n"]["type"], "int");
        assert_eq!(value["properties"]["flag"]["type"], "bool");

        let rules = schema.to_validation_rules();
        assert_eq!(rules.rule_string("n").as_deref(), Some("nullable|integer"));
        assert_eq!(rules.rule_string("flag").as_deref(), Some("required|boolean"));
        assert_eq!(
            schema.get("n").unwrap().ty.primitive(),
            Some(&Primitive::Integer)
        );
    }

    #[test]
    fn test_serialize_matches_to_value() {
        let schema = sample();
        assert_eq!(serde_json::to_value(&schema).unwrap(), schema.to_value());
    }
}
