//! Frontmatter schemas
//!
//! A [`Schema`] is an explicit validator tree built from a handful of field
//! types. Validating a raw YAML value either yields a coerced [`Data`] tree or
//! every [`FieldViolation`] found in it; validation never stops at the first
//! bad field.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_yaml::Value;

use super::date;
use super::error::{FieldViolation, Violation};

/// A field validator
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String,
    /// Coerced from a date string or epoch milliseconds
    Date,
    Array(Box<Schema>),
    Object(ObjectSchema),
    /// Absent or `null` is accepted and produces no value
    Optional(Box<Schema>),
    /// Identifier of an entry in the named collection
    Reference(String),
}

/// Ordered object fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    fields: Vec<(String, Schema)>,
}

impl ObjectSchema {
    /// Add a field
    pub fn field(mut self, name: &str, schema: Schema) -> Self {
        self.fields.push((name.to_string(), schema));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.fields.iter().map(|(name, schema)| (name.as_str(), schema))
    }
}

impl Schema {
    pub fn string() -> Self {
        Schema::String
    }

    pub fn date() -> Self {
        Schema::Date
    }

    pub fn array(item: Schema) -> Self {
        Schema::Array(Box::new(item))
    }

    /// Start an object schema; finish it with [`Schema::from`]
    pub fn object() -> ObjectSchema {
        ObjectSchema::default()
    }

    pub fn reference(collection: &str) -> Self {
        Schema::Reference(collection.to_string())
    }

    /// Wrap this schema so a missing value is accepted
    pub fn optional(self) -> Self {
        Schema::Optional(Box::new(self))
    }

    /// Validate a whole frontmatter value
    pub fn parse(&self, value: &Value) -> Result<Data, Vec<FieldViolation>> {
        let mut violations = Vec::new();
        let data = self.validate(Some(value), "", &mut violations);
        match data {
            Some(data) if violations.is_empty() => Ok(data),
            _ => Err(violations),
        }
    }

    /// Collection names this schema references, at any depth
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Schema::Reference(target) => out.push(target),
            Schema::Array(item) | Schema::Optional(item) => item.collect_references(out),
            Schema::Object(object) => {
                for (_, schema) in object.fields() {
                    schema.collect_references(out);
                }
            }
            Schema::String | Schema::Date => {}
        }
    }

    fn validate(
        &self,
        value: Option<&Value>,
        path: &str,
        violations: &mut Vec<FieldViolation>,
    ) -> Option<Data> {
        let value = match (self, value) {
            (Schema::Optional(_), None | Some(Value::Null)) => return None,
            (Schema::Optional(inner), value) => return inner.validate(value, path, violations),
            (_, None) => {
                push(violations, path, Violation::Missing);
                return None;
            }
            (_, Some(value)) => value,
        };

        match self {
            Schema::String => match value {
                Value::String(s) => Some(Data::String(s.clone())),
                other => wrong_type(violations, path, "string", other),
            },
            Schema::Date => {
                let parsed = match value {
                    Value::String(s) => date::parse_date_string(s),
                    Value::Number(n) => n.as_i64().and_then(date::from_epoch_millis),
                    other => return wrong_type(violations, path, "date", other),
                };
                match parsed {
                    Some(dt) => Some(Data::Date(dt)),
                    None => {
                        let raw = match value {
                            Value::String(s) => s.clone(),
                            other => display_scalar(other),
                        };
                        push(violations, path, Violation::UnparsableDate(raw));
                        None
                    }
                }
            }
            Schema::Array(item) => {
                let Value::Sequence(items) = value else {
                    return wrong_type(violations, path, "array", value);
                };
                let before = violations.len();
                let mut out = Vec::with_capacity(items.len());
                for (i, element) in items.iter().enumerate() {
                    let element_path = format!("{}[{}]", path, i);
                    if let Some(data) = item.validate(Some(element), &element_path, violations) {
                        out.push(data);
                    }
                }
                (violations.len() == before).then_some(Data::List(out))
            }
            Schema::Object(object) => {
                let Value::Mapping(mapping) = value else {
                    return wrong_type(violations, path, "object", value);
                };
                let before = violations.len();
                let mut out = IndexMap::new();
                for (name, schema) in object.fields() {
                    let field_path = if path.is_empty() {
                        name.to_string()
                    } else {
                        format!("{}.{}", path, name)
                    };
                    if let Some(data) = schema.validate(mapping.get(name), &field_path, violations)
                    {
                        out.insert(name.to_string(), data);
                    }
                }
                (violations.len() == before).then_some(Data::Object(out))
            }
            Schema::Reference(collection) => match value {
                Value::String(id) => Some(Data::Reference(Reference {
                    collection: collection.clone(),
                    id: id.clone(),
                })),
                other => wrong_type(violations, path, "reference id", other),
            },
            Schema::Optional(_) => None,
        }
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Schema::Object(object)
    }
}

fn push(violations: &mut Vec<FieldViolation>, path: &str, violation: Violation) {
    let field = if path.is_empty() { "<root>" } else { path };
    violations.push(FieldViolation {
        field: field.to_string(),
        violation,
    });
}

fn wrong_type(
    violations: &mut Vec<FieldViolation>,
    path: &str,
    expected: &'static str,
    found: &Value,
) -> Option<Data> {
    push(
        violations,
        path,
        Violation::WrongType {
            expected,
            found: type_name(found),
        },
    );
    None
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "array",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "tagged value",
    }
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        other => type_name(other).to_string(),
    }
}

/// A typed link to an entry in another collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub collection: String,
    pub id: String,
}

/// Validated, coerced frontmatter
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    String(String),
    Date(DateTime<Utc>),
    List(Vec<Data>),
    Object(IndexMap<String, Data>),
    Reference(Reference),
}

impl Data {
    /// Look up a field of an object
    pub fn get(&self, key: &str) -> Option<&Data> {
        match self {
            Data::Object(fields) => fields.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Data::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Data::Date(dt) => Some(dt),
            _ => None,
        }
    }

    /// Every reference in this tree, with its field path
    pub fn references(&self) -> Vec<(String, &Reference)> {
        let mut out = Vec::new();
        self.collect_references("", &mut out);
        out
    }

    fn collect_references<'a>(&'a self, path: &str, out: &mut Vec<(String, &'a Reference)>) {
        match self {
            Data::Reference(reference) => out.push((path.to_string(), reference)),
            Data::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    item.collect_references(&format!("{}[{}]", path, i), out);
                }
            }
            Data::Object(fields) => {
                for (name, value) in fields {
                    let field_path = if path.is_empty() {
                        name.clone()
                    } else {
                        format!("{}.{}", path, name)
                    };
                    value.collect_references(&field_path, out);
                }
            }
            Data::String(_) | Data::Date(_) => {}
        }
    }
}

impl Serialize for Data {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Data::String(s) => serializer.serialize_str(s),
            Data::Date(dt) => dt.serialize(serializer),
            Data::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Data::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Data::Reference(reference) => reference.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    fn post_schema() -> Schema {
        Schema::object()
            .field("title", Schema::string())
            .field("date", Schema::date())
            .field("tags", Schema::array(Schema::string()).optional())
            .into()
    }

    #[test]
    fn test_valid_object_is_coerced() {
        let data = post_schema()
            .parse(&yaml("title: Hello\ndate: 2024-01-05\ntags: [a, b]"))
            .unwrap();

        assert_eq!(data.get("title").and_then(Data::as_str), Some("Hello"));
        let date = data.get("date").and_then(Data::as_date).unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 5));
        assert_eq!(
            data.get("tags"),
            Some(&Data::List(vec![
                Data::String("a".to_string()),
                Data::String("b".to_string())
            ]))
        );
    }

    #[test]
    fn test_optional_absent_or_null() {
        let data = post_schema()
            .parse(&yaml("title: Hello\ndate: 2024-01-05"))
            .unwrap();
        assert!(data.get("tags").is_none());

        let data = post_schema()
            .parse(&yaml("title: Hello\ndate: 2024-01-05\ntags:"))
            .unwrap();
        assert!(data.get("tags").is_none());
    }

    #[test]
    fn test_accumulates_every_violation() {
        let violations = post_schema()
            .parse(&yaml("date: someday\ntags: [ok, 3]"))
            .unwrap_err();

        assert_eq!(
            violations,
            vec![
                FieldViolation {
                    field: "title".to_string(),
                    violation: Violation::Missing,
                },
                FieldViolation {
                    field: "date".to_string(),
                    violation: Violation::UnparsableDate("someday".to_string()),
                },
                FieldViolation {
                    field: "tags[1]".to_string(),
                    violation: Violation::WrongType {
                        expected: "string",
                        found: "number",
                    },
                },
            ]
        );
    }

    #[test]
    fn test_string_rejects_other_scalars() {
        let schema: Schema = Schema::object().field("title", Schema::string()).into();
        let violations = schema.parse(&yaml("title: 42")).unwrap_err();
        assert_eq!(violations[0].field, "title");
        assert_eq!(
            violations[0].violation,
            Violation::WrongType {
                expected: "string",
                found: "number"
            }
        );

        // Empty strings are still strings
        assert!(schema.parse(&yaml("title: ''")).is_ok());
    }

    #[test]
    fn test_nested_object_paths() {
        let schema: Schema = Schema::object()
            .field(
                "image",
                Schema::object()
                    .field("src", Schema::string())
                    .field("alt", Schema::string())
                    .into(),
            )
            .into();

        let violations = schema.parse(&yaml("image:\n  src: a.png")).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "image.alt");

        let violations = schema.parse(&yaml("image: a.png")).unwrap_err();
        assert_eq!(violations[0].field, "image");
    }

    #[test]
    fn test_date_from_epoch_millis() {
        let schema: Schema = Schema::object().field("date", Schema::date()).into();
        let data = schema.parse(&yaml("date: 1704412800000")).unwrap();
        let date = data.get("date").and_then(Data::as_date).unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2024-01-05");
    }

    #[test]
    fn test_reference_paths() {
        let schema: Schema = Schema::object()
            .field("character", Schema::reference("characters"))
            .field("cast", Schema::array(Schema::reference("characters")))
            .into();
        assert_eq!(schema.references(), vec!["characters", "characters"]);

        let data = schema
            .parse(&yaml("character: Ada\ncast: [Ada, Grace]"))
            .unwrap();
        let refs: Vec<_> = data
            .references()
            .into_iter()
            .map(|(path, r)| (path, r.id.clone()))
            .collect();
        assert_eq!(
            refs,
            vec![
                ("character".to_string(), "Ada".to_string()),
                ("cast[0]".to_string(), "Ada".to_string()),
                ("cast[1]".to_string(), "Grace".to_string()),
            ]
        );
    }

    #[test]
    fn test_root_must_be_object() {
        let violations = post_schema().parse(&yaml("- a\n- b")).unwrap_err();
        assert_eq!(violations[0].field, "<root>");
    }

    #[test]
    fn test_serializes_dates_and_references() {
        let schema: Schema = Schema::object()
            .field("date", Schema::date())
            .field("character", Schema::reference("characters"))
            .into();
        let data = schema
            .parse(&yaml("date: 2024-01-05\ncharacter: ada"))
            .unwrap();
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["date"], "2024-01-05T00:00:00Z");
        assert_eq!(json["character"]["collection"], "characters");
        assert_eq!(json["character"]["id"], "ada");
    }
}
