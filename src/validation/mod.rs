//! Declarative field validation shared by the contact and booking forms.
//!
//! A schema is a static table of [`FieldRule`]s. [`validate`] walks the table
//! in declaration order, collects every violation as a [`FieldError`], and
//! only builds the typed submission when nothing failed.

mod schemas;

pub use schemas::{BOOKING_SCHEMA, CONTACT_SCHEMA};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One failed rule, reported back to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult<T> {
    Valid(T),
    Invalid(Vec<FieldError>),
}

impl<T> ValidationResult<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    pub fn into_result(self) -> Result<T, Vec<FieldError>> {
        match self {
            ValidationResult::Valid(value) => Ok(value),
            ValidationResult::Invalid(errors) => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    // absent becomes ""
    DefaultEmpty,
}

// Constraints on a string value, each with the message reported when it fails
pub enum Check {
    MinLen(usize, &'static str),
    MaxLen(usize, &'static str),
    Pattern(&'static Lazy<Regex>, &'static str),
    Email(&'static str),
}

pub enum FieldKind {
    Text(&'static [Check]),
    Choice(&'static [&'static str]),
    /// Digit string converted to an integer. The bounds only apply once every
    /// string check has passed.
    Count {
        checks: &'static [Check],
        min: (u32, &'static str),
        max: (u32, &'static str),
    },
}

pub struct FieldRule {
    pub name: &'static str,
    pub presence: Presence,
    pub kind: FieldKind,
}

pub type Schema = [FieldRule];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Count(u32),
    Choice(usize),
}

/// Values that passed their rules, keyed by field name.
#[derive(Debug, Default)]
pub struct Fields {
    values: HashMap<&'static str, FieldValue>,
}

// Only built by check_schema, so every required field is present with the kind its rule declares
impl Fields {
    pub fn text(&mut self, name: &str) -> String {
        match self.values.remove(name) {
            Some(FieldValue::Text(s)) => s,
            _ => String::new(),
        }
    }

    pub fn optional_text(&mut self, name: &str) -> Option<String> {
        match self.values.remove(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn count(&mut self, name: &str) -> u32 {
        match self.values.remove(name) {
            Some(FieldValue::Count(n)) => n,
            _ => 0,
        }
    }

    // Position of the chosen literal in the rule's option list
    pub fn choice(&mut self, name: &str) -> usize {
        match self.values.remove(name) {
            Some(FieldValue::Choice(i)) => i,
            _ => 0,
        }
    }
}

/// A payload type produced by a schema.
pub trait Submission: Sized {
    fn schema() -> &'static Schema;

    // Fields here have already passed the schema
    fn from_fields(fields: Fields) -> Self;
}

pub fn validate<T: Submission>(raw: &Value) -> ValidationResult<T> {
    match check_schema(raw, T::schema()) {
        Ok(fields) => ValidationResult::Valid(T::from_fields(fields)),
        Err(errors) => ValidationResult::Invalid(errors),
    }
}

/// Apply a schema to a raw JSON body without building a typed value.
pub fn check_schema(raw: &Value, schema: &Schema) -> Result<Fields, Vec<FieldError>> {
    let object = match raw {
        Value::Object(object) => object,
        other => {
            return Err(vec![FieldError::new(
                "",
                format!("Expected object, received {}", json_type(other)),
            )]);
        }
    };

    let mut fields = Fields::default();
    let mut errors = Vec::new();

    for rule in schema {
        check_field(object, rule, &mut fields, &mut errors);
    }

    if errors.is_empty() {
        Ok(fields)
    } else {
        Err(errors)
    }
}

fn check_field(
    object: &Map<String, Value>,
    rule: &FieldRule,
    fields: &mut Fields,
    errors: &mut Vec<FieldError>,
) {
    let raw = match object.get(rule.name) {
        Some(raw) => raw,
        None => {
            match rule.presence {
                Presence::Required => errors.push(FieldError::new(rule.name, "Required")),
                Presence::Optional => {}
                Presence::DefaultEmpty => {
                    fields
                        .values
                        .insert(rule.name, FieldValue::Text(String::new()));
                }
            }
            return;
        }
    };

    let value = match (raw, &rule.kind) {
        (Value::String(s), _) => s,
        (other, FieldKind::Choice(options)) => {
            errors.push(FieldError::new(
                rule.name,
                format!(
                    "Expected {}, received {}",
                    join_literals(options),
                    json_type(other)
                ),
            ));
            return;
        }
        (other, _) => {
            errors.push(FieldError::new(
                rule.name,
                format!("Expected string, received {}", json_type(other)),
            ));
            return;
        }
    };

    match &rule.kind {
        FieldKind::Text(checks) => {
            if run_checks(rule.name, value, checks, errors) {
                fields
                    .values
                    .insert(rule.name, FieldValue::Text(value.clone()));
            }
        }
        FieldKind::Choice(options) => {
            if let Some(i) = options.iter().position(|o| *o == value.as_str()) {
                fields.values.insert(rule.name, FieldValue::Choice(i));
            } else {
                errors.push(FieldError::new(
                    rule.name,
                    format!(
                        "Invalid enum value. Expected {}, received '{}'",
                        join_literals(options),
                        value
                    ),
                ));
            }
        }
        FieldKind::Count { checks, min, max } => {
            if !run_checks(rule.name, value, checks, errors) {
                return;
            }
            // digits only at this point, so a parse failure means overflow
            match value.parse::<u64>() {
                Ok(n) if n < u64::from(min.0) => errors.push(FieldError::new(rule.name, min.1)),
                Ok(n) if n <= u64::from(max.0) => {
                    fields.values.insert(rule.name, FieldValue::Count(n as u32));
                }
                _ => errors.push(FieldError::new(rule.name, max.1)),
            }
        }
    }
}

// Runs every check, returns true when all passed
fn run_checks(field: &str, value: &str, checks: &[Check], errors: &mut Vec<FieldError>) -> bool {
    let mut passed = true;
    for check in checks {
        let (ok, message) = match check {
            Check::MinLen(n, message) => (js_length(value) >= *n, *message),
            Check::MaxLen(n, message) => (js_length(value) <= *n, *message),
            Check::Pattern(re, message) => (re.is_match(value), *message),
            Check::Email(message) => (is_email(value), *message),
        };
        if !ok {
            errors.push(FieldError::new(field, message));
            passed = false;
        }
    }
    passed
}

// Lengths are UTF-16 code units, the unit the browser form counts in
fn js_length(value: &str) -> usize {
    value.encode_utf16().count()
}

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .unwrap()
});

pub fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL.is_match(value)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_literals(options: &[&str]) -> String {
    options
        .iter()
        .map(|o| format!("'{}'", o))
        .collect::<Vec<_>>()
        .join(" | ")
}
