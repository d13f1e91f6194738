use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

pub const MISSING: &str = "Missing data for required field.";
pub const NULL: &str = "Field may not be null.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const BAD_EMAIL: &str = "Not a valid email address.";
pub const UNKNOWN: &str = "Unknown field.";

/// Field name to every violation found for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

/// A request body that can be built from a JSON object.
pub trait FromPayload: Sized {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, FieldErrors>;
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles");
    }
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Length { min: usize, max: Option<usize> },
    Email,
}

impl Rule {
    pub const fn min(min: usize) -> Self {
        Rule::Length { min, max: None }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Rule::Length { min, max: Some(max) }
    }

    fn check(self, value: &str) -> Option<String> {
        match self {
            Rule::Length { min, max } => {
                let len = value.chars().count();
                match max {
                    Some(max) if len < min || len > max => {
                        Some(format!("Length must be between {min} and {max}."))
                    }
                    None if len < min => Some(format!("Shorter than minimum length {min}.")),
                    _ => None,
                }
            }
            Rule::Email => (!is_valid_email(value)).then(|| BAD_EMAIL.to_string()),
        }
    }
}

/// Walks one payload and accumulates errors for every field instead of
/// stopping at the first.
pub struct Checker<'a> {
    payload: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> Checker<'a> {
    /// Keys outside `known` are reported as unknown fields.
    pub fn new(payload: &'a Map<String, Value>, known: &[&str]) -> Self {
        let mut errors = FieldErrors::new();
        for key in payload.keys().filter(|k| !known.contains(&k.as_str())) {
            errors.add(key, UNKNOWN);
        }
        Self { payload, errors }
    }

    pub fn required(&mut self, field: &str, rule: Rule) -> Option<String> {
        if !self.payload.contains_key(field) {
            self.errors.add(field, MISSING);
            return None;
        }
        self.optional(field, rule)
    }

    /// Absent yields `None`; `null` is rejected.
    pub fn optional(&mut self, field: &str, rule: Rule) -> Option<String> {
        match self.payload.get(field)? {
            Value::Null => {
                self.errors.add(field, NULL);
                None
            }
            value => self.string(field, value, rule),
        }
    }

    /// Absent yields `None`, `null` yields `Some(None)`.
    pub fn nullable(&mut self, field: &str, rule: Rule) -> Option<Option<String>> {
        match self.payload.get(field)? {
            Value::Null => Some(None),
            value => self.string(field, value, rule).map(Some),
        }
    }

    fn string(&mut self, field: &str, value: &Value, rule: Rule) -> Option<String> {
        let Value::String(s) = value else {
            self.errors.add(field, NOT_A_STRING);
            return None;
        };
        match rule.check(s) {
            Some(message) => {
                self.errors.add(field, message);
                None
            }
            None => Some(s.clone()),
        }
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}
