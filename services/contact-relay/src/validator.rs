// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact submission validator.
//!
//! Turns an untyped JSON body into a trimmed [`ContactSubmission`] or the
//! complete list of field-level problems. Nothing is accepted partially.

use email_address::{EmailAddress, Options};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Contact fields, in the order they are checked and reported.
const FIELDS: [&str; 4] = ["name", "email", "subject", "message"];

/// Machine-readable category of a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidType,
    TooSmall,
    TooBig,
    InvalidString,
    UnrecognizedKeys,
}

/// A single validation problem, addressed by field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{}: {message}", .path.join("."))]
pub struct FieldError {
    pub code: ErrorCode,
    pub path: Vec<String>,
    pub message: String,
}

impl FieldError {
    fn new(code: ErrorCode, path: &[&str], message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.iter().map(|p| p.to_string()).collect(),
            message: message.into(),
        }
    }
}

/// A validated contact form submission. All fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Length bounds for one text field, counted in characters after trimming.
#[derive(Debug, Clone, Copy)]
struct TextRule {
    max: usize,
    required_msg: &'static str,
    too_long_msg: &'static str,
}

/// Contact submission validator.
#[derive(Debug, Clone, Default)]
pub struct ContactValidator;

impl ContactValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a parsed request body.
    pub fn validate(&self, input: &Value) -> Result<ContactSubmission, Vec<FieldError>> {
        let object = match input {
            Value::Object(object) => object,
            other => {
                debug!(received = type_name(other), "Body is not an object");
                return Err(vec![FieldError::new(
                    ErrorCode::InvalidType,
                    &[],
                    format!("Expected object, received {}", type_name(other)),
                )]);
            }
        };

        let mut errors = Vec::new();

        let name = check_text(object, "name", NAME_RULE, &mut errors);
        let email = check_email(object, &mut errors);
        let subject = check_text(object, "subject", SUBJECT_RULE, &mut errors);
        let message = check_text(object, "message", MESSAGE_RULE, &mut errors);

        let unknown: Vec<&str> = object
            .keys()
            .map(String::as_str)
            .filter(|k| !FIELDS.contains(k))
            .collect();
        if !unknown.is_empty() {
            let listed = unknown
                .iter()
                .map(|k| format!("'{}'", k))
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(FieldError::new(
                ErrorCode::UnrecognizedKeys,
                &[],
                format!("Unrecognized key(s) in object: {}", listed),
            ));
        }

        match (name, email, subject, message) {
            (Some(name), Some(email), Some(subject), Some(message)) if errors.is_empty() => {
                Ok(ContactSubmission {
                    name,
                    email,
                    subject,
                    message,
                })
            }
            _ => {
                debug!(error_count = errors.len(), "Submission rejected");
                Err(errors)
            }
        }
    }
}

const NAME_RULE: TextRule = TextRule {
    max: 100,
    required_msg: "Name is required",
    too_long_msg: "Name must be less than 100 characters",
};

const SUBJECT_RULE: TextRule = TextRule {
    max: 200,
    required_msg: "Subject is required",
    too_long_msg: "Subject must be less than 200 characters",
};

const MESSAGE_RULE: TextRule = TextRule {
    max: 2000,
    required_msg: "Message is required",
    too_long_msg: "Message must be less than 2000 characters",
};

const EMAIL_MAX: usize = 255;

/// Fetch a field as a trimmed string, recording type errors.
fn string_field(
    object: &Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match object.get(field) {
        Some(Value::String(s)) => Some(s.trim().to_string()),
        None => {
            errors.push(FieldError::new(ErrorCode::InvalidType, &[field], "Required"));
            None
        }
        Some(other) => {
            errors.push(FieldError::new(
                ErrorCode::InvalidType,
                &[field],
                format!("Expected string, received {}", type_name(other)),
            ));
            None
        }
    }
}

fn check_text(
    object: &Map<String, Value>,
    field: &'static str,
    rule: TextRule,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let value = string_field(object, field, errors)?;
    let len = value.chars().count();
    let before = errors.len();

    if value.is_empty() {
        errors.push(FieldError::new(ErrorCode::TooSmall, &[field], rule.required_msg));
    }
    if len > rule.max {
        errors.push(FieldError::new(ErrorCode::TooBig, &[field], rule.too_long_msg));
    }

    (errors.len() == before).then_some(value)
}

fn check_email(object: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    let value = string_field(object, "email", errors)?;
    let before = errors.len();

    if EmailAddress::parse_with_options(&value, email_options()).is_err() {
        errors.push(FieldError::new(
            ErrorCode::InvalidString,
            &["email"],
            "Invalid email address",
        ));
    }
    if value.chars().count() > EMAIL_MAX {
        errors.push(FieldError::new(
            ErrorCode::TooBig,
            &["email"],
            "Email must be less than 255 characters",
        ));
    }

    (errors.len() == before).then_some(value)
}

/// Plain `local@domain.tld` addresses only: no display name, no bracketed
/// IP literal, and at least one dot in the domain.
fn email_options() -> Options {
    Options::default()
        .with_required_tld()
        .without_domain_literal()
        .without_display_text()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
