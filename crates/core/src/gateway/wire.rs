//! Response schemas for the console backend.
//!
//! Every body is parsed into one of these shapes at the gateway boundary so a
//! malformed response becomes a `Decode` error instead of leaking partial data.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::FieldErrors;
use crate::models::student::{ImportSummary, Student};

/// A list endpoint body. Older backend builds return a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Wrapped {
        data: Vec<T>,
        #[serde(default)]
        total: Option<u64>,
    },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_parts(self) -> (Vec<T>, Option<u64>) {
        match self {
            ListEnvelope::Wrapped { data, total } => (data, total),
            ListEnvelope::Bare(data) => (data, None),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.into_parts().0
    }
}

/// A single-entity body, optionally wrapped in `{data: ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EntityEnvelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> EntityEnvelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            EntityEnvelope::Wrapped { data } => data,
            EntityEnvelope::Bare(data) => data,
        }
    }
}

/// Body of `POST /student/upload`.
#[derive(Debug, Deserialize)]
pub struct UploadEnvelope {
    pub summary: ImportSummary,
}

/// One page of a school's roster.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentPage {
    pub records: Vec<Student>,
    /// Total roster size as reported by the server, when it reports one.
    pub total: Option<u64>,
}

impl StudentPage {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            total: Some(0),
        }
    }
}

/// Structured 4xx body.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<ErrorDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    Map(BTreeMap<String, serde_json::Value>),
    List(Vec<ErrorItem>),
}

#[derive(Debug, Deserialize)]
pub struct ErrorItem {
    #[serde(default, alias = "path", alias = "param")]
    pub field: Option<serde_json::Value>,
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Whether the body carried anything worth showing as a validation error.
    pub fn is_structured(&self) -> bool {
        self.message.is_some() || self.errors.is_some()
    }

    pub fn into_field_errors(self) -> FieldErrors {
        let mut fields = FieldErrors::new();
        match self.errors {
            Some(ErrorDetails::Map(map)) => {
                for (field, value) in map {
                    fields.push(field, value_text(&value));
                }
            }
            Some(ErrorDetails::List(items)) => {
                for item in items {
                    let field = item.field.as_ref().map(value_text).unwrap_or_default();
                    fields.push(field, item.message.unwrap_or_else(|| "invalid".into()));
                }
            }
            None => {}
        }
        if fields.is_empty() {
            if let Some(message) = self.message {
                fields.push("", message);
            }
        }
        fields
    }
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join("."),
        serde_json::Value::Object(obj) => obj
            .get("message")
            .map(value_text)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_envelope_wrapped_with_total() {
        let env: ListEnvelope<u32> =
            serde_json::from_str(r#"{"data": [1, 2, 3], "total": 45}"#).unwrap();
        assert_eq!(env.into_parts(), (vec![1, 2, 3], Some(45)));
    }

    #[test]
    fn list_envelope_wrapped_without_total() {
        let env: ListEnvelope<u32> = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(env.into_parts(), (vec![], None));
    }

    #[test]
    fn list_envelope_bare_array() {
        let env: ListEnvelope<u32> = serde_json::from_str("[4, 5]").unwrap();
        assert_eq!(env.into_vec(), vec![4, 5]);
    }

    #[test]
    fn list_envelope_rejects_other_shapes() {
        assert!(serde_json::from_str::<ListEnvelope<u32>>(r#"{"items": [1]}"#).is_err());
    }

    #[test]
    fn error_body_map_form() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"message": "Validation failed", "errors": {"grade": "must be <= 12", "rollNumber": ["required"]}}"#,
        )
        .unwrap();
        assert!(body.is_structured());
        let fields = body.into_field_errors();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("grade"), Some("must be <= 12"));
        assert_eq!(fields.get("rollNumber"), Some("required"));
    }

    #[test]
    fn error_body_list_form() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"errors": [{"path": ["adhaar"], "message": "Aadhaar must be 12 digits"}, {"param": "division", "msg": "invalid"}]}"#,
        )
        .unwrap();
        let fields = body.into_field_errors();
        assert_eq!(fields.get("adhaar"), Some("Aadhaar must be 12 digits"));
        assert_eq!(fields.get("division"), Some("invalid"));
    }

    #[test]
    fn error_body_message_only() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message": "Roll number already taken"}"#).unwrap();
        let fields = body.into_field_errors();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get(""), Some("Roll number already taken"));
    }

    #[test]
    fn error_body_empty_object_is_unstructured() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(!body.is_structured());
    }
}
