// ABOUTME: Field-level validation detail shared by the backend error bodies and the services
// ABOUTME: Mirrors the `{loc, msg, type}` entries of a 422 validation response

use serde::{Deserialize, Serialize};
use std::fmt;

/// One segment of a field location: a field name or a list index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationSegment {
    Index(i64),
    Field(String),
}

impl fmt::Display for LocationSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{}", index),
            Self::Field(name) => f.write_str(name),
        }
    }
}

/// A single field error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "loc", default)]
    pub location: Vec<LocationSegment>,
    #[serde(rename = "msg")]
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            location: vec![
                LocationSegment::Field("body".to_string()),
                LocationSegment::Field(field.to_string()),
            ],
            message: message.into(),
            kind: kind.into(),
        }
    }

    /// Dotted location without the leading `body`/`query` segment
    pub fn field(&self) -> String {
        let segments: Vec<String> = self
            .location
            .iter()
            .filter(|segment| match segment {
                LocationSegment::Field(name) => name != "body" && name != "query",
                _ => true,
            })
            .map(|segment| segment.to_string())
            .collect();
        segments.join(".")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field();
        if field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", field, self.message)
        }
    }
}
