//! Property processing error types.

use thiserror::Error;

/// Property processing error variants.
///
/// Every variant describes a record that is known-bad and can be dropped
/// from a listing without affecting its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum ProcessingError {
    #[error("property record is not an object (found {found})")]
    NotAnObject { found: &'static str },

    #[error("property record has an unusable identity field (found {found})")]
    InvalidIdentity { found: &'static str },
}

impl ProcessingError {
    /// Creates not-an-object error from the offending JSON value.
    #[must_use]
    pub fn not_an_object(value: &serde_json::Value) -> Self {
        Self::NotAnObject {
            found: json_kind(value),
        }
    }

    /// Creates invalid identity error from the offending `_id` value.
    #[must_use]
    pub fn invalid_identity(value: &serde_json::Value) -> Self {
        Self::InvalidIdentity {
            found: json_kind(value),
        }
    }

    /// Returns whether the record was rejected before any field was read.
    #[must_use]
    pub const fn is_shape_error(&self) -> bool {
        matches!(self, Self::NotAnObject { .. })
    }
}

/// Human readable name of a JSON value's type.
#[must_use]
pub const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
