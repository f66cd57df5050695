//! # Decode Error Context
//!
//! Every decode failure must point at the exact offending node of the
//! authoring document, so editors can highlight the field instead of
//! showing a bare "validation failed". [`ErrorContext`] accumulates the
//! navigation path as the decoder descends and renders it into two strings:
//!
//! - `location`: the dotted/bracketed path to the enclosing node, e.g.
//!   `schema.fields[2].enum` (array-index segments are appended without a
//!   separator).
//! - `property`: the nearest property name, with a trailing index folded
//!   in, e.g. `enum[0]`.
//!
//! Contexts are immutable and cheap; [`ErrorContext::add`] returns a new
//! context, so speculative validation branches can share a parent context
//! safely.

use serde_json::Value;
use thiserror::Error;

/// Maximum number of characters of an offending value shown in a message.
const VALUE_PREVIEW_LIMIT: usize = 20;

/// Result alias for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// The detail half of an invalid-format message: what shape of value the
/// decoder expected at the offending node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    /// A string value.
    String,
    /// A non-empty string value.
    NonEmptyString,
    /// A boolean value.
    Boolean,
    /// A primitive type name or a sub-schema reference.
    Type,
    /// A help-text size in the open interval (0, 70).
    TextSize,
    /// An RGB color definition.
    TextColor,
    /// One of the four requirement state names.
    RequirementState,
    /// An enum value list or a remote enum reference.
    Enum,
    /// An array value.
    Array,
    /// A single, non-array value.
    Scalar,
    /// A reference to a declared field.
    FieldReference,
    /// One of the entity kind literals.
    EntityKind,
    /// A condition predicate in one of the accepted shapes.
    Predicate,
}

impl std::fmt::Display for ValueRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::String => "Value of type string is required.",
            Self::NonEmptyString => "Non-empty value of type string is required.",
            Self::Boolean => "Value of type boolean is required.",
            Self::Type => "Value of a primitive type or a sub-schema reference is required.",
            Self::TextSize => "Positive numeric value between 0 and 70 is required.",
            Self::TextColor => "Rgb color definition in format #xxx or #xxxxxx is required.",
            Self::RequirementState => {
                "Value must be one of [None, Required, Hidden, Auto Calculate]."
            }
            Self::Enum => "Value of type enum or a reference to an enum is required.",
            Self::Array => "Value of type array is required.",
            Self::Scalar => "A single (non-array) value is required.",
            Self::FieldReference => "Value must be a reference to an existing field.",
            Self::EntityKind => "Value must be one of [NONE, VC, EVC].",
            Self::Predicate => {
                "A predicate is required: a field/value pair, an AND list, or an OR list."
            }
        };
        f.write_str(text)
    }
}

/// A located decode failure.
///
/// Every variant carries the path to the offending node; the rendered
/// message is suitable for direct display next to the field in an editor.
/// Decoding is fail-fast: the first error aborts the whole decode and the
/// caller must treat it as "reject this document", never as transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A value had the wrong shape or type for its position.
    #[error("invalid format for property \"{property}\" in {location}. {detail}")]
    InvalidFormat {
        /// Path to the enclosing node.
        location: String,
        /// The offending property, possibly with a value preview.
        property: String,
        /// What was expected instead.
        detail: ValueRule,
    },

    /// A property was supplied where the current field type or entity
    /// kind forbids it.
    #[error("property \"{property}\" in {location} is not available for this field type or entity kind")]
    NotAvailable {
        /// Path to the enclosing node.
        location: String,
        /// The forbidden property.
        property: String,
    },

    /// A conditional field group with neither branch populated.
    #[error("empty \"then\" and \"else\" branches in {location}, at least one field must be specified")]
    ThenElseEmpty {
        /// Path to the condition.
        location: String,
    },

    /// A field name collided with an earlier sibling.
    #[error("duplicate field key \"{property}\" at {location}")]
    DuplicateKey {
        /// Path to the second occurrence's key.
        location: String,
        /// The colliding field name.
        property: String,
    },
}

/// Immutable path accumulator for decode diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    path: Vec<String>,
    location: String,
    property: String,
}

impl ErrorContext {
    /// A context rooted at the given segment.
    pub fn root(segment: &str) -> Self {
        Self::with_path(vec![segment.to_string()])
    }

    /// Replace the path wholesale and recompute the derived strings.
    pub fn with_path(path: Vec<String>) -> Self {
        let (location, property) = derive(&path);
        Self {
            path,
            location,
            property,
        }
    }

    /// A new context with `segment` appended. The receiver is untouched.
    pub fn add(&self, segment: &str) -> Self {
        let mut path = self.path.clone();
        path.push(segment.to_string());
        Self::with_path(path)
    }

    /// The dotted/bracketed path to the enclosing node.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The nearest property name, with a trailing index folded in.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The full path including the final property segment.
    pub fn full_path(&self) -> String {
        let mut full = String::new();
        for (i, segment) in self.path.iter().enumerate() {
            if i > 0 && !segment.starts_with('[') {
                full.push('.');
            }
            full.push_str(segment);
        }
        full
    }

    /// An invalid-format failure at this context, optionally carrying a
    /// truncated preview of the offending value.
    pub fn invalid_format(&self, detail: ValueRule, value: Option<&Value>) -> DecodeError {
        let property = match value {
            Some(v) => format!("{} (={})", self.property, value_preview(v)),
            None => self.property.clone(),
        };
        DecodeError::InvalidFormat {
            location: self.location.clone(),
            property,
            detail,
        }
    }

    /// A forbidden-property failure at this context.
    pub fn not_available(&self) -> DecodeError {
        DecodeError::NotAvailable {
            location: self.location.clone(),
            property: self.property.clone(),
        }
    }

    /// An empty-branches failure at this context.
    pub fn then_else_empty(&self) -> DecodeError {
        DecodeError::ThenElseEmpty {
            location: self.full_path(),
        }
    }

    /// A duplicate-key failure at this context, naming the colliding key.
    pub fn duplicate_key(&self, name: &str) -> DecodeError {
        DecodeError::DuplicateKey {
            location: self.full_path(),
            property: name.to_string(),
        }
    }
}

/// Compute the derived location/property strings for a path.
///
/// The location joins all but the last segment with `.`, appending
/// index segments (those starting with `[`) without a separator. The
/// property is the last segment, or the previous segment with the index
/// folded in when the last segment is an index, so an error on `enum[0]`
/// reports property `enum[0]`.
fn derive(path: &[String]) -> (String, String) {
    let mut location = String::new();
    if let Some(first) = path.first() {
        location.push_str(first);
    }
    if path.len() > 2 {
        for segment in &path[1..path.len() - 1] {
            if segment.starts_with('[') {
                location.push_str(segment);
            } else {
                location.push('.');
                location.push_str(segment);
            }
        }
    }

    let property = match path {
        [] => String::new(),
        [only] => only.clone(),
        [.., prev, last] => {
            if last.starts_with('[') {
                format!("{prev}{last}")
            } else {
                last.clone()
            }
        }
    };

    (location, property)
}

/// Compact JSON preview of a value, truncated for display in messages.
fn value_preview(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() > VALUE_PREVIEW_LIMIT {
        let truncated: String = rendered.chars().take(VALUE_PREVIEW_LIMIT).collect();
        format!("{truncated}...")
    } else {
        rendered
    }
}
