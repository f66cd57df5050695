//! # Schema Field Model
//!
//! One declared or inherited property of a schema, plus the two small enums
//! that gate its behavior: [`Requirement`] (the four-way requirement state)
//! and [`UnitSystem`] (prefix/postfix measure fields).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The requirement state of a field.
///
/// Authoring documents encode this state as one of the strings `None`,
/// `Required`, `Hidden`, `Auto Calculate` (or a bare boolean in older
/// documents). Internally it is a single enum: exactly one state holds at a
/// time, and `match` over it is exhaustive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requirement {
    /// Optional, visible, user-supplied.
    #[default]
    None,
    /// Must be present in conforming documents.
    Required,
    /// Not rendered by editors; still part of the schema.
    Hidden,
    /// Derived from other fields via an expression, never user-supplied.
    AutoCalculate,
}

impl Requirement {
    /// The canonical authoring-document string for this state.
    pub fn as_document_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Required => "Required",
            Self::Hidden => "Hidden",
            Self::AutoCalculate => "Auto Calculate",
        }
    }

    /// Parse the polymorphic `required` property of an authoring document.
    ///
    /// Accepts boolean literals (including the exact strings `"true"` and
    /// `"false"`), the four canonical state names case-insensitively, and
    /// treats null or the empty string as [`Requirement::None`]. Returns
    /// `None` for anything else; the caller decides how to report it.
    pub fn from_document_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::None),
            Value::Bool(true) => Some(Self::Required),
            Value::Bool(false) => Some(Self::None),
            Value::String(s) => match s.as_str() {
                "" | "false" => Some(Self::None),
                "true" => Some(Self::Required),
                other if other.eq_ignore_ascii_case("none") => Some(Self::None),
                other if other.eq_ignore_ascii_case("required") => Some(Self::Required),
                other if other.eq_ignore_ascii_case("hidden") => Some(Self::Hidden),
                other if other.eq_ignore_ascii_case("auto calculate") => {
                    Some(Self::AutoCalculate)
                }
                _ => None,
            },
            _ => None,
        }
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_document_str())
    }
}

/// Placement of the measurement unit relative to the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Unit precedes the value (e.g. `$ 10`).
    Prefix,
    /// Unit follows the value (e.g. `10 kg`).
    Postfix,
}

impl UnitSystem {
    /// The authoring-document type name that selects this unit system.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Prefix => "Prefix",
            Self::Postfix => "Postfix",
        }
    }
}

/// One property of a schema.
///
/// Constructed by the decoder (from an authoring document) or directly by
/// the policy/ledger layer. The struct itself enforces nothing beyond what
/// the type system gives; structural validation is the decoder's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaField {
    /// Stable key, unique within its field list.
    pub name: String,
    /// Human-facing label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Human-facing description.
    pub description: String,
    /// Free-form grouping string used by editors.
    pub property_path: String,
    /// Primitive-kind tag (`string`, `number`, ...) or the IRI of another
    /// schema when [`SchemaField::is_ref`] is set.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Serialization format qualifier (`date`, `email`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Validation pattern for string-kinded fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Measurement unit; present iff `unit_system` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Unit placement; present only for measure fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_system: Option<UnitSystem>,
    /// Platform-specific type tag (`enum`, `hederaAccount`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_type: Option<String>,
    /// Whether conforming documents carry an array of values.
    pub is_array: bool,
    /// Whether the value may change across document revisions.
    pub is_updatable: bool,
    /// True iff `field_type` is the IRI of another schema.
    pub is_ref: bool,
    /// Tri-state privacy marker; only meaningful when the owning schema's
    /// entity kind is EVC. `None` means "not set", which is distinct from
    /// `Some(false)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    /// The four-way requirement state.
    pub requirement: Requirement,
    /// Help-text render color (`#rgb` or `#rrggbb`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Help-text render size in points, stored as a bare number string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_size: Option<String>,
    /// Help-text bold flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_bold: Option<bool>,
    /// Explicit enum values; mutually exclusive with `remote_enum_link`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Reference to an externally-hosted enum value list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_enum_link: Option<String>,
    /// Editor-suggested value options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_options: Option<Vec<Value>>,
    /// Calculation expression; present iff the requirement state is
    /// [`Requirement::AutoCalculate`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Example values, stored array-shaped. Non-array fields hold exactly
    /// one element here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,
    /// Suggested values, stored array-shaped like `examples`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggest: Option<Vec<Value>>,
    /// Default values, stored array-shaped like `examples`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Vec<Value>>,
    /// Deep snapshot of the referenced schema's fields. Populated only for
    /// ref fields, empty otherwise. A snapshot, not a live reference: the
    /// referenced schema existed before this field was decoded, so cycles
    /// cannot form.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SchemaField>,
    /// Position within the authored field list.
    pub order: usize,
    /// True for system-injected fields that authors never write.
    pub read_only: bool,
}

impl SchemaField {
    /// Whether any of the help-text font properties is set.
    pub fn has_font(&self) -> bool {
        self.text_size.is_some() || self.text_color.is_some() || self.text_bold.is_some()
    }
}
