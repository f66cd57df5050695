//! # Authoring Document Model
//!
//! Typed representation of the human-authorable schema definition format.
//! The encoder produces these structs; serializing them yields the exact
//! JSON shape editors read and write. The decoder deliberately does *not*
//! consume them: its job is to validate arbitrary input shapes with located
//! errors, so it walks a raw `serde_json::Value` instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Font size applied to help-text fields that carry no explicit size.
pub const DEFAULT_TEXT_SIZE: &str = "18";
/// Font color applied to help-text fields that carry no explicit color.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// One field of an authoring document.
///
/// `required` is a string (`None`/`Required`/`Hidden`/`Auto Calculate`) and
/// `type` a human-readable name; both are resolved to typed form by the
/// decoder. Properties that are only meaningful for certain types or
/// states are omitted when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldDocument {
    /// Stable field key, unique within its list.
    pub key: String,
    /// Display label.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Requirement state name.
    pub required: String,
    /// Human-readable type name or sub-schema IRI.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Whether the field holds an array of values.
    pub is_array: bool,
    /// Free-form grouping string.
    pub property: String,
    /// Validation pattern; emitted for `String` fields with a custom
    /// pattern and for table types that define one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Privacy marker; only present when explicitly set (EVC schemas).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Enum values or a remote enum reference; only for `Enum` fields.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<EnumDocument>,
    /// Help-text font size; only for `Help Text` fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_size: Option<String>,
    /// Help-text font color; only for `Help Text` fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Help-text bold flag; only for `Help Text` fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_bold: Option<bool>,
    /// Calculation expression; only for auto-calculated fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Measurement unit; only for `Prefix`/`Postfix` fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Example value: an array for array fields, a scalar otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Value>,
    /// Suggested value, shaped like `examples`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggest: Option<Value>,
    /// Default value, shaped like `examples`.
    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Editor-selectable options, shaped like `examples`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_options: Option<Value>,
    /// Update marker; emitted only when true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_updatable: Option<bool>,
}

/// The `enum` property of a field: an explicit value list or a link to a
/// remotely-hosted one. The two are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumDocument {
    /// Explicit values.
    Values(Vec<String>),
    /// Remote value-list reference.
    RemoteLink(String),
}

/// One `field == value` comparison in a condition predicate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClauseDocument {
    /// Name of a declared field.
    pub field: String,
    /// The comparison value.
    #[serde(rename = "fieldValue")]
    pub value: Value,
}

/// The `if` expression of a condition, in its canonical document shapes.
///
/// A conjunction or disjunction of a single clause is never emitted; the
/// encoder flattens it to the bare clause shape, mirroring the decoder's
/// canonicalization so that repeated encode/decode cycles are idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredicateDocument {
    /// All clauses must hold; always two or more.
    AllOf {
        /// The conjunction clauses.
        #[serde(rename = "AND")]
        clauses: Vec<ClauseDocument>,
    },
    /// At least one clause must hold; always two or more.
    AnyOf {
        /// The disjunction clauses.
        #[serde(rename = "OR")]
        clauses: Vec<ClauseDocument>,
    },
    /// A single comparison.
    Single(ClauseDocument),
}

/// One conditional field group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDocument {
    /// The governing predicate.
    #[serde(rename = "if")]
    pub if_predicate: PredicateDocument,
    /// Fields that apply when the predicate holds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub then: Vec<FieldDocument>,
    /// Fields that apply when the predicate does not hold.
    #[serde(rename = "else", default, skip_serializing_if = "Vec::is_empty")]
    pub else_fields: Vec<FieldDocument>,
}

/// A complete authoring document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaDocument {
    /// Schema display name.
    pub name: String,
    /// Schema description.
    pub description: String,
    /// Entity kind literal (`NONE`, `VC`, `EVC`).
    pub entity: String,
    /// Ledger topic passthrough; empty when the schema is unpublished.
    pub topic_id: String,
    /// Declared fields, in authoring order.
    pub fields: Vec<FieldDocument>,
    /// Conditional field groups.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ConditionDocument>,
}
