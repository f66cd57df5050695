//! # Schema Aggregate
//!
//! The validated, internal representation of a document template: declared
//! fields in authoring order, system-injected read-only fields, and
//! conditional field groups. Consumed read-only by the policy engine, the
//! document validator, and the ledger publisher.

use serde::{Deserialize, Serialize};

use crate::condition::SchemaCondition;
use crate::field::SchemaField;

/// Classification of a schema, gating which optional field properties are
/// legal and which read-only fields the platform injects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Plain template, no credential semantics.
    #[default]
    #[serde(rename = "NONE")]
    None,
    /// Verifiable credential.
    #[serde(rename = "VC")]
    Vc,
    /// Encrypted verifiable credential. The only kind on which per-field
    /// privacy markers are legal.
    #[serde(rename = "EVC")]
    Evc,
}

impl EntityKind {
    /// The authoring-document literal for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Vc => "VC",
            Self::Evc => "EVC",
        }
    }

    /// Parse an authoring-document literal. Exact match only; the three
    /// literals are part of the wire contract and are never case-folded.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NONE" => Some(Self::None),
            "VC" => Some(Self::Vc),
            "EVC" => Some(Self::Evc),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated document template.
///
/// Constructed by the schema decoder or directly by the policy/ledger
/// layer. Neither the encoder nor the decoder mutates a `Schema`; both
/// return fresh values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Schema {
    /// Unique textual identifier, assigned when the schema is published to
    /// the ledger. `None` for freshly decoded, not-yet-published schemas.
    /// Ref-typed fields in other schemas target this value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iri: Option<String>,
    /// Schema display name.
    pub name: String,
    /// Schema description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ledger topic the schema was published under. Opaque to the codec;
    /// carried so that export/import round-trips do not lose it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
    /// Entity classification.
    pub entity: EntityKind,
    /// Declared fields in authoring order, followed by the entity-specific
    /// read-only fields the platform injects.
    pub fields: Vec<SchemaField>,
    /// Conditional field groups.
    pub conditions: Vec<SchemaCondition>,
}

impl Schema {
    /// Find a declared field by name.
    pub fn find_field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The authored (non-read-only) fields, in order.
    pub fn authored_fields(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.iter().filter(|f| !f.read_only)
    }
}
