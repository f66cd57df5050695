//! # Schema Encoder
//!
//! Transforms a validated internal [`Schema`] into an editable authoring
//! document. Encoding is total: a well-formed schema always encodes, and a
//! malformed one is a programming error in the caller, not a user error,
//! so there is no error path here. The one caller-visible gap is a field
//! whose type tuple matches no registry entry; it encodes with an empty
//! type name rather than failing.
//!
//! System-injected read-only fields are skipped entirely. The decoder
//! re-derives them from the entity kind, so emitting them would only
//! invite authors to edit what they cannot change.

use tracing::debug;

use vcp_core::{Predicate, PredicateClause, Requirement, Schema, SchemaCondition, SchemaField};

use crate::document::{
    ClauseDocument, ConditionDocument, EnumDocument, FieldDocument, PredicateDocument,
    SchemaDocument, DEFAULT_TEXT_COLOR, DEFAULT_TEXT_SIZE,
};
use crate::registry::FieldTypeRegistry;

/// Encoder from the internal schema model to authoring documents.
#[derive(Debug, Clone)]
pub struct SchemaEncoder<'a> {
    registry: &'a FieldTypeRegistry,
}

impl<'a> SchemaEncoder<'a> {
    /// Build an encoder over the given type registry.
    pub fn new(registry: &'a FieldTypeRegistry) -> Self {
        Self { registry }
    }

    /// Encode a schema into an authoring document.
    pub fn encode(&self, schema: &Schema) -> SchemaDocument {
        debug!(
            name = %schema.name,
            fields = schema.fields.len(),
            conditions = schema.conditions.len(),
            "encoding schema to authoring document"
        );
        SchemaDocument {
            name: schema.name.clone(),
            description: schema.description.clone().unwrap_or_default(),
            entity: schema.entity.as_str().to_string(),
            topic_id: schema.topic_id.clone().unwrap_or_default(),
            fields: schema
                .authored_fields()
                .map(|field| self.encode_field(field))
                .collect(),
            conditions: schema
                .conditions
                .iter()
                .map(|condition| self.encode_condition(condition))
                .collect(),
        }
    }

    /// Encode one field.
    pub fn encode_field(&self, field: &SchemaField) -> FieldDocument {
        FieldDocument {
            key: field.name.clone(),
            title: field.title.clone().unwrap_or_default(),
            description: field.description.clone(),
            required: field.requirement.as_document_str().to_string(),
            field_type: self.type_name_for(field),
            pattern: self.pattern_for(field),
            is_array: field.is_array,
            property: field.property_path.clone(),
            private: field.is_private,
            enum_values: encode_enum(field),
            text_size: field
                .has_font()
                .then(|| field.text_size.clone().unwrap_or_else(|| DEFAULT_TEXT_SIZE.to_string())),
            text_color: field
                .has_font()
                .then(|| field.text_color.clone().unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string())),
            text_bold: field.has_font().then(|| field.text_bold.unwrap_or(false)),
            expression: (field.requirement == Requirement::AutoCalculate)
                .then(|| field.expression.clone().unwrap_or_default()),
            unit: field.unit_system.and(field.unit.clone()),
            examples: encode_sample(&field.examples, field.is_array),
            suggest: encode_sample(&field.suggest, field.is_array),
            default_value: encode_sample(&field.default_value, field.is_array),
            available_options: encode_sample(&field.available_options, field.is_array),
            is_updatable: field.is_updatable.then_some(true),
        }
    }

    /// The human-readable type name for a field, by priority: sub-schema
    /// reference, unit system, hedera account, registry tuple match, bare
    /// string, then the empty-string encoding gap.
    fn type_name_for(&self, field: &SchemaField) -> String {
        if field.is_ref {
            return self
                .registry
                .system_type_name(&field.field_type)
                .map(str::to_string)
                .unwrap_or_else(|| field.field_type.clone());
        }
        if let Some(unit_system) = field.unit_system {
            return unit_system.type_name().to_string();
        }
        if field.custom_type.as_deref() == Some("hederaAccount") {
            return "HederaAccount".to_string();
        }
        if let Some(descriptor) = self.registry.reverse_lookup(
            &field.field_type,
            field.format.as_deref(),
            field.pattern.as_deref(),
            field.custom_type.as_deref(),
        ) {
            return descriptor.name.to_string();
        }
        if field.field_type == "string" {
            return "String".to_string();
        }
        String::new()
    }

    /// The pattern to emit: the matched table type's own pattern, or the
    /// user-supplied pattern for bare string fields.
    fn pattern_for(&self, field: &SchemaField) -> Option<String> {
        if let Some(descriptor) = self.registry.reverse_lookup(
            &field.field_type,
            field.format.as_deref(),
            field.pattern.as_deref(),
            field.custom_type.as_deref(),
        ) {
            return descriptor.pattern.map(str::to_string);
        }
        if !field.is_ref && field.field_type == "string" {
            return field.pattern.clone();
        }
        None
    }

    /// Encode one conditional field group.
    fn encode_condition(&self, condition: &SchemaCondition) -> ConditionDocument {
        ConditionDocument {
            if_predicate: encode_predicate(&condition.if_predicate),
            then: condition
                .then_fields
                .iter()
                .map(|field| self.encode_field(field))
                .collect(),
            else_fields: condition
                .else_fields
                .iter()
                .map(|field| self.encode_field(field))
                .collect(),
        }
    }
}

/// Encode a predicate, flattening one-clause conjunctions/disjunctions to
/// the bare clause shape. This mirrors the decoder's canonicalization so
/// that repeated encode/decode cycles are idempotent even for predicates
/// constructed directly by the policy layer.
fn encode_predicate(predicate: &Predicate) -> PredicateDocument {
    match predicate {
        Predicate::Single(clause) => PredicateDocument::Single(encode_clause(clause)),
        Predicate::And(clauses) if clauses.len() == 1 => {
            PredicateDocument::Single(encode_clause(&clauses[0]))
        }
        Predicate::Or(clauses) if clauses.len() == 1 => {
            PredicateDocument::Single(encode_clause(&clauses[0]))
        }
        Predicate::And(clauses) => PredicateDocument::AllOf {
            clauses: clauses.iter().map(encode_clause).collect(),
        },
        Predicate::Or(clauses) => PredicateDocument::AnyOf {
            clauses: clauses.iter().map(encode_clause).collect(),
        },
    }
}

fn encode_clause(clause: &PredicateClause) -> ClauseDocument {
    ClauseDocument {
        field: clause.field.name.clone(),
        value: clause.value.clone(),
    }
}

/// The enum property: explicit values win over a remote link; the two are
/// mutually exclusive in a well-formed schema.
fn encode_enum(field: &SchemaField) -> Option<EnumDocument> {
    debug_assert!(
        field.enum_values.is_none() || field.remote_enum_link.is_none(),
        "enum values and remote link are mutually exclusive"
    );
    field
        .enum_values
        .clone()
        .map(EnumDocument::Values)
        .or_else(|| field.remote_enum_link.clone().map(EnumDocument::RemoteLink))
}

/// Emit a stored sample: array fields carry their vector verbatim, scalar
/// fields carry the single wrapped element.
fn encode_sample(
    sample: &Option<Vec<serde_json::Value>>,
    is_array: bool,
) -> Option<serde_json::Value> {
    sample.as_ref().map(|values| {
        if is_array {
            serde_json::Value::Array(values.clone())
        } else {
            debug_assert!(values.len() == 1, "scalar samples are stored 1-element");
            values.first().cloned().unwrap_or(serde_json::Value::Null)
        }
    })
}
