//! # Schema Decoder
//!
//! Validates an authoring document against the type registry and the
//! catalog of already-published schemas, producing the internal [`Schema`]
//! model or a located [`DecodeError`].
//!
//! The decoder walks a raw `serde_json::Value`: its whole job is to turn
//! arbitrary input shapes into precise diagnostics, which a typed serde
//! deserialization would swallow into generic parse errors.
//!
//! Decoding is fail-fast. The first violation aborts the call; no partial
//! schema is ever returned, and callers must treat any error as "reject
//! this document".

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use vcp_core::{
    EntityKind, Predicate, PredicateClause, Requirement, Schema, SchemaCondition, SchemaField,
    UnitSystem,
};

use crate::context::{DecodeResult, ErrorContext, ValueRule};
use crate::document::{DEFAULT_TEXT_COLOR, DEFAULT_TEXT_SIZE};
use crate::registry::{FieldTypeRegistry, TypeDescriptor};

/// How a field's declared type name resolved.
enum ResolvedType<'a> {
    /// A built-in or custom table entry.
    Primitive(&'a TypeDescriptor),
    /// A system sub-schema type.
    SystemRef(&'a TypeDescriptor),
    /// A catalog schema matched by IRI.
    SubSchema(&'a Schema),
}

/// Decoder from authoring documents to the internal schema model.
///
/// Holds only shared read-only references; it is safe to invoke
/// concurrently from multiple threads. All per-decode mutable state (the
/// field-name uniqueness sets) is scoped to individual calls.
#[derive(Debug, Clone)]
pub struct SchemaDecoder<'a> {
    registry: &'a FieldTypeRegistry,
    catalog: &'a [Schema],
}

impl<'a> SchemaDecoder<'a> {
    /// Build a decoder over the given registry and the catalog of
    /// previously-resolved schemas available for sub-schema references.
    pub fn new(registry: &'a FieldTypeRegistry, catalog: &'a [Schema]) -> Self {
        Self { registry, catalog }
    }

    /// Decode a complete authoring document.
    pub fn decode(&self, document: &Value) -> DecodeResult<Schema> {
        let cx = ErrorContext::root("schema");

        let name = required_string(document.get("name"), &cx.add("name"))?;
        let description = optional_string(document.get("description"), &cx.add("description"))?
            .filter(|s| !s.is_empty());
        let topic_id = optional_string(document.get("topicId"), &cx.add("topicId"))?
            .filter(|s| !s.is_empty());
        let entity = decode_entity(document.get("entity"), &cx.add("entity"))?;

        let mut fields = self.decode_fields(
            document.get("fields").unwrap_or(&Value::Null),
            entity,
            &cx.add("fields"),
        )?;
        let conditions =
            self.decode_conditions(document.get("conditions"), &fields, entity, &cx.add("conditions"))?;

        // System fields are injected after validation; they are never part
        // of the authored uniqueness scope.
        let base = fields.len();
        for (offset, mut template) in self
            .registry
            .default_fields_for(entity)
            .into_iter()
            .enumerate()
        {
            template.read_only = true;
            template.order = base + offset;
            fields.push(template);
        }

        debug!(
            name = %name,
            fields = fields.len(),
            conditions = conditions.len(),
            "decoded authoring document"
        );
        Ok(Schema {
            iri: None,
            name,
            description,
            topic_id,
            entity,
            fields,
            conditions,
        })
    }

    /// Decode a field list. The uniqueness set is local to this call, so
    /// the top-level list and each condition branch get independent
    /// duplicate detection.
    fn decode_fields(
        &self,
        value: &Value,
        entity: EntityKind,
        cx: &ErrorContext,
    ) -> DecodeResult<Vec<SchemaField>> {
        let entries = value
            .as_array()
            .ok_or_else(|| cx.invalid_format(ValueRule::Array, Some(value)))?;
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            fields.push(self.decode_field(entry, index, entity, &mut seen, cx)?);
        }
        Ok(fields)
    }

    fn decode_field(
        &self,
        value: &Value,
        index: usize,
        entity: EntityKind,
        seen: &mut HashSet<String>,
        cx: &ErrorContext,
    ) -> DecodeResult<SchemaField> {
        let cx = cx.add(&format!("[{index}]"));

        let name = required_string(value.get("key"), &cx.add("key"))?;
        let title =
            optional_string(value.get("title"), &cx.add("title"))?.filter(|s| !s.is_empty());
        let description =
            optional_string(value.get("description"), &cx.add("description"))?.unwrap_or_default();
        let property_path =
            optional_string(value.get("property"), &cx.add("property"))?.unwrap_or_default();

        let type_cx = cx.add("type");
        let type_value = value.get("type");
        let type_name = type_value
            .and_then(Value::as_str)
            .ok_or_else(|| type_cx.invalid_format(ValueRule::Type, type_value))?;
        let resolved = self
            .resolve_type(type_name)
            .ok_or_else(|| type_cx.invalid_format(ValueRule::Type, type_value))?;

        let (field_type, format, custom_type, is_ref) = match &resolved {
            ResolvedType::Primitive(d) => (
                d.internal_type.to_string(),
                d.format.map(str::to_string),
                d.custom_type.map(str::to_string),
                false,
            ),
            ResolvedType::SystemRef(d) => (d.internal_type.to_string(), None, None, true),
            ResolvedType::SubSchema(_) => (type_name.to_string(), None, None, true),
        };

        let pattern = match &resolved {
            // A bare string field carries whatever pattern the author wrote.
            ResolvedType::Primitive(d) if d.name == "String" => {
                optional_string(value.get("pattern"), &cx.add("pattern"))?
            }
            // Table types carry their table pattern; an authored value is
            // redundant and ignored.
            ResolvedType::Primitive(d) => d.pattern.map(str::to_string),
            ResolvedType::SystemRef(_) | ResolvedType::SubSchema(_) => {
                if present(value.get("pattern")) {
                    return Err(cx.add("pattern").not_available());
                }
                None
            }
        };

        let unit_system = match &resolved {
            ResolvedType::Primitive(d) if d.name == "Prefix" => Some(UnitSystem::Prefix),
            ResolvedType::Primitive(d) if d.name == "Postfix" => Some(UnitSystem::Postfix),
            _ => None,
        };
        let unit = match unit_system {
            Some(_) => Some(required_string(value.get("unit"), &cx.add("unit"))?),
            None => {
                if present(value.get("unit")) {
                    return Err(cx.add("unit").not_available());
                }
                None
            }
        };

        let required_value = value.get("required").unwrap_or(&Value::Null);
        let requirement = Requirement::from_document_value(required_value).ok_or_else(|| {
            cx.add("required")
                .invalid_format(ValueRule::RequirementState, Some(required_value))
        })?;

        let is_array = boolean_value(value.get("isArray"), &cx.add("isArray"))?.unwrap_or(false);
        let is_updatable =
            boolean_value(value.get("isUpdatable"), &cx.add("isUpdatable"))?.unwrap_or(false);

        let is_private = if entity == EntityKind::Evc {
            boolean_value(value.get("private"), &cx.add("private"))?
        } else {
            if present(value.get("private")) {
                return Err(cx.add("private").not_available());
            }
            None
        };

        let is_enum_type = matches!(&resolved, ResolvedType::Primitive(d) if d.name == "Enum");
        let (enum_values, remote_enum_link) = if is_enum_type {
            let enum_cx = cx.add("enum");
            match value.get("enum") {
                Some(Value::Array(items)) => {
                    let mut values = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        values.push(required_string(Some(item), &enum_cx.add(&format!("[{i}]")))?);
                    }
                    (Some(values), None)
                }
                Some(Value::String(link)) => (None, Some(link.clone())),
                other => return Err(enum_cx.invalid_format(ValueRule::Enum, other)),
            }
        } else {
            if present(value.get("enum")) {
                return Err(cx.add("enum").not_available());
            }
            (None, None)
        };

        let expression = if requirement == Requirement::AutoCalculate {
            Some(required_string(value.get("expression"), &cx.add("expression"))?)
        } else {
            if present(value.get("expression")) {
                return Err(cx.add("expression").not_available());
            }
            None
        };

        let is_help_text =
            matches!(&resolved, ResolvedType::Primitive(d) if d.name == "Help Text");
        let (text_size, text_color, text_bold) = if is_help_text {
            (
                Some(
                    decode_text_size(value.get("textSize"), &cx.add("textSize"))?
                        .unwrap_or_else(|| DEFAULT_TEXT_SIZE.to_string()),
                ),
                Some(
                    decode_text_color(value.get("textColor"), &cx.add("textColor"))?
                        .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
                ),
                Some(boolean_value(value.get("textBold"), &cx.add("textBold"))?.unwrap_or(false)),
            )
        } else {
            for property in ["textSize", "textColor", "textBold"] {
                if present(value.get(property)) {
                    return Err(cx.add(property).not_available());
                }
            }
            (None, None, None)
        };

        let examples = decode_sample(value.get("examples"), is_array, &cx.add("examples"))?;
        let suggest = decode_sample(value.get("suggest"), is_array, &cx.add("suggest"))?;
        let default_value = decode_sample(value.get("default"), is_array, &cx.add("default"))?;
        let available_options = decode_sample(
            value.get("availableOptions"),
            is_array,
            &cx.add("availableOptions"),
        )?;

        let fields = match &resolved {
            // Deep snapshot of the referenced schema's fields. The catalog
            // schema predates this decode call and is never re-decoded, so
            // the copy cannot recurse or form a cycle.
            ResolvedType::SubSchema(schema) => schema.fields.clone(),
            _ => Vec::new(),
        };

        if !seen.insert(name.clone()) {
            return Err(cx.add("key").duplicate_key(&name));
        }

        Ok(SchemaField {
            name,
            title,
            description,
            property_path,
            field_type,
            format,
            pattern,
            unit,
            unit_system,
            custom_type,
            is_array,
            is_updatable,
            is_ref,
            is_private,
            requirement,
            text_color,
            text_size,
            text_bold,
            enum_values,
            remote_enum_link,
            available_options,
            expression,
            examples,
            suggest,
            default_value,
            fields,
            order: index,
            read_only: false,
        })
    }

    fn decode_conditions(
        &self,
        value: Option<&Value>,
        fields: &[SchemaField],
        entity: EntityKind,
        cx: &ErrorContext,
    ) -> DecodeResult<Vec<SchemaCondition>> {
        let value = match value {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(v) => v,
        };
        let entries = value
            .as_array()
            .ok_or_else(|| cx.invalid_format(ValueRule::Array, Some(value)))?;
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| self.decode_condition(entry, index, fields, entity, cx))
            .collect()
    }

    fn decode_condition(
        &self,
        value: &Value,
        index: usize,
        fields: &[SchemaField],
        entity: EntityKind,
        cx: &ErrorContext,
    ) -> DecodeResult<SchemaCondition> {
        let cx = cx.add(&format!("[{index}]"));
        let if_predicate = decode_predicate(value.get("if"), fields, &cx.add("if"))?;
        let then_fields = self.decode_branch(value.get("then"), entity, &cx.add("then"))?;
        let else_fields = self.decode_branch(value.get("else"), entity, &cx.add("else"))?;
        if then_fields.is_empty() && else_fields.is_empty() {
            return Err(cx.then_else_empty());
        }
        Ok(SchemaCondition {
            if_predicate,
            then_fields,
            else_fields,
        })
    }

    /// A condition branch is a nested field list with its own uniqueness
    /// scope, independent of the top-level list and of the other branch.
    fn decode_branch(
        &self,
        value: Option<&Value>,
        entity: EntityKind,
        cx: &ErrorContext,
    ) -> DecodeResult<Vec<SchemaField>> {
        match value {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(v) => self.decode_fields(v, entity, cx),
        }
    }

    fn resolve_type(&self, name: &str) -> Option<ResolvedType<'a>> {
        if let Some(descriptor) = self.registry.lookup_by_name(name) {
            return Some(if descriptor.is_ref {
                ResolvedType::SystemRef(descriptor)
            } else {
                ResolvedType::Primitive(descriptor)
            });
        }
        self.catalog
            .iter()
            .find(|schema| schema.iri.as_deref() == Some(name))
            .map(ResolvedType::SubSchema)
    }
}

/// Decode the `if` expression of a condition. Four shapes are accepted:
/// an `AND` list, an `OR` list, the legacy `predicates`+`op` list, and a
/// bare field/value clause. The three list shapes are mutually exclusive;
/// supplying more than one is an error rather than a precedence guess.
fn decode_predicate(
    value: Option<&Value>,
    fields: &[SchemaField],
    cx: &ErrorContext,
) -> DecodeResult<Predicate> {
    let Some(predicate_value) = value else {
        return Err(cx.invalid_format(ValueRule::Predicate, None));
    };
    let Some(object) = predicate_value.as_object() else {
        return Err(cx.invalid_format(ValueRule::Predicate, Some(predicate_value)));
    };

    let connectives = ["AND", "OR", "predicates"]
        .iter()
        .filter(|key| object.contains_key(**key))
        .count();
    if connectives > 1 {
        return Err(cx.invalid_format(ValueRule::Predicate, Some(predicate_value)));
    }

    if let Some(clauses_value) = object.get("AND") {
        let clauses = decode_clauses(clauses_value, fields, &cx.add("AND"))?;
        return Ok(Predicate::all_of(clauses));
    }
    if let Some(clauses_value) = object.get("OR") {
        let clauses = decode_clauses(clauses_value, fields, &cx.add("OR"))?;
        return Ok(Predicate::any_of(clauses));
    }
    if let Some(clauses_value) = object.get("predicates") {
        // Legacy shape from the previous document generation: a predicate
        // list plus an operator, ANY_OF selecting disjunction.
        let clauses = decode_clauses(clauses_value, fields, &cx.add("predicates"))?;
        let any_of = object.get("op").and_then(Value::as_str) == Some("ANY_OF");
        return Ok(if any_of {
            Predicate::any_of(clauses)
        } else {
            Predicate::all_of(clauses)
        });
    }
    if object.contains_key("field") {
        return Ok(Predicate::Single(decode_clause(
            predicate_value,
            fields,
            cx,
        )?));
    }
    Err(cx.invalid_format(ValueRule::Predicate, Some(predicate_value)))
}

fn decode_clauses(
    value: &Value,
    fields: &[SchemaField],
    cx: &ErrorContext,
) -> DecodeResult<Vec<PredicateClause>> {
    let entries = value
        .as_array()
        .filter(|entries| !entries.is_empty())
        .ok_or_else(|| cx.invalid_format(ValueRule::Array, Some(value)))?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| decode_clause(entry, fields, &cx.add(&format!("[{index}]"))))
        .collect()
}

fn decode_clause(
    value: &Value,
    fields: &[SchemaField],
    cx: &ErrorContext,
) -> DecodeResult<PredicateClause> {
    let field_cx = cx.add("field");
    let name = required_string(value.get("field"), &field_cx)?;
    let field = fields
        .iter()
        .find(|f| f.name == name)
        .ok_or_else(|| field_cx.invalid_format(ValueRule::FieldReference, value.get("field")))?
        .clone();
    let comparison = value.get("fieldValue").cloned().unwrap_or(Value::Null);
    Ok(PredicateClause::new(field, comparison))
}

fn decode_entity(value: Option<&Value>, cx: &ErrorContext) -> DecodeResult<EntityKind> {
    value
        .and_then(Value::as_str)
        .and_then(EntityKind::parse)
        .ok_or_else(|| cx.invalid_format(ValueRule::EntityKind, value))
}

/// A sample property (`examples`, `suggest`, `default`,
/// `availableOptions`). Array fields author an array, scalar fields a
/// single value; the scalar is wrapped so the model is uniformly
/// array-shaped.
fn decode_sample(
    value: Option<&Value>,
    is_array: bool,
    cx: &ErrorContext,
) -> DecodeResult<Option<Vec<Value>>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) if is_array => Ok(Some(items.clone())),
        Some(array @ Value::Array(_)) => Err(cx.invalid_format(ValueRule::Scalar, Some(array))),
        Some(v) if is_array => Err(cx.invalid_format(ValueRule::Array, Some(v))),
        Some(v) => Ok(Some(vec![v.clone()])),
    }
}

/// Help-text size: a number, or a string with an optional `px` suffix,
/// in the open interval (0, 70). Normalized to a bare number string.
fn decode_text_size(value: Option<&Value>, cx: &ErrorContext) -> DecodeResult<Option<String>> {
    let size = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.is_empty() => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim_end_matches("px").parse::<f64>().ok(),
        _ => None,
    };
    match size {
        Some(v) if v > 0.0 && v < 70.0 => Ok(Some(v.to_string())),
        _ => Err(cx.invalid_format(ValueRule::TextSize, value)),
    }
}

/// Help-text color: `#xxx` or `#xxxxxx`.
fn decode_text_color(value: Option<&Value>, cx: &ErrorContext) -> DecodeResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) if is_valid_color(s) => Ok(Some(s.clone())),
        other => Err(cx.invalid_format(ValueRule::TextColor, other)),
    }
}

fn is_valid_color(s: &str) -> bool {
    let Some(hex) = s.strip_prefix('#') else {
        return false;
    };
    (hex.len() == 3 || hex.len() == 6) && hex.bytes().all(|b| b.is_ascii_hexdigit())
}

fn required_string(value: Option<&Value>, cx: &ErrorContext) -> DecodeResult<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        other => Err(cx.invalid_format(ValueRule::NonEmptyString, other)),
    }
}

fn optional_string(value: Option<&Value>, cx: &ErrorContext) -> DecodeResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        other => Err(cx.invalid_format(ValueRule::String, other)),
    }
}

/// A boolean, also accepting the literal strings `"true"` and `"false"`
/// that older authoring tools emitted.
fn boolean_value(value: Option<&Value>, cx: &ErrorContext) -> DecodeResult<Option<bool>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) if s == "true" => Ok(Some(true)),
        Some(Value::String(s)) if s == "false" => Ok(Some(false)),
        other => Err(cx.invalid_format(ValueRule::Boolean, other)),
    }
}

/// Whether a property was supplied at all. JSON `null` counts as absent.
fn present(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !v.is_null())
}
