//! # Field Type Registry
//!
//! Maps the human-readable type names used in authoring documents
//! (`"String"`, `"DateTime"`, `"GeoJSON"`, ...) to internal type
//! descriptors, and back. Three ordered tables are queried in sequence:
//! built-in primitives, platform custom types, then system sub-schema
//! types. A name that matches none of them is resolved against the schema
//! catalog by the decoder.
//!
//! The registry also supplies the read-only fields the platform injects
//! into every schema of a given entity kind. It is populated once at
//! process start and treated as immutable for the lifetime of a codec
//! call, so it is freely shared across threads.

use vcp_core::{EntityKind, Requirement, SchemaField};

/// Description of one named field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// The human-readable name authors write (`"DateTime"`).
    pub name: &'static str,
    /// The internal primitive tag (`"string"`) or, for system types, the
    /// IRI of the referenced sub-schema (`"#GeoJSON"`).
    pub internal_type: &'static str,
    /// Serialization format qualifier, if any.
    pub format: Option<&'static str>,
    /// Validation pattern, if any.
    pub pattern: Option<&'static str>,
    /// Platform-specific type tag, if any.
    pub custom_type: Option<&'static str>,
    /// True for system types that resolve to a sub-schema reference.
    pub is_ref: bool,
}

impl TypeDescriptor {
    const fn primitive(name: &'static str, internal_type: &'static str) -> Self {
        Self {
            name,
            internal_type,
            format: None,
            pattern: None,
            custom_type: None,
            is_ref: false,
        }
    }

    const fn formatted(
        name: &'static str,
        internal_type: &'static str,
        format: &'static str,
    ) -> Self {
        Self {
            name,
            internal_type,
            format: Some(format),
            pattern: None,
            custom_type: None,
            is_ref: false,
        }
    }

    const fn system(name: &'static str, iri: &'static str) -> Self {
        Self {
            name,
            internal_type: iri,
            format: None,
            pattern: None,
            custom_type: None,
            is_ref: true,
        }
    }
}

/// Built-in primitive types, in lookup order.
const BUILTIN_TYPES: &[TypeDescriptor] = &[
    TypeDescriptor::primitive("Number", "number"),
    TypeDescriptor::primitive("Integer", "integer"),
    TypeDescriptor::primitive("String", "string"),
    TypeDescriptor::primitive("Boolean", "boolean"),
    TypeDescriptor::formatted("Date", "string", "date"),
    TypeDescriptor::formatted("Time", "string", "time"),
    TypeDescriptor::formatted("DateTime", "string", "date-time"),
    TypeDescriptor::formatted("Duration", "string", "duration"),
    TypeDescriptor::formatted("URL", "string", "url"),
    TypeDescriptor::formatted("URI", "string", "uri"),
    TypeDescriptor::formatted("Email", "string", "email"),
    TypeDescriptor {
        name: "Image",
        internal_type: "string",
        format: None,
        pattern: Some("^ipfs://.+"),
        custom_type: None,
        is_ref: false,
    },
    TypeDescriptor {
        name: "Enum",
        internal_type: "string",
        format: None,
        pattern: None,
        custom_type: Some("enum"),
        is_ref: false,
    },
    TypeDescriptor {
        name: "Help Text",
        internal_type: "null",
        format: None,
        pattern: None,
        custom_type: Some("helpText"),
        is_ref: false,
    },
];

/// Platform custom types, queried after the built-ins.
const CUSTOM_TYPES: &[TypeDescriptor] = &[
    TypeDescriptor::primitive("Prefix", "number"),
    TypeDescriptor::primitive("Postfix", "number"),
    TypeDescriptor {
        name: "HederaAccount",
        internal_type: "string",
        format: None,
        pattern: Some("^\\d+\\.\\d+\\.\\d+$"),
        custom_type: Some("hederaAccount"),
        is_ref: false,
    },
];

/// System sub-schema types, queried last before the catalog.
const SYSTEM_TYPES: &[TypeDescriptor] = &[
    TypeDescriptor::system("GeoJSON", "#GeoJSON"),
    TypeDescriptor::system("SentinelHub", "#SentinelHUB"),
];

/// The type registry consulted by both codec directions.
#[derive(Debug, Clone)]
pub struct FieldTypeRegistry {
    builtin: &'static [TypeDescriptor],
    custom: &'static [TypeDescriptor],
    system: &'static [TypeDescriptor],
}

impl Default for FieldTypeRegistry {
    fn default() -> Self {
        Self {
            builtin: BUILTIN_TYPES,
            custom: CUSTOM_TYPES,
            system: SYSTEM_TYPES,
        }
    }
}

impl FieldTypeRegistry {
    /// Resolve a human-readable type name against the three tables, in
    /// order. Matching is ASCII-case-insensitive. `None` means the name is
    /// not a registered type and should be tried against the schema
    /// catalog.
    pub fn lookup_by_name(&self, name: &str) -> Option<&TypeDescriptor> {
        self.builtin
            .iter()
            .chain(self.custom)
            .chain(self.system)
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Reverse lookup for the encoder: find the descriptor whose
    /// `(internal_type, format, pattern, custom_type)` tuple matches the
    /// field exactly. Built-ins win over custom types.
    pub fn reverse_lookup(
        &self,
        internal_type: &str,
        format: Option<&str>,
        pattern: Option<&str>,
        custom_type: Option<&str>,
    ) -> Option<&TypeDescriptor> {
        self.builtin.iter().chain(self.custom).find(|t| {
            t.internal_type == internal_type
                && t.format == format
                && t.pattern == pattern
                && t.custom_type == custom_type
        })
    }

    /// The display name of a system sub-schema type, by IRI. Used by the
    /// encoder so that ref fields targeting system schemas render as their
    /// friendly name rather than the raw IRI.
    pub fn system_type_name(&self, iri: &str) -> Option<&'static str> {
        self.system
            .iter()
            .find(|t| t.internal_type == iri)
            .map(|t| t.name)
    }

    /// The read-only fields the platform injects for the given entity
    /// kind, in order. Authors never write these; the decoder appends them
    /// after validation and the encoder skips them.
    pub fn default_fields_for(&self, entity: EntityKind) -> Vec<SchemaField> {
        match entity {
            EntityKind::None => Vec::new(),
            EntityKind::Vc | EntityKind::Evc => vec![
                SchemaField {
                    name: "policyId".to_string(),
                    title: Some("Policy Id".to_string()),
                    description: "Policy Id".to_string(),
                    field_type: "string".to_string(),
                    requirement: Requirement::Required,
                    read_only: true,
                    ..SchemaField::default()
                },
                SchemaField {
                    name: "ref".to_string(),
                    title: Some("Relationships".to_string()),
                    description: "Relationships".to_string(),
                    field_type: "string".to_string(),
                    read_only: true,
                    ..SchemaField::default()
                },
            ],
        }
    }
}
