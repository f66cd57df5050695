//! End-to-end codec properties: encoding a well-formed schema and decoding
//! the result against the same catalog reproduces the schema exactly,
//! modulo the read-only fields that encoding omits and decoding re-injects.

use serde_json::json;

use vcp_core::{
    EntityKind, Predicate, PredicateClause, Requirement, Schema, SchemaCondition, SchemaField,
    UnitSystem,
};
use vcp_schema::{DecodeError, FieldTypeRegistry, SchemaDecoder, SchemaEncoder};

fn catalog() -> Vec<Schema> {
    vec![Schema {
        iri: Some("ipfs://schema/address#1.0.0".to_string()),
        name: "Address".to_string(),
        entity: EntityKind::Vc,
        fields: vec![
            SchemaField {
                name: "street".to_string(),
                field_type: "string".to_string(),
                requirement: Requirement::Required,
                ..SchemaField::default()
            },
            SchemaField {
                name: "city".to_string(),
                field_type: "string".to_string(),
                order: 1,
                ..SchemaField::default()
            },
        ],
        ..Schema::default()
    }]
}

/// A schema exercising every field flavor the codec supports.
fn rich_schema(catalog: &[Schema]) -> Schema {
    let fields = vec![
        SchemaField {
            name: "title".to_string(),
            title: Some("Title".to_string()),
            description: "Document title".to_string(),
            field_type: "string".to_string(),
            pattern: Some("^[A-Z].*".to_string()),
            requirement: Requirement::Required,
            examples: Some(vec![json!("Annual report")]),
            ..SchemaField::default()
        },
        SchemaField {
            name: "issued".to_string(),
            field_type: "string".to_string(),
            format: Some("date-time".to_string()),
            order: 1,
            ..SchemaField::default()
        },
        SchemaField {
            name: "status".to_string(),
            field_type: "string".to_string(),
            custom_type: Some("enum".to_string()),
            enum_values: Some(vec!["active".to_string(), "retired".to_string()]),
            order: 2,
            ..SchemaField::default()
        },
        SchemaField {
            name: "price".to_string(),
            field_type: "number".to_string(),
            unit: Some("$".to_string()),
            unit_system: Some(UnitSystem::Prefix),
            order: 3,
            ..SchemaField::default()
        },
        SchemaField {
            name: "note".to_string(),
            field_type: "null".to_string(),
            custom_type: Some("helpText".to_string()),
            text_size: Some("24".to_string()),
            text_color: Some("#ff0000".to_string()),
            text_bold: Some(true),
            order: 4,
            ..SchemaField::default()
        },
        SchemaField {
            name: "total".to_string(),
            field_type: "number".to_string(),
            requirement: Requirement::AutoCalculate,
            expression: Some("price * 2".to_string()),
            order: 5,
            ..SchemaField::default()
        },
        SchemaField {
            name: "home".to_string(),
            title: Some("Home".to_string()),
            field_type: "ipfs://schema/address#1.0.0".to_string(),
            is_ref: true,
            fields: catalog[0].fields.clone(),
            order: 6,
            ..SchemaField::default()
        },
        SchemaField {
            name: "tags".to_string(),
            field_type: "string".to_string(),
            is_array: true,
            is_updatable: true,
            examples: Some(vec![json!("a"), json!("b")]),
            order: 7,
            ..SchemaField::default()
        },
        SchemaField {
            name: "secret".to_string(),
            field_type: "string".to_string(),
            is_private: Some(true),
            available_options: Some(vec![json!("x")]),
            order: 8,
            ..SchemaField::default()
        },
    ];

    let conditions = vec![
        SchemaCondition {
            if_predicate: Predicate::Single(PredicateClause::new(
                fields[2].clone(),
                json!("active"),
            )),
            then_fields: vec![SchemaField {
                name: "activated".to_string(),
                field_type: "string".to_string(),
                format: Some("date".to_string()),
                ..SchemaField::default()
            }],
            else_fields: Vec::new(),
        },
        SchemaCondition {
            if_predicate: Predicate::And(vec![
                PredicateClause::new(fields[2].clone(), json!("retired")),
                PredicateClause::new(fields[0].clone(), json!("Archive")),
            ]),
            then_fields: Vec::new(),
            else_fields: vec![SchemaField {
                name: "successor".to_string(),
                field_type: "string".to_string(),
                ..SchemaField::default()
            }],
        },
        SchemaCondition {
            if_predicate: Predicate::Or(vec![
                PredicateClause::new(fields[1].clone(), json!("2024-01-01T00:00:00Z")),
                PredicateClause::new(fields[3].clone(), json!(0)),
            ]),
            then_fields: vec![SchemaField {
                name: "flagged".to_string(),
                field_type: "boolean".to_string(),
                ..SchemaField::default()
            }],
            else_fields: Vec::new(),
        },
    ];

    Schema {
        iri: None,
        name: "Asset".to_string(),
        description: Some("An encrypted asset credential".to_string()),
        topic_id: Some("0.0.4242".to_string()),
        entity: EntityKind::Evc,
        fields,
        conditions,
    }
}

#[test]
fn encode_then_decode_reproduces_the_schema() {
    let registry = FieldTypeRegistry::default();
    let catalog = catalog();
    let schema = rich_schema(&catalog);

    let encoder = SchemaEncoder::new(&registry);
    let decoder = SchemaDecoder::new(&registry, &catalog);

    let document = serde_json::to_value(encoder.encode(&schema)).unwrap();
    let decoded = decoder.decode(&document).unwrap();

    let authored = schema.fields.len();
    assert_eq!(&decoded.fields[..authored], &schema.fields[..]);

    // Encoding omits the injected read-only fields; decoding re-adds them.
    let injected = &decoded.fields[authored..];
    assert_eq!(injected.len(), 2);
    assert_eq!(injected[0].name, "policyId");
    assert_eq!(injected[1].name, "ref");
    assert!(injected.iter().all(|f| f.read_only));
    assert_eq!(injected[0].order, authored);

    assert_eq!(decoded.name, schema.name);
    assert_eq!(decoded.description, schema.description);
    assert_eq!(decoded.topic_id, schema.topic_id);
    assert_eq!(decoded.entity, schema.entity);
    assert_eq!(decoded.conditions, schema.conditions);
    assert!(decoded.iri.is_none());
}

#[test]
fn encode_decode_encode_is_idempotent() {
    let registry = FieldTypeRegistry::default();
    let catalog = catalog();
    let schema = rich_schema(&catalog);

    let encoder = SchemaEncoder::new(&registry);
    let decoder = SchemaDecoder::new(&registry, &catalog);

    let first = encoder.encode(&schema);
    let decoded = decoder
        .decode(&serde_json::to_value(&first).unwrap())
        .unwrap();
    let second = encoder.encode(&decoded);
    assert_eq!(first, second);
}

#[test]
fn one_clause_connectives_collapse_across_a_full_cycle() {
    let registry = FieldTypeRegistry::default();
    let encoder = SchemaEncoder::new(&registry);
    let decoder = SchemaDecoder::new(&registry, &[]);

    let field = SchemaField {
        name: "a".to_string(),
        field_type: "string".to_string(),
        ..SchemaField::default()
    };
    // Constructed directly, bypassing the canonicalizing constructors.
    let schema = Schema {
        name: "t".to_string(),
        fields: vec![field.clone()],
        conditions: vec![SchemaCondition {
            if_predicate: Predicate::And(vec![PredicateClause::new(field, json!(1))]),
            then_fields: vec![SchemaField {
                name: "b".to_string(),
                field_type: "string".to_string(),
                ..SchemaField::default()
            }],
            else_fields: Vec::new(),
        }],
        ..Schema::default()
    };

    let document = serde_json::to_value(encoder.encode(&schema)).unwrap();
    // The one-clause conjunction was flattened to the bare clause shape.
    assert_eq!(
        document["conditions"][0]["if"],
        json!({"field": "a", "fieldValue": 1})
    );

    let decoded = decoder.decode(&document).unwrap();
    assert!(matches!(
        decoded.conditions[0].if_predicate,
        Predicate::Single(_)
    ));
}

#[test]
fn minimal_document_round_trips_with_required_state() {
    // A one-field NONE document decodes to a required string field with no
    // injected defaults, and re-encodes with the same requirement string.
    let registry = FieldTypeRegistry::default();
    let decoder = SchemaDecoder::new(&registry, &[]);
    let encoder = SchemaEncoder::new(&registry);

    let document = json!({
        "name": "t",
        "entity": "NONE",
        "fields": [{"key": "f1", "type": "String", "required": "Required"}],
        "conditions": []
    });
    let schema = decoder.decode(&document).unwrap();
    assert_eq!(schema.fields.len(), 1);
    assert_eq!(schema.fields[0].name, "f1");
    assert_eq!(schema.fields[0].requirement, Requirement::Required);
    assert_eq!(schema.fields[0].field_type, "string");

    let re_encoded = encoder.encode(&schema);
    assert_eq!(re_encoded.fields.len(), 1);
    assert_eq!(re_encoded.fields[0].required, "Required");
    assert_eq!(re_encoded.fields[0].field_type, "String");
}

#[test]
fn duplicate_keys_fail_with_a_located_error() {
    let registry = FieldTypeRegistry::default();
    let decoder = SchemaDecoder::new(&registry, &[]);
    let document = json!({
        "name": "t",
        "entity": "NONE",
        "fields": [
            {"key": "dup", "type": "String"},
            {"key": "dup", "type": "String"}
        ]
    });
    let err = decoder.decode(&document).unwrap_err();
    match err {
        DecodeError::DuplicateKey { location, property } => {
            assert_eq!(location, "schema.fields[1].key");
            assert_eq!(property, "dup");
        }
        other => panic!("expected DuplicateKey, got {other:?}"),
    }
}

#[test]
fn single_clause_and_decodes_to_single() {
    let registry = FieldTypeRegistry::default();
    let decoder = SchemaDecoder::new(&registry, &[]);
    let document = json!({
        "name": "t",
        "entity": "NONE",
        "fields": [{"key": "a", "type": "String"}],
        "conditions": [{
            "if": {"AND": [{"field": "a", "fieldValue": 1}]},
            "then": [{"key": "b", "type": "String"}]
        }]
    });
    let schema = decoder.decode(&document).unwrap();
    match &schema.conditions[0].if_predicate {
        Predicate::Single(clause) => {
            assert_eq!(clause.field.name, "a");
            assert_eq!(clause.value, json!(1));
        }
        other => panic!("expected Single, got {other:?}"),
    }
}

#[test]
fn sub_schema_snapshots_survive_the_round_trip() {
    let registry = FieldTypeRegistry::default();
    let catalog = catalog();
    let decoder = SchemaDecoder::new(&registry, &catalog);
    let encoder = SchemaEncoder::new(&registry);

    let document = json!({
        "name": "t",
        "entity": "NONE",
        "fields": [{"key": "home", "type": "ipfs://schema/address#1.0.0"}]
    });
    let schema = decoder.decode(&document).unwrap();
    assert_eq!(schema.fields[0].fields, catalog[0].fields);

    // The reference encodes back to the raw IRI, not the inlined fields.
    let re_encoded = encoder.encode(&schema);
    assert_eq!(re_encoded.fields[0].field_type, "ipfs://schema/address#1.0.0");
    let re_decoded = decoder
        .decode(&serde_json::to_value(&re_encoded).unwrap())
        .unwrap();
    assert_eq!(re_decoded.fields, schema.fields);
}
