//! # Conditional Field Groups
//!
//! A schema may attach groups of fields that apply only when a predicate
//! over already-declared fields holds. The predicate is a tagged union with
//! a canonical form: a conjunction or disjunction of exactly one clause is
//! always represented as [`Predicate::Single`], both when decoding authoring
//! documents and when the policy layer constructs predicates directly.
//! Consumers can therefore rely on `And`/`Or` holding at least two clauses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::SchemaField;

/// One `field == value` comparison.
///
/// Holds a snapshot of the resolved field, not a name: by the time a
/// predicate exists, the reference has been checked against the schema's
/// declared field list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateClause {
    /// The field being compared.
    pub field: SchemaField,
    /// The value the field is compared against.
    pub value: Value,
}

impl PredicateClause {
    /// Build a clause from a resolved field and a comparison value.
    pub fn new(field: SchemaField, value: Value) -> Self {
        Self { field, value }
    }
}

/// The condition expression of a conditional field group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// A single comparison.
    Single(PredicateClause),
    /// All clauses must hold. Always two or more clauses.
    And(Vec<PredicateClause>),
    /// At least one clause must hold. Always two or more clauses.
    Or(Vec<PredicateClause>),
}

impl Predicate {
    /// Canonicalizing conjunction constructor: one clause collapses to
    /// [`Predicate::Single`].
    ///
    /// Callers must supply at least one clause; decoders reject empty
    /// clause lists before reaching this point.
    pub fn all_of(mut clauses: Vec<PredicateClause>) -> Self {
        debug_assert!(!clauses.is_empty(), "predicate needs at least one clause");
        if clauses.len() == 1 {
            Self::Single(clauses.remove(0))
        } else {
            Self::And(clauses)
        }
    }

    /// Canonicalizing disjunction constructor: one clause collapses to
    /// [`Predicate::Single`].
    pub fn any_of(mut clauses: Vec<PredicateClause>) -> Self {
        debug_assert!(!clauses.is_empty(), "predicate needs at least one clause");
        if clauses.len() == 1 {
            Self::Single(clauses.remove(0))
        } else {
            Self::Or(clauses)
        }
    }

    /// All clauses of this predicate, regardless of variant.
    pub fn clauses(&self) -> &[PredicateClause] {
        match self {
            Self::Single(clause) => std::slice::from_ref(clause),
            Self::And(clauses) | Self::Or(clauses) => clauses,
        }
    }
}

/// One conditional field group: a predicate plus the fields that apply when
/// it holds (`then_fields`) or does not (`else_fields`).
///
/// The decoder guarantees the branches are not both empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaCondition {
    /// The governing predicate.
    pub if_predicate: Predicate,
    /// Fields that apply when the predicate holds.
    pub then_fields: Vec<SchemaField>,
    /// Fields that apply when the predicate does not hold.
    pub else_fields: Vec<SchemaField>,
}
