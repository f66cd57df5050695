//! # vcp-core — Foundational Schema Types for the Veridian Credential Platform
//!
//! This crate defines the internal, strongly-typed schema model shared by the
//! policy engine, the document validator, and the ledger publisher. It is the
//! leaf of the workspace dependency graph: every other `vcp-*` crate depends
//! on it, and it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Illegal states are unrepresentable.** The requirement state of a
//!    field (`none`/`required`/`hidden`/`auto-calculate`) is one exhaustive
//!    [`Requirement`] enum, not independent booleans. Two-at-once cannot be
//!    constructed.
//!
//! 2. **Predicates are one tagged union.** Conditional field groups carry a
//!    [`Predicate`] built through canonicalizing constructors; a conjunction
//!    or disjunction of a single clause is always collapsed to
//!    [`Predicate::Single`], so consumers can rely on `And`/`Or` holding at
//!    least two clauses.
//!
//! 3. **Sub-schema fields are snapshots.** A ref-typed [`SchemaField`] owns a
//!    deep copy of the referenced schema's fields. No shared references, no
//!    aliasing, no cycles.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vcp-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod condition;
pub mod field;
pub mod schema;

// Re-export primary types for ergonomic imports.
pub use condition::{Predicate, PredicateClause, SchemaCondition};
pub use field::{Requirement, SchemaField, UnitSystem};
pub use schema::{EntityKind, Schema};
