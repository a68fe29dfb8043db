//! Static per-type schemas describing attribute names, types and multiplicity.
//!
//! The patch applier resolves paths through these definitions to decide whether
//! an operation targets a collection, and the filter evaluator uses them to find
//! a resource type's unique lookup attribute.

pub mod definitions;
pub mod types;

pub use definitions::{GROUP_SCHEMA_URN, USER_SCHEMA_URN, group_schema, user_schema};
pub use types::{AttributeDefinition, AttributeType, ResolvedPath, ResourceSchema, Uniqueness};
