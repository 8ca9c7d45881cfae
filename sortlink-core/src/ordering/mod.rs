//! Ordering module for hybrid backend/in-memory sorting
//!
//! This module provides:
//! - Ordering expressions (`-field`, `relation.field`) and sort directions
//! - The record field-access capability and sort keys
//! - The resolver deciding between backend delegation and in-memory sorting
//! - An in-process query backend

pub mod collection;
pub mod descriptor;
pub mod expression;
pub mod key;
pub mod memory;
pub mod order;
pub mod record;
pub mod resolver;

#[cfg(test)]
mod tests;

pub use collection::{Ordered, QueryHandle, SortableCollection};
pub use descriptor::CollectionDescriptor;
pub use expression::{
    DEFAULT_PATH_SEPARATOR, DESCENDING_MARKER, FieldReference,
    OrderingExpression,
};
pub use key::SortKey;
pub use memory::{MemoryQuery, MemoryQueryError};
pub use order::SortOrder;
pub use record::{
    FieldAccess, FieldAccessor, FieldKind, FieldTable, FieldTableBuilder,
    Fielded, RelationAccessor, lookup_path,
};
pub use resolver::{
    OrderingPlan, OrderingResolver, ResolverSettings, sort_records,
};
