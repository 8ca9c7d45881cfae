//! Core library for sortlink
//!
//! Two independent pieces:
//! - [`OrderingResolver`] applies an ordering expression (`-created_at`,
//!   `author.name`) to a collection, handing it to the backend when the
//!   backend can order natively and sorting records in memory otherwise.
//! - [`LinkBuilder`] produces per-column sort links that toggle the
//!   direction of the active column.
//!
//! [`Autosort`] ties request parameters, the resolver and the invalid-field
//! policy together.

pub mod autosort;
pub mod error;
pub mod link;
pub mod ordering;

pub use autosort::{Autosort, AutosortError, InvalidFieldBehavior};
pub use error::{OrderingError, ResolveError, Result};
pub use link::{
    ColumnTitle, DirectionIndicators, LinkBuilder, LinkDescriptor,
    LinkSettings, MapContext, NoContext, QueryParamNames, SortColumn,
    SortState, TitleContext,
};
pub use ordering::{
    CollectionDescriptor, FieldAccess, FieldKind, FieldReference, FieldTable,
    Fielded, MemoryQuery, MemoryQueryError, Ordered, OrderingExpression,
    OrderingPlan, OrderingResolver, QueryHandle, ResolverSettings, SortKey,
    SortOrder, SortableCollection,
};

pub use url::Url;
