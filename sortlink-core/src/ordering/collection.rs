//! Collections the resolver can order
//!
//! A collection is either a lazy backend query handle or a sequence of records
//! that has already been materialized. The resolver borrows it and never
//! mutates it; results are returned as [`Ordered`].

use super::{expression::OrderingExpression, record::FieldAccess};
use std::{borrow::Cow, fmt};

/// Backend query handle supporting native ordering.
///
/// `order_by` must not execute anything: it returns a new handle with the
/// ordering clause attached, leaving `self` untouched.
pub trait QueryHandle: Sized {
    type Record: FieldAccess + Clone;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Whether the query yields at least one record.
    fn exists(&self) -> Result<bool, Self::Error>;

    /// New handle ordered by `ordering`, marker included. Backends translate
    /// the leading `-` into their own descending convention.
    fn order_by(
        &self,
        ordering: &OrderingExpression,
    ) -> Result<Self, Self::Error>;

    /// Execute the query and materialize its records.
    fn fetch(&self) -> Result<Vec<Self::Record>, Self::Error>;
}

/// Either a query handle or a materialized sequence.
pub enum SortableCollection<Q: QueryHandle> {
    Query(Q),
    Records(Vec<Q::Record>),
}

impl<Q: QueryHandle> SortableCollection<Q> {
    pub fn is_empty(&self) -> Result<bool, Q::Error> {
        match self {
            SortableCollection::Query(query) => query.exists().map(|e| !e),
            SortableCollection::Records(records) => Ok(records.is_empty()),
        }
    }

    /// Records in their current order; executes the query if needed.
    pub fn records(&self) -> Result<Cow<'_, [Q::Record]>, Q::Error> {
        match self {
            SortableCollection::Query(query) => query.fetch().map(Cow::Owned),
            SortableCollection::Records(records) => {
                Ok(Cow::Borrowed(records.as_slice()))
            }
        }
    }

    pub fn as_query(&self) -> Option<&Q> {
        match self {
            SortableCollection::Query(query) => Some(query),
            SortableCollection::Records(_) => None,
        }
    }
}

impl<Q> Clone for SortableCollection<Q>
where
    Q: QueryHandle + Clone,
{
    fn clone(&self) -> Self {
        match self {
            SortableCollection::Query(query) => {
                SortableCollection::Query(query.clone())
            }
            SortableCollection::Records(records) => {
                SortableCollection::Records(records.clone())
            }
        }
    }
}

impl<Q> fmt::Debug for SortableCollection<Q>
where
    Q: QueryHandle + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortableCollection::Query(query) => {
                f.debug_tuple("Query").field(query).finish()
            }
            SortableCollection::Records(records) => f
                .debug_struct("Records")
                .field("len", &records.len())
                .finish(),
        }
    }
}

impl<Q: QueryHandle> From<Q> for SortableCollection<Q> {
    fn from(query: Q) -> Self {
        SortableCollection::Query(query)
    }
}

/// Result of resolving an ordering against a collection.
pub enum Ordered<'a, Q: QueryHandle> {
    /// The input collection, untouched, in its prior order.
    Original(&'a SortableCollection<Q>),
    /// A new handle carrying the backend ordering clause.
    Delegated(Q),
    /// A freshly materialized, comparison-sorted sequence.
    Sorted(Vec<Q::Record>),
}

impl<'a, Q: QueryHandle> Ordered<'a, Q> {
    pub fn is_original(&self) -> bool {
        matches!(self, Ordered::Original(_))
    }

    pub fn is_delegated(&self) -> bool {
        matches!(self, Ordered::Delegated(_))
    }

    pub fn is_sorted(&self) -> bool {
        matches!(self, Ordered::Sorted(_))
    }

    /// Materialize the result, executing a delegated query if necessary.
    pub fn into_records(self) -> Result<Vec<Q::Record>, Q::Error> {
        match self {
            Ordered::Original(collection) => {
                collection.records().map(Cow::into_owned)
            }
            Ordered::Delegated(query) => query.fetch(),
            Ordered::Sorted(records) => Ok(records),
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Ordered::Original(_) => "original",
            Ordered::Delegated(_) => "delegated",
            Ordered::Sorted(_) => "sorted",
        }
    }
}

impl<Q> fmt::Debug for Ordered<'_, Q>
where
    Q: QueryHandle + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ordered::Original(collection) => {
                f.debug_tuple("Original").field(collection).finish()
            }
            Ordered::Delegated(query) => {
                f.debug_tuple("Delegated").field(query).finish()
            }
            Ordered::Sorted(records) => f
                .debug_struct("Sorted")
                .field("len", &records.len())
                .finish(),
        }
    }
}
