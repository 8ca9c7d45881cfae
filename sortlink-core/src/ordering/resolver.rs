//! Ordering resolver
//!
//! Decides whether a requested ordering can be handed to the backend or has
//! to be performed by comparing records in memory, and performs it.
//!
//! In-memory sorting is chosen only when the field reference is simple (no
//! path separator) *and* not a native backend field. Native fields and
//! compound paths go to the backend. A materialized sequence has no backend,
//! so those are sorted in memory too, walking relations for compound paths.

use super::{
    collection::{Ordered, QueryHandle, SortableCollection},
    descriptor::CollectionDescriptor,
    expression::{DEFAULT_PATH_SEPARATOR, OrderingExpression},
    key::SortKey,
    order::SortOrder,
    record::{FieldAccess, lookup_path},
};
use crate::error::{OrderingError, ResolveError};
use tracing::debug;

/// Settings for [`OrderingResolver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Separator between relation segments (`.` or Django-style `__`).
    pub path_separator: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
        }
    }
}

/// How an ordering expression will be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderingPlan {
    /// Hand the full expression to the backend.
    Delegate,
    /// Compare records in memory by `field`.
    InMemory { field: String, order: SortOrder },
}

/// Stateless service resolving ordering requests.
///
/// Build one at startup and share it by reference between requests.
#[derive(Debug, Clone, Default)]
pub struct OrderingResolver {
    settings: ResolverSettings,
}

impl OrderingResolver {
    pub fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Classify a non-empty expression without touching any records.
    pub fn classify(
        &self,
        descriptor: &CollectionDescriptor,
        expression: &OrderingExpression,
    ) -> Result<OrderingPlan, OrderingError> {
        let reference = expression.parse()?;

        if reference.is_compound(&self.settings.path_separator)
            || descriptor.contains(reference.name)
        {
            return Ok(OrderingPlan::Delegate);
        }

        Ok(OrderingPlan::InMemory {
            field: reference.name.to_string(),
            order: reference.order,
        })
    }

    /// Apply `expression` to `collection`.
    ///
    /// - no expression (or an empty one): the collection, unchanged
    /// - empty collection: unchanged, whatever the expression says
    /// - delegated: a new query handle, nothing executed
    /// - in memory: a new sorted `Vec`, or an [`OrderingError`]
    ///
    /// Errors raised by the backend itself come back as
    /// [`ResolveError::Backend`].
    pub fn resolve<'a, Q: QueryHandle>(
        &self,
        collection: &'a SortableCollection<Q>,
        descriptor: &CollectionDescriptor,
        expression: Option<&OrderingExpression>,
    ) -> Result<Ordered<'a, Q>, ResolveError<Q::Error>> {
        let Some(expression) = expression.filter(|expr| !expr.is_empty())
        else {
            return Ok(Ordered::Original(collection));
        };

        if collection.is_empty().map_err(ResolveError::Backend)? {
            debug!(%expression, "empty collection, nothing to order");
            return Ok(Ordered::Original(collection));
        }

        match self.classify(descriptor, expression)? {
            OrderingPlan::Delegate => match collection {
                SortableCollection::Query(query) => {
                    debug!(%expression, "delegating ordering to backend");
                    let ordered = query
                        .order_by(expression)
                        .map_err(ResolveError::Backend)?;
                    Ok(Ordered::Delegated(ordered))
                }
                SortableCollection::Records(records) => {
                    let reference = expression.parse()?;
                    let segments =
                        reference.segments(&self.settings.path_separator);
                    debug!(
                        %expression,
                        "no backend for a materialized sequence, sorting in memory"
                    );
                    let sorted = sort_by_key_of(
                        records,
                        reference.name,
                        reference.order,
                        |record| lookup_path(record, &segments),
                    )?;
                    Ok(Ordered::Sorted(sorted))
                }
            },
            OrderingPlan::InMemory { field, order } => {
                debug!(%expression, %field, %order, "sorting records in memory");
                let records =
                    collection.records().map_err(ResolveError::Backend)?;
                let sorted = sort_records(&records, &field, order)?;
                Ok(Ordered::Sorted(sorted))
            }
        }
    }
}

/// Stable sort of `records` by the value each exposes for `field`.
///
/// All-or-nothing: if any record (the first one is checked first) lacks the
/// field, the whole sort fails with [`OrderingError::AttributeNotFound`] and
/// no partial result is produced. Equal keys keep their input order in both
/// directions.
pub fn sort_records<R>(
    records: &[R],
    field: &str,
    order: SortOrder,
) -> Result<Vec<R>, OrderingError>
where
    R: FieldAccess + Clone,
{
    sort_by_key_of(records, field, order, |record| record.field(field))
}

/// Index-keyed stable sort; `name` is reported when `key_of` finds nothing.
fn sort_by_key_of<R, F>(
    records: &[R],
    name: &str,
    order: SortOrder,
    key_of: F,
) -> Result<Vec<R>, OrderingError>
where
    R: FieldAccess + Clone,
    F: Fn(&dyn FieldAccess) -> Option<SortKey>,
{
    let mut keyed: Vec<(usize, SortKey)> = records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            key_of(record).map(|key| (idx, key)).ok_or_else(|| {
                OrderingError::AttributeNotFound {
                    field: name.to_string(),
                }
            })
        })
        .collect::<Result<_, _>>()?;

    keyed.sort_by(|a, b| order.apply(a.1.cmp(&b.1)));

    Ok(keyed
        .into_iter()
        .map(|(idx, _)| records[idx].clone())
        .collect())
}
