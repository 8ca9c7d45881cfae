//! Request-level sorting
//!
//! [`Autosort`] reads the sort state from request parameters, runs the
//! resolver and applies the configured policy for ordering errors.

use crate::{
    error::{OrderingError, ResolveError},
    link::{QueryParamNames, SortState},
    ordering::{
        CollectionDescriptor, Ordered, OrderingExpression, OrderingResolver,
        QueryHandle, SortableCollection,
    },
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// What to do when the requested field cannot be sorted on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidFieldBehavior {
    /// Fail the request as not found.
    RaiseNotFound,
    /// Return the collection in its prior order.
    #[default]
    IgnoreAndReturnUnsorted,
}

#[derive(Error, Debug)]
pub enum AutosortError<E> {
    #[error("Not found: {0}")]
    NotFound(#[source] OrderingError),

    #[error("Backend error: {0}")]
    Backend(#[source] E),
}

impl<E> AutosortError<E> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AutosortError::NotFound(_))
    }
}

/// Resolver plus request parameter names and error policy.
#[derive(Debug, Clone, Default)]
pub struct Autosort {
    resolver: OrderingResolver,
    params: QueryParamNames,
    behavior: InvalidFieldBehavior,
}

impl Autosort {
    pub fn new(
        resolver: OrderingResolver,
        params: QueryParamNames,
        behavior: InvalidFieldBehavior,
    ) -> Self {
        Self {
            resolver,
            params,
            behavior,
        }
    }

    pub fn resolver(&self) -> &OrderingResolver {
        &self.resolver
    }

    pub fn params(&self) -> &QueryParamNames {
        &self.params
    }

    pub fn behavior(&self) -> InvalidFieldBehavior {
        self.behavior
    }

    /// Ordering expression requested by the query pairs, if any.
    pub fn expression_from_pairs<I, K, V>(
        &self,
        pairs: I,
    ) -> Option<OrderingExpression>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        SortState::from_pairs(pairs, &self.params).map(|s| s.to_expression())
    }

    /// Resolve `expression` and apply the invalid-field policy.
    ///
    /// Backend errors are passed through regardless of the policy.
    pub fn apply<'a, Q: QueryHandle>(
        &self,
        collection: &'a SortableCollection<Q>,
        descriptor: &CollectionDescriptor,
        expression: Option<&OrderingExpression>,
    ) -> Result<Ordered<'a, Q>, AutosortError<Q::Error>> {
        match self.resolver.resolve(collection, descriptor, expression) {
            Ok(ordered) => Ok(ordered),
            Err(ResolveError::Backend(err)) => Err(AutosortError::Backend(err)),
            Err(ResolveError::Ordering(err)) => match self.behavior {
                InvalidFieldBehavior::RaiseNotFound => {
                    Err(AutosortError::NotFound(err))
                }
                InvalidFieldBehavior::IgnoreAndReturnUnsorted => {
                    warn!(
                        subject = err.subject(),
                        "ignoring invalid ordering: {}", err
                    );
                    Ok(Ordered::Original(collection))
                }
            },
        }
    }

    pub fn apply_from_pairs<'a, Q, I, K, V>(
        &self,
        collection: &'a SortableCollection<Q>,
        descriptor: &CollectionDescriptor,
        pairs: I,
    ) -> Result<Ordered<'a, Q>, AutosortError<Q::Error>>
    where
        Q: QueryHandle,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let expression = self.expression_from_pairs(pairs);
        self.apply(collection, descriptor, expression.as_ref())
    }
}
