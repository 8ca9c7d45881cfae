//! In-process query backend
//!
//! [`MemoryQuery`] stands in for a database query handle: it holds a shared
//! slice of records and a pending ordering clause that is only applied when
//! the query is fetched. Unlike the in-memory resolver path it understands
//! compound paths and walks relations through [`FieldAccess::related`].

use super::{
    collection::QueryHandle,
    expression::{DEFAULT_PATH_SEPARATOR, OrderingExpression},
    key::SortKey,
    record::{FieldAccess, lookup_path},
};
use crate::error::OrderingError;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryQueryError {
    #[error("Cannot resolve {path:?} into a field")]
    UnknownField { path: String },

    #[error(transparent)]
    Ordering(#[from] OrderingError),
}

/// Lazy query over an in-memory record set.
#[derive(Debug, Clone)]
pub struct MemoryQuery<R> {
    rows: Arc<[R]>,
    ordering: Option<OrderingExpression>,
    separator: String,
}

impl<R> MemoryQuery<R> {
    pub fn new(rows: impl Into<Arc<[R]>>) -> Self {
        Self {
            rows: rows.into(),
            ordering: None,
            separator: DEFAULT_PATH_SEPARATOR.to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Ordering clause that will be applied on fetch, if any.
    pub fn ordering(&self) -> Option<&OrderingExpression> {
        self.ordering.as_ref()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Records in storage order, ignoring any ordering clause.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }
}

impl<R> QueryHandle for MemoryQuery<R>
where
    R: FieldAccess + Clone,
{
    type Record = R;
    type Error = MemoryQueryError;

    fn exists(&self) -> Result<bool, Self::Error> {
        Ok(!self.rows.is_empty())
    }

    fn order_by(
        &self,
        ordering: &OrderingExpression,
    ) -> Result<Self, Self::Error> {
        let reference = ordering.parse()?;
        let segments = reference.segments(&self.separator);

        // Reject unknown paths up front, like a schema-aware backend would.
        if let Some(first) = self.rows.first()
            && lookup_path(first, &segments).is_none()
        {
            return Err(MemoryQueryError::UnknownField {
                path: reference.name.to_string(),
            });
        }

        Ok(Self {
            rows: Arc::clone(&self.rows),
            ordering: Some(ordering.clone()),
            separator: self.separator.clone(),
        })
    }

    fn fetch(&self) -> Result<Vec<Self::Record>, Self::Error> {
        let Some(ordering) = &self.ordering else {
            return Ok(self.rows.to_vec());
        };

        let reference = ordering.parse()?;
        let segments = reference.segments(&self.separator);

        // Rows with a missing relation sort as NULL, as a left join would.
        let mut keyed: Vec<(usize, SortKey)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                (idx, lookup_path(row, &segments).unwrap_or(SortKey::Null))
            })
            .collect();
        keyed.sort_by(|a, b| reference.order.apply(a.1.cmp(&b.1)));

        Ok(keyed
            .into_iter()
            .map(|(idx, _)| self.rows[idx].clone())
            .collect())
    }
}
