use thiserror::Error;

/// Classified failure of an ordering request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderingError {
    #[error("Invalid ordering expression: {expression:?}")]
    InvalidExpression { expression: String },

    #[error("Records have no attribute to sort by: {field}")]
    AttributeNotFound { field: String },
}

impl OrderingError {
    /// The field or expression the request named.
    pub fn subject(&self) -> &str {
        match self {
            OrderingError::InvalidExpression { expression } => expression,
            OrderingError::AttributeNotFound { field } => field,
        }
    }
}

/// Error from [`OrderingResolver::resolve`](crate::OrderingResolver::resolve).
///
/// Backend errors are passed through untouched; validating relation paths is
/// the backend's job.
#[derive(Error, Debug)]
pub enum ResolveError<E> {
    #[error(transparent)]
    Ordering(#[from] OrderingError),

    #[error("Backend error: {0}")]
    Backend(#[source] E),
}

pub type Result<T> = std::result::Result<T, OrderingError>;
