//! Ordering expressions
//!
//! An ordering expression is a field reference with an optional leading `-`
//! for descending order: `name`, `-created_at`, `author.name`. Compound
//! references traverse relations using a path separator (`.` by default).

use super::order::SortOrder;
use crate::error::OrderingError;
use std::fmt;

/// Leading character that marks a descending ordering.
pub const DESCENDING_MARKER: char = '-';

/// Separator between relation segments of a compound field reference.
pub const DEFAULT_PATH_SEPARATOR: &str = ".";

/// Raw ordering expression as requested by the client.
///
/// Construction never fails; malformed expressions are reported by
/// [`OrderingExpression::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct OrderingExpression {
    raw: String,
}

/// Parsed view of a non-empty [`OrderingExpression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldReference<'a> {
    /// The field reference with the descending marker stripped.
    pub name: &'a str,
    pub order: SortOrder,
}

impl OrderingExpression {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Build the expression for a field and direction (`-field` when
    /// descending).
    pub fn for_field(field: &str, order: SortOrder) -> Self {
        let raw = match order {
            SortOrder::Ascending => field.to_string(),
            SortOrder::Descending => format!("{DESCENDING_MARKER}{field}"),
        };
        Self { raw }
    }

    /// The full expression, marker included.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// An empty expression means "no sort requested".
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn is_descending(&self) -> bool {
        self.raw.starts_with(DESCENDING_MARKER)
    }

    /// Split into field reference and direction.
    ///
    /// Fails with [`OrderingError::InvalidExpression`] when there is no field
    /// reference, i.e. the expression is empty or only the marker.
    pub fn parse(&self) -> Result<FieldReference<'_>, OrderingError> {
        let (name, order) = match self.raw.strip_prefix(DESCENDING_MARKER) {
            Some(rest) => (rest, SortOrder::Descending),
            None => (self.raw.as_str(), SortOrder::Ascending),
        };

        if name.is_empty() {
            return Err(OrderingError::InvalidExpression {
                expression: self.raw.clone(),
            });
        }

        Ok(FieldReference { name, order })
    }
}

impl<'a> FieldReference<'a> {
    /// Whether the reference traverses a relation.
    pub fn is_compound(&self, separator: &str) -> bool {
        !separator.is_empty() && self.name.contains(separator)
    }

    /// Path segments of the reference (a single segment when simple).
    pub fn segments(&self, separator: &'a str) -> Vec<&'a str> {
        if separator.is_empty() {
            return vec![self.name];
        }
        self.name.split(separator).collect()
    }
}

impl fmt::Display for OrderingExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for OrderingExpression {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl From<&str> for OrderingExpression {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for OrderingExpression {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}
