//! Current sort state, as read from request parameters

use crate::ordering::{OrderingExpression, SortOrder};
use serde::{Deserialize, Serialize};
use url::Url;

/// Names of the request parameters carrying the sort state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParamNames {
    pub sort: String,
    pub dir: String,
}

impl Default for QueryParamNames {
    fn default() -> Self {
        Self {
            sort: "sort".to_string(),
            dir: "dir".to_string(),
        }
    }
}

impl QueryParamNames {
    pub fn is_sort_param(&self, key: &str) -> bool {
        key == self.sort || key == self.dir
    }
}

/// Field and direction the listing is currently sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    pub field: String,
    pub order: SortOrder,
}

impl SortState {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    /// Read the state from decoded query pairs.
    ///
    /// Both parameters are required; an empty `sort` or an unrecognized
    /// `dir` means no sort was requested. Repeated parameters: last wins.
    pub fn from_pairs<I, K, V>(pairs: I, params: &QueryParamNames) -> Option<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut field = None;
        let mut dir = None;

        for (key, value) in pairs {
            let key = key.as_ref();
            if key == params.sort {
                field = Some(value.as_ref().trim().to_string());
            } else if key == params.dir {
                dir = Some(value.as_ref().to_string());
            }
        }

        let field = field.filter(|f| !f.is_empty())?;
        let order = SortOrder::from_param(&dir?)?;
        Some(Self { field, order })
    }

    pub fn from_url(url: &Url, params: &QueryParamNames) -> Option<Self> {
        Self::from_pairs(url.query_pairs(), params)
    }

    /// Ordering expression handed to the resolver.
    pub fn to_expression(&self) -> OrderingExpression {
        OrderingExpression::for_field(&self.field, self.order)
    }

    /// Same field, opposite direction.
    pub fn toggled(&self) -> Self {
        Self {
            field: self.field.clone(),
            order: self.order.toggle(),
        }
    }
}
