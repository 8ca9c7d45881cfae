use std::collections::BTreeSet;

/// Field names the backend can order a collection by natively.
///
/// Used only for membership tests; it says nothing about field types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionDescriptor {
    fields: BTreeSet<String>,
}

impl CollectionDescriptor {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn insert(&mut self, field: impl Into<String>) -> bool {
        self.fields.insert(field.into())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CollectionDescriptor {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
