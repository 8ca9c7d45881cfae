//! Named-field access for records
//!
//! Records expose their sortable members through [`FieldAccess`] rather than
//! runtime reflection. Typed structs usually back the trait with a
//! [`FieldTable`] built once at startup; loosely typed rows can use the
//! `BTreeMap<String, SortKey>` implementation directly.

use super::{descriptor::CollectionDescriptor, key::SortKey};
use std::{collections::BTreeMap, fmt, sync::Arc};

/// Capability of a record to answer "do you have this named member, and what
/// is its value".
pub trait FieldAccess {
    /// Value of the named field, or `None` when the record has no such member.
    fn field(&self, name: &str) -> Option<SortKey>;

    /// Related record reachable through the named relation.
    ///
    /// Only backends traverse relations; the in-memory sort never does.
    fn related(&self, _name: &str) -> Option<&dyn FieldAccess> {
        None
    }

    fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

impl<T: FieldAccess + ?Sized> FieldAccess for &T {
    fn field(&self, name: &str) -> Option<SortKey> {
        (**self).field(name)
    }

    fn related(&self, name: &str) -> Option<&dyn FieldAccess> {
        (**self).related(name)
    }
}

impl<T: FieldAccess + ?Sized> FieldAccess for Arc<T> {
    fn field(&self, name: &str) -> Option<SortKey> {
        (**self).field(name)
    }

    fn related(&self, name: &str) -> Option<&dyn FieldAccess> {
        (**self).related(name)
    }
}

impl FieldAccess for BTreeMap<String, SortKey> {
    fn field(&self, name: &str) -> Option<SortKey> {
        self.get(name).cloned()
    }
}

/// Resolve a field path (`["author", "name"]`) by walking relations.
pub fn lookup_path(
    record: &dyn FieldAccess,
    segments: &[&str],
) -> Option<SortKey> {
    match segments {
        [] => None,
        [name] => record.field(name),
        [relation, rest @ ..] => lookup_path(record.related(relation)?, rest),
    }
}

/// Accessor that reads one field of `T`.
pub type FieldAccessor<T> = fn(&T) -> SortKey;

/// Accessor that reaches a related record of `T`.
pub type RelationAccessor<T> = fn(&T) -> &dyn FieldAccess;

/// Where a field's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Stored by the backend and orderable natively.
    Native,
    /// Derived in code; only sortable in memory.
    Computed,
}

struct FieldEntry<T> {
    kind: FieldKind,
    accessor: FieldAccessor<T>,
}

/// Explicit accessor table for a record type.
///
/// ```
/// use sortlink_core::{FieldKind, FieldTable, SortKey};
///
/// struct User {
///     name: String,
/// }
///
/// let table = FieldTable::<User>::builder()
///     .native("name", |u| SortKey::from(u.name.as_str()))
///     .computed("name_length", |u| SortKey::from(u.name.len()))
///     .build();
///
/// let user = User { name: "ada".into() };
/// assert_eq!(table.get(&user, "name_length"), Some(SortKey::Int(3)));
/// assert_eq!(table.kind("name"), Some(FieldKind::Native));
/// assert!(table.descriptor().contains("name"));
/// assert!(!table.descriptor().contains("name_length"));
/// ```
pub struct FieldTable<T> {
    fields: BTreeMap<&'static str, FieldEntry<T>>,
    relations: BTreeMap<&'static str, RelationAccessor<T>>,
}

impl<T> fmt::Debug for FieldTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTable")
            .field("type", &std::any::type_name::<T>())
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("relations", &self.relations.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> FieldTable<T> {
    pub fn builder() -> FieldTableBuilder<T> {
        FieldTableBuilder {
            table: FieldTable {
                fields: BTreeMap::new(),
                relations: BTreeMap::new(),
            },
        }
    }

    /// Read a field from `record`, `None` if the table has no such field.
    pub fn get(&self, record: &T, name: &str) -> Option<SortKey> {
        self.fields.get(name).map(|entry| (entry.accessor)(record))
    }

    pub fn related<'a>(
        &self,
        record: &'a T,
        name: &str,
    ) -> Option<&'a dyn FieldAccess> {
        self.relations.get(name).map(|accessor| accessor(record))
    }

    pub fn kind(&self, name: &str) -> Option<FieldKind> {
        self.fields.get(name).map(|entry| entry.kind)
    }

    /// All field names, native and computed.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    /// Couple `record` with this table so it can be passed as [`FieldAccess`].
    pub fn view<'a>(&'a self, record: &'a T) -> Fielded<'a, T> {
        Fielded {
            table: self,
            record,
        }
    }

    /// Descriptor listing the natively orderable fields of this table.
    pub fn descriptor(&self) -> CollectionDescriptor {
        self.fields
            .iter()
            .filter(|(_, entry)| entry.kind == FieldKind::Native)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// A record paired with its accessor table.
pub struct Fielded<'a, T> {
    table: &'a FieldTable<T>,
    record: &'a T,
}

impl<T> Clone for Fielded<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Fielded<'_, T> {}

impl<'a, T> Fielded<'a, T> {
    pub fn record(&self) -> &'a T {
        self.record
    }
}

impl<T> FieldAccess for Fielded<'_, T> {
    fn field(&self, name: &str) -> Option<SortKey> {
        self.table.get(self.record, name)
    }

    fn related(&self, name: &str) -> Option<&dyn FieldAccess> {
        self.table.related(self.record, name)
    }
}

/// Builder for [`FieldTable`]
pub struct FieldTableBuilder<T> {
    table: FieldTable<T>,
}

impl<T> fmt::Debug for FieldTableBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTableBuilder")
            .field("pending", &self.table)
            .finish()
    }
}

impl<T> FieldTableBuilder<T> {
    /// Register a field the backend can order by.
    pub fn native(
        mut self,
        name: &'static str,
        accessor: FieldAccessor<T>,
    ) -> Self {
        self.table.fields.insert(
            name,
            FieldEntry {
                kind: FieldKind::Native,
                accessor,
            },
        );
        self
    }

    /// Register a derived field, sortable in memory only.
    pub fn computed(
        mut self,
        name: &'static str,
        accessor: FieldAccessor<T>,
    ) -> Self {
        self.table.fields.insert(
            name,
            FieldEntry {
                kind: FieldKind::Computed,
                accessor,
            },
        );
        self
    }

    pub fn relation(
        mut self,
        name: &'static str,
        accessor: RelationAccessor<T>,
    ) -> Self {
        self.table.relations.insert(name, accessor);
        self
    }

    pub fn build(self) -> FieldTable<T> {
        self.table
    }
}
