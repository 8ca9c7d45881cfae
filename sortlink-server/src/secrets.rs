//! Sample records served by the demo listing

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sortlink_core::{ColumnTitle, FieldAccess, FieldTable, SortKey};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

impl FieldAccess for Author {
    fn field(&self, name: &str) -> Option<SortKey> {
        match name {
            "name" => Some(SortKey::from(self.name.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub id: u32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub author: Author,
}

impl Secret {
    /// Lower-cased first word of the name. Not stored, so only sortable in
    /// memory.
    pub fn nickname(&self) -> String {
        self.name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

fn secret_author(secret: &Secret) -> &dyn FieldAccess {
    &secret.author
}

pub static SECRET_FIELDS: Lazy<FieldTable<Secret>> = Lazy::new(|| {
    FieldTable::<Secret>::builder()
        .native("id", |s| SortKey::from(s.id))
        .native("name", |s| SortKey::from(s.name.as_str()))
        .native("created_at", |s| SortKey::from(s.created_at))
        .computed("nickname", |s| SortKey::from(s.nickname()))
        .relation("author", secret_author)
        .build()
});

impl FieldAccess for Secret {
    fn field(&self, name: &str) -> Option<SortKey> {
        SECRET_FIELDS.get(self, name)
    }

    fn related(&self, name: &str) -> Option<&dyn FieldAccess> {
        SECRET_FIELDS.related(self, name)
    }
}

/// Sortable columns of the listing, in display order. `separator` joins the
/// relation path of the author column.
pub fn columns(separator: &str) -> Vec<(String, ColumnTitle)> {
    vec![
        ("id".to_string(), ColumnTitle::Static("ID".to_string())),
        ("name".to_string(), ColumnTitle::Default),
        ("nickname".to_string(), ColumnTitle::Default),
        (
            "created_at".to_string(),
            ColumnTitle::Translatable("created_at".to_string()),
        ),
        (
            format!("author{separator}name"),
            ColumnTitle::ContextVar("author_label".to_string()),
        ),
    ]
}

fn at(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp, 0).unwrap_or_default()
}

fn secret(id: u32, name: &str, created_at: i64, author: &str) -> Secret {
    Secret {
        id,
        name: name.to_string(),
        created_at: at(created_at),
        author: Author {
            name: author.to_string(),
        },
    }
}

/// Fixed data set, in storage order.
pub fn sample_secrets() -> Vec<Secret> {
    vec![
        secret(1, "Lunar Vault", 1_700_000_000, "mira"),
        secret(2, "Amber Key", 1_690_000_000, "theo"),
        secret(3, "Quiet Harbor", 1_710_000_000, "ada"),
        secret(4, "Echo Ledger", 1_680_000_000, "theo"),
        secret(5, "Paper Lantern", 1_705_000_000, "jun"),
    ]
}
