//! Column titles

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lookups available while resolving a [`ColumnTitle`].
pub trait TitleContext {
    /// Translated text for `key`, or `None` when there is no translation.
    fn translate(&self, key: &str) -> Option<String>;

    /// Value of a rendering context variable.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Context with no translations and no variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContext;

impl TitleContext for NoContext {
    fn translate(&self, _key: &str) -> Option<String> {
        None
    }

    fn lookup(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Context backed by two maps.
#[derive(Debug, Clone, Default)]
pub struct MapContext {
    pub translations: HashMap<String, String>,
    pub variables: HashMap<String, String>,
}

impl TitleContext for MapContext {
    fn translate(&self, key: &str) -> Option<String> {
        self.translations.get(key).cloned()
    }

    fn lookup(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned()
    }
}

/// How a column header gets its text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum ColumnTitle {
    /// Literal text.
    Static(String),
    /// Translation key, falling back to the key itself.
    Translatable(String),
    /// Name of a context variable; empty when the variable is missing.
    ContextVar(String),
    /// The field name, capitalized.
    #[default]
    Default,
}

impl ColumnTitle {
    pub fn resolve(&self, field: &str, context: &dyn TitleContext) -> String {
        match self {
            ColumnTitle::Static(text) => text.clone(),
            ColumnTitle::Translatable(key) => {
                context.translate(key).unwrap_or_else(|| key.clone())
            }
            ColumnTitle::ContextVar(name) => {
                context.lookup(name).unwrap_or_default()
            }
            ColumnTitle::Default => capitalize(field),
        }
    }
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
