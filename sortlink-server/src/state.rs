use crate::secrets::{SECRET_FIELDS, Secret, sample_secrets};
use sortlink_config::SortingConfig;
use sortlink_core::{
    Autosort, CollectionDescriptor, LinkBuilder, MapContext, MemoryQuery,
};
use std::{collections::HashMap, sync::Arc};

/// Shared, read-only services for request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub autosort: Arc<Autosort>,
    pub links: Arc<LinkBuilder>,
    pub titles: Arc<MapContext>,
    pub descriptor: Arc<CollectionDescriptor>,
    pub secrets: MemoryQuery<Secret>,
}

impl AppState {
    pub fn new(config: &SortingConfig) -> Self {
        Self::with_secrets(config, sample_secrets())
    }

    pub fn with_secrets(config: &SortingConfig, secrets: Vec<Secret>) -> Self {
        Self {
            autosort: Arc::new(config.autosort()),
            links: Arc::new(config.link_builder()),
            titles: Arc::new(default_titles()),
            descriptor: Arc::new(SECRET_FIELDS.descriptor()),
            secrets: MemoryQuery::new(secrets)
                .with_separator(config.path_separator.clone()),
        }
    }
}

fn default_titles() -> MapContext {
    MapContext {
        translations: HashMap::from([(
            "created_at".to_string(),
            "Created".to_string(),
        )]),
        variables: HashMap::from([(
            "author_label".to_string(),
            "Author".to_string(),
        )]),
    }
}
