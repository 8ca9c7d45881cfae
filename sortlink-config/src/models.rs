use serde::{Deserialize, Serialize};
use sortlink_core::{
    Autosort, DirectionIndicators, InvalidFieldBehavior, LinkBuilder,
    LinkSettings, OrderingResolver, QueryParamNames, ResolverSettings,
    ordering::DEFAULT_PATH_SEPARATOR,
};
use std::path::PathBuf;

/// Source that produced the sorting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Glyphs rendered next to the active column header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ascending: String,
    pub descending: String,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        let defaults = DirectionIndicators::default();
        Self {
            ascending: defaults.ascending,
            descending: defaults.descending,
        }
    }
}

/// Sorting settings. Every key is optional; missing keys take their default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SortingConfig {
    /// Policy when the requested field cannot be sorted on: answer 404
    /// (`raise-not-found`) or keep the prior order
    /// (`ignore-and-return-unsorted`).
    pub invalid_field_behavior: InvalidFieldBehavior,
    /// Query parameter carrying the field to sort by.
    pub sort_param: String,
    /// Query parameter carrying the direction (`asc`/`desc`).
    pub dir_param: String,
    /// Separator between relation segments in a field path. Set to `__` for
    /// Django-style lookups.
    pub path_separator: String,
    pub indicators: IndicatorConfig,
}

impl Default for SortingConfig {
    fn default() -> Self {
        let params = QueryParamNames::default();
        Self {
            invalid_field_behavior: InvalidFieldBehavior::default(),
            sort_param: params.sort,
            dir_param: params.dir,
            path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
            indicators: IndicatorConfig::default(),
        }
    }
}

impl SortingConfig {
    pub fn query_params(&self) -> QueryParamNames {
        QueryParamNames {
            sort: self.sort_param.clone(),
            dir: self.dir_param.clone(),
        }
    }

    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            path_separator: self.path_separator.clone(),
        }
    }

    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings {
            params: self.query_params(),
            indicators: DirectionIndicators {
                ascending: self.indicators.ascending.clone(),
                descending: self.indicators.descending.clone(),
            },
        }
    }

    pub fn link_builder(&self) -> LinkBuilder {
        LinkBuilder::new(self.link_settings())
    }

    pub fn autosort(&self) -> Autosort {
        Autosort::new(
            OrderingResolver::new(self.resolver_settings()),
            self.query_params(),
            self.invalid_field_behavior,
        )
    }
}

impl From<&SortingConfig> for ResolverSettings {
    fn from(config: &SortingConfig) -> Self {
        config.resolver_settings()
    }
}

impl From<&SortingConfig> for LinkSettings {
    fn from(config: &SortingConfig) -> Self {
        config.link_settings()
    }
}
