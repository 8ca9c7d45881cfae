//! Sort-by-column links
//!
//! For each sortable column the builder works out the sort state a click
//! should request and rewrites the current URL accordingly. Clicking the
//! active column flips its direction; clicking any other column sorts it
//! ascending.

use super::state::{QueryParamNames, SortState};
use crate::ordering::SortOrder;
use serde::{Deserialize, Serialize};
use tracing::trace;
use url::Url;

/// Glyphs shown next to the active column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionIndicators {
    pub ascending: String,
    pub descending: String,
}

impl Default for DirectionIndicators {
    fn default() -> Self {
        Self {
            ascending: "↑".to_string(),
            descending: "↓".to_string(),
        }
    }
}

impl DirectionIndicators {
    pub fn glyph(&self, order: SortOrder) -> &str {
        match order {
            SortOrder::Ascending => &self.ascending,
            SortOrder::Descending => &self.descending,
        }
    }
}

/// Settings for [`LinkBuilder`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSettings {
    pub params: QueryParamNames,
    pub indicators: DirectionIndicators,
}

/// Link for one sortable column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDescriptor {
    /// Current URL with the sort parameters replaced.
    pub url: Url,
    pub field: String,
    /// Direction the link requests.
    pub order: SortOrder,
    /// Glyph of the current direction, set only on the active column.
    pub indicator: Option<String>,
    pub active: bool,
}

impl LinkDescriptor {
    /// Sort state the link requests.
    pub fn target(&self) -> SortState {
        SortState::new(self.field.clone(), self.order)
    }

    /// Path-relative link (`/path?query`), suitable for an `href`.
    pub fn href(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }
}

/// Column header ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortColumn {
    pub field: String,
    pub title: String,
    pub href: String,
    pub indicator: Option<String>,
    pub active: bool,
}

/// Builds sort links from the current sort state.
#[derive(Debug, Clone, Default)]
pub struct LinkBuilder {
    settings: LinkSettings,
}

impl LinkBuilder {
    pub fn new(settings: LinkSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &LinkSettings {
        &self.settings
    }

    pub fn params(&self) -> &QueryParamNames {
        &self.settings.params
    }

    /// Read the current sort state from `url`.
    pub fn current_state(&self, url: &Url) -> Option<SortState> {
        SortState::from_url(url, &self.settings.params)
    }

    pub fn build_link(
        &self,
        current: Option<&SortState>,
        candidate: &str,
        base_url: &Url,
    ) -> LinkDescriptor {
        let (order, indicator) = match current {
            Some(state) if state.field == candidate => (
                state.order.toggle(),
                Some(self.settings.indicators.glyph(state.order).to_string()),
            ),
            _ => (SortOrder::Ascending, None),
        };

        let url = self.rewrite_url(base_url, candidate, order);
        trace!(field = candidate, %order, url = %url, "built sort link");

        LinkDescriptor {
            url,
            field: candidate.to_string(),
            order,
            active: indicator.is_some(),
            indicator,
        }
    }

    /// Build the link and bundle it with an already resolved title.
    pub fn build_column(
        &self,
        current: Option<&SortState>,
        candidate: &str,
        title: impl Into<String>,
        base_url: &Url,
    ) -> SortColumn {
        let link = self.build_link(current, candidate, base_url);
        SortColumn {
            href: link.href(),
            field: link.field,
            title: title.into(),
            indicator: link.indicator,
            active: link.active,
        }
    }

    /// Replace the sort parameters in place, keep every other parameter
    /// where it was, and append the sort parameters when absent.
    fn rewrite_url(&self, base: &Url, field: &str, order: SortOrder) -> Url {
        let params = &self.settings.params;
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut wrote_sort = false;
        let mut wrote_dir = false;

        for (key, value) in base.query_pairs() {
            if key == params.sort.as_str() {
                if !wrote_sort {
                    pairs.push((params.sort.clone(), field.to_string()));
                    wrote_sort = true;
                }
            } else if key == params.dir.as_str() {
                if !wrote_dir {
                    pairs.push((params.dir.clone(), order.as_param().into()));
                    wrote_dir = true;
                }
            } else {
                pairs.push((key.into_owned(), value.into_owned()));
            }
        }

        if !wrote_sort {
            pairs.push((params.sort.clone(), field.to_string()));
        }
        if !wrote_dir {
            pairs.push((params.dir.clone(), order.as_param().to_string()));
        }

        let mut url = base.clone();
        url.query_pairs_mut().clear().extend_pairs(pairs);
        url
    }
}
