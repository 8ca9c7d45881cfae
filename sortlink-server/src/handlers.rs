use crate::{
    errors::AppResult,
    secrets::{Secret, columns},
    state::AppState,
};
use axum::{
    Json,
    extract::{OriginalUri, State},
    http::Uri,
};
use serde::Serialize;
use sortlink_core::{SortColumn, SortableCollection, Url};
use tracing::{debug, info};

/// Listing returned by `GET /` and `GET /secrets`.
#[derive(Debug, Serialize)]
pub struct SecretListing {
    pub columns: Vec<SortColumn>,
    pub rows: Vec<Secret>,
}

/// Request URL on a fixed local origin. Leading slashes collapse to one so
/// that a `//host/...` path can never become a scheme-relative link.
fn request_url(uri: &Uri) -> AppResult<Url> {
    let mut url = Url::parse("http://localhost/")?;
    url.set_path(&format!("/{}", uri.path().trim_start_matches('/')));
    url.set_query(uri.query());
    Ok(url)
}

pub async fn list_secrets(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> AppResult<Json<SecretListing>> {
    let url = request_url(&uri)?;

    let collection = SortableCollection::Query(state.secrets.clone());
    let ordered = state.autosort.apply_from_pairs(
        &collection,
        &state.descriptor,
        url.query_pairs(),
    )?;
    debug!(outcome = ordered.label(), "resolved listing order");
    let rows = ordered.into_records()?;

    let current = state.links.current_state(&url);
    let separator = &state.autosort.resolver().settings().path_separator;
    let columns = columns(separator)
        .into_iter()
        .map(|(field, title)| {
            let title = title.resolve(&field, state.titles.as_ref());
            state
                .links
                .build_column(current.as_ref(), &field, title, &url)
        })
        .collect();

    info!(
        rows = rows.len(),
        sort = current.as_ref().map(|s| s.field.as_str()),
        "serving secret listing"
    );

    Ok(Json(SecretListing { columns, rows }))
}

pub async fn health_handler() -> &'static str {
    "ok"
}
