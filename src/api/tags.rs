//! Tag API endpoints.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::{non_empty, ApiResult};
use crate::auth::Credentials;
use crate::normalizer::normalize_tag_payload;
use crate::upstream::{TagSearch, DEFAULT_TAG_ORDER};
use crate::AppState;

/// Tag lookup query parameters.
#[derive(Debug, Deserialize)]
pub struct TagQuery {
    /// Exact tag name.
    pub name: Option<String>,
    /// SQL-style pattern, e.g. `pony%`.
    pub name_pattern: Option<String>,
    /// Sort field (default: count).
    pub orderby: Option<String>,
}

impl From<TagQuery> for TagSearch {
    fn from(query: TagQuery) -> Self {
        Self {
            name: non_empty(query.name),
            name_pattern: non_empty(query.name_pattern),
            orderby: non_empty(query.orderby).unwrap_or_else(|| DEFAULT_TAG_ORDER.to_string()),
        }
    }
}

/// GET /tag - Look up tags.
pub async fn list_tags(
    State(state): State<AppState>,
    Extension(credentials): Extension<Credentials>,
    query: Result<Query<TagQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = query?;
    let payload = state
        .upstream
        .list_tags(&credentials, &params.into())
        .await?;

    Ok(Json(normalize_tag_payload(payload)))
}
