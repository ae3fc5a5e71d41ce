//! Post API endpoints.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::{non_empty, parse_param, ApiResult};
use crate::auth::Credentials;
use crate::errors::AppError;
use crate::normalizer::normalize_post_payload;
use crate::upstream::{PostSearch, DEFAULT_POST_LIMIT};
use crate::AppState;

/// Post search query parameters.
///
/// Values arrive as raw strings so that empty ones (`?pid=`) can be treated
/// as absent instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct PostQuery {
    /// Page size (default: 25).
    pub limit: Option<String>,
    /// Page index.
    pub pid: Option<String>,
    /// Space-separated tag filter.
    pub tags: Option<String>,
}

impl TryFrom<PostQuery> for PostSearch {
    type Error = AppError;

    fn try_from(query: PostQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            limit: parse_param("limit", query.limit)?.unwrap_or(DEFAULT_POST_LIMIT),
            pid: parse_param("pid", query.pid)?,
            tags: non_empty(query.tags),
        })
    }
}

/// GET /post - Search posts.
pub async fn list_posts(
    State(state): State<AppState>,
    Extension(credentials): Extension<Credentials>,
    query: Result<Query<PostQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = query?;
    let search = PostSearch::try_from(params)?;

    let payload = state.upstream.list_posts(&credentials, &search).await?;

    normalized_or_not_found(payload)
}

/// GET /post/{id} - Get a single post.
pub async fn get_post(
    State(state): State<AppState>,
    Extension(credentials): Extension<Credentials>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(raw_id) = path?;
    let id = parse_param::<u64>("id", Some(raw_id))?
        .ok_or_else(|| AppError::BadRequest("Missing post id".to_string()))?;

    let payload = state.upstream.get_post(&credentials, id).await?;

    normalized_or_not_found(payload)
}

fn normalized_or_not_found(payload: Value) -> ApiResult<Json<Value>> {
    normalize_post_payload(payload)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Not Found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, pid: Option<&str>, tags: Option<&str>) -> PostQuery {
        PostQuery {
            limit: limit.map(str::to_string),
            pid: pid.map(str::to_string),
            tags: tags.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_values_are_absent() {
        let search = PostSearch::try_from(query(Some(""), Some(""), Some(""))).unwrap();
        assert_eq!(
            search,
            PostSearch {
                limit: DEFAULT_POST_LIMIT,
                pid: None,
                tags: None,
            }
        );
    }

    #[test]
    fn test_values_are_parsed() {
        let search = PostSearch::try_from(query(Some("5"), Some(" 3 "), Some("1girl"))).unwrap();
        assert_eq!(search.limit, 5);
        assert_eq!(search.pid, Some(3));
        assert_eq!(search.tags.as_deref(), Some("1girl"));
    }

    #[test]
    fn test_garbage_values_are_bad_requests() {
        assert!(matches!(
            PostSearch::try_from(query(None, Some("abc"), None)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            PostSearch::try_from(query(Some("-1"), None, None)),
            Err(AppError::BadRequest(_))
        ));
    }
}
