//! Image passthrough endpoint.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use reqwest::Url;
use serde::Deserialize;

use super::ApiResult;
use crate::errors::AppError;
use crate::AppState;

/// Image query parameters.
#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
}

/// GET /image - Fetch a remote image and relay its bytes.
pub async fn get_image(
    State(state): State<AppState>,
    query: Result<Query<ImageQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = query?;
    let url = parse_image_url(params.url.as_deref())?;

    let image = state.upstream.fetch_image(url).await?;

    Ok((image.status, [(CONTENT_TYPE, image.content_type)], image.body).into_response())
}

/// Validate the `url` parameter before anything is fetched.
fn parse_image_url(raw: Option<&str>) -> ApiResult<Url> {
    let raw = raw
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| AppError::BadRequest("Please provide a url".to_string()))?;

    let url = Url::parse(raw).map_err(|e| AppError::BadRequest(format!("Invalid url: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(AppError::BadRequest(format!(
            "Unsupported url scheme: {}",
            scheme
        ))),
    }
}
