//! Outbound client for the image-board API.
//!
//! Handlers only see the [`Upstream`] trait, so the router can be built
//! against any implementation.

mod gelbooru;

pub use gelbooru::GelbooruClient;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::Value;

use crate::auth::Credentials;
use crate::errors::AppError;

/// Content type assumed when an image response omits one.
pub const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Default page size for post listings.
pub const DEFAULT_POST_LIMIT: u32 = 25;

/// Fixed page size for tag listings.
pub const TAG_LIMIT: u32 = 10;

/// Default ordering for tag listings.
pub const DEFAULT_TAG_ORDER: &str = "count";

/// Filters for a paginated post search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostSearch {
    pub limit: u32,
    pub pid: Option<u32>,
    pub tags: Option<String>,
}

/// Filters for a tag lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSearch {
    pub name: Option<String>,
    pub name_pattern: Option<String>,
    pub orderby: String,
}

/// A fetched binary resource.
#[derive(Debug, Clone)]
pub struct ImageResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Bytes,
}

/// The external image-board data service.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetch one page of posts matching `search`.
    async fn list_posts(&self, credentials: &Credentials, search: &PostSearch)
        -> Result<Value, AppError>;

    /// Fetch a single post by id.
    async fn get_post(&self, credentials: &Credentials, id: u64) -> Result<Value, AppError>;

    /// Fetch tags matching `search`.
    async fn list_tags(&self, credentials: &Credentials, search: &TagSearch)
        -> Result<Value, AppError>;

    /// Fetch an arbitrary URL as binary.
    async fn fetch_image(&self, url: reqwest::Url) -> Result<ImageResponse, AppError>;
}
