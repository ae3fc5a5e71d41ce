//! reqwest-backed client for Gelbooru's DAPI.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{ImageResponse, PostSearch, TagSearch, Upstream, DEFAULT_IMAGE_CONTENT_TYPE, TAG_LIMIT};
use crate::auth::Credentials;
use crate::config::Config;
use crate::errors::AppError;

/// Query string for `index.php?page=dapi&q=index`.
///
/// Unset filters are left out of the query entirely.
#[derive(Debug, Serialize)]
struct DapiQuery<'a> {
    page: &'static str,
    q: &'static str,
    s: &'static str,
    json: u8,
    api_key: &'a str,
    user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name_pattern: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    orderby: Option<&'a str>,
}

impl<'a> DapiQuery<'a> {
    fn new(resource: &'static str, credentials: &'a Credentials) -> Self {
        Self {
            page: "dapi",
            q: "index",
            s: resource,
            json: 1,
            api_key: &credentials.api_key,
            user_id: &credentials.user_id,
            limit: None,
            pid: None,
            tags: None,
            id: None,
            name: None,
            name_pattern: None,
            orderby: None,
        }
    }
}

/// Client bound to a single DAPI base URL.
#[derive(Debug, Clone)]
pub struct GelbooruClient {
    client: Client,
    base_url: Url,
}

impl GelbooruClient {
    pub fn new(base_url: Url, timeout: Duration, user_agent: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let base_url = Url::parse(&config.upstream_url)
            .map_err(|e| AppError::Config(format!("Invalid upstream URL: {}", e)))?;

        Self::new(base_url, config.upstream_timeout, &config.user_agent)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn dapi(&self, query: &DapiQuery<'_>) -> Result<Value, AppError> {
        debug!(resource = query.s, "Querying upstream");

        let payload = self
            .client
            .get(self.base_url.clone())
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(payload)
    }
}

#[async_trait]
impl Upstream for GelbooruClient {
    #[instrument(skip(self, credentials))]
    async fn list_posts(
        &self,
        credentials: &Credentials,
        search: &PostSearch,
    ) -> Result<Value, AppError> {
        let mut query = DapiQuery::new("post", credentials);
        query.limit = Some(search.limit);
        query.pid = search.pid;
        query.tags = search.tags.as_deref();

        self.dapi(&query).await
    }

    #[instrument(skip(self, credentials))]
    async fn get_post(&self, credentials: &Credentials, id: u64) -> Result<Value, AppError> {
        let mut query = DapiQuery::new("post", credentials);
        query.id = Some(id);

        self.dapi(&query).await
    }

    #[instrument(skip(self, credentials))]
    async fn list_tags(
        &self,
        credentials: &Credentials,
        search: &TagSearch,
    ) -> Result<Value, AppError> {
        let mut query = DapiQuery::new("tag", credentials);
        query.limit = Some(TAG_LIMIT);
        query.name = search.name.as_deref();
        query.name_pattern = search.name_pattern.as_deref();
        query.orderby = Some(search.orderby.as_str());

        self.dapi(&query).await
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn fetch_image(&self, url: Url) -> Result<ImageResponse, AppError> {
        let response = self.client.get(url).send().await?.error_for_status()?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_IMAGE_CONTENT_TYPE)
            .to_string();
        let body = response.bytes().await?;

        debug!(%status, %content_type, len = body.len(), "Fetched image");

        Ok(ImageResponse {
            status,
            content_type,
            body,
        })
    }
}
