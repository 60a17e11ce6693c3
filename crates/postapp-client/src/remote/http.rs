use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use postapp_shared::{PostId, PostRecord};

use super::RemoteDataService;
use crate::error::ServiceError;

/// Remote data service backed by the `postapp-server` REST API.
#[derive(Debug, Clone)]
pub struct HttpDataService {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpDataService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("postapp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-success status into a [`ServiceError::Status`], using the
/// server's `{"error": ...}` body as the message when present.
async fn ensure_success(resp: Response) -> Result<Response, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });

    Err(ServiceError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RemoteDataService for HttpDataService {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, ServiceError> {
        let resp = self.client.get(self.url("/posts")).send().await?;
        let posts: Vec<PostRecord> = ensure_success(resp).await?.json().await?;
        debug!(count = posts.len(), "fetched posts");
        Ok(posts)
    }

    async fn get_post(&self, id: PostId) -> Result<Option<PostRecord>, ServiceError> {
        let resp = self
            .client
            .get(self.url(&format!("/posts/{id}")))
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let post = ensure_success(resp).await?.json().await?;
        Ok(Some(post))
    }

    async fn insert_post(&self, post: &PostRecord) -> Result<(), ServiceError> {
        let resp = self
            .client
            .post(self.url("/posts"))
            .json(post)
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }

    async fn update_post(&self, post: &PostRecord) -> Result<(), ServiceError> {
        let resp = self
            .client
            .put(self.url(&format!("/posts/{}", post.id)))
            .json(post)
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }

    async fn delete_post(&self, id: PostId) -> Result<(), ServiceError> {
        let resp = self
            .client
            .delete(self.url(&format!("/posts/{id}")))
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }
}
