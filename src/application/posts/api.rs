//! Remote operations the admin desk needs from the posts API.

use async_trait::async_trait;
use newsdesk_api_types::{Post, PostForm};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    Rejected(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("response carried no data")]
    MissingData,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}

#[async_trait]
pub trait PostsApi: Send + Sync {
    /// `GET /api/blog?limit={limit}&status=all`
    async fn list_posts(&self, limit: u32) -> Result<Vec<Post>, ApiError>;

    /// `GET /api/blog/{id}`
    async fn fetch_post(&self, id: &str) -> Result<Post, ApiError>;

    /// `DELETE /api/blog/{id}`
    async fn delete_post(&self, id: &str) -> Result<(), ApiError>;

    /// `POST /api/blog`
    async fn create_post(&self, form: &PostForm) -> Result<Option<Post>, ApiError>;

    /// `PUT /api/blog/{id}`
    async fn update_post(&self, id: &str, form: &PostForm) -> Result<Option<Post>, ApiError>;
}
