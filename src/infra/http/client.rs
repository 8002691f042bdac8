use std::time::Duration;

use async_trait::async_trait;
use newsdesk_api_types::{ALL_STATUSES, ApiEnvelope, Post, PostForm};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::application::posts::{ApiError, PostsApi};
use crate::config::ApiSettings;

const POSTS_COLLECTION: [&str; 2] = ["api", "blog"];

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("base URL `{0}` cannot carry a path")]
    CannotBeABase(String),
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP adapter for the posts REST API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ClientError> {
        if base.cannot_be_a_base() {
            return Err(ClientError::CannotBeABase(base.to_string()));
        }
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base })
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ClientError> {
        Self::new(settings.base_url.clone(), settings.timeout)
    }

    pub fn user_agent() -> &'static str {
        concat!("newsdesk/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `{base}/api/blog[/{id}]`, with the id percent-encoded as a single segment.
    fn posts_url(&self, id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ApiError::InvalidRequest(format!("base URL `{}` cannot carry a path", self.base))
            })?;
            segments.pop_if_empty().extend(POSTS_COLLECTION);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<Option<T>, ApiError> {
        let resp = req.send().await.map_err(ApiError::transport)?;
        Self::handle(resp).await
    }

    async fn handle<T: DeserializeOwned>(resp: Response) -> Result<Option<T>, ApiError> {
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(ApiError::transport)?;
        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(&bytes)
            {
                if let Some(message) = envelope.error {
                    return Err(ApiError::Rejected(message));
                }
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let envelope: ApiEnvelope<T> =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))?;
        envelope.into_result().map_err(ApiError::Rejected)
    }
}

#[async_trait]
impl PostsApi for ApiClient {
    #[instrument(skip(self))]
    async fn list_posts(&self, limit: u32) -> Result<Vec<Post>, ApiError> {
        let mut url = self.posts_url(None)?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("status", ALL_STATUSES);
        debug!(%url, "listing posts");
        let posts: Option<Vec<Post>> = Self::send(self.request(Method::GET, url)).await?;
        Ok(posts.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn fetch_post(&self, id: &str) -> Result<Post, ApiError> {
        let url = self.posts_url(Some(id))?;
        Self::send(self.request(Method::GET, url))
            .await?
            .ok_or(ApiError::MissingData)
    }

    #[instrument(skip(self))]
    async fn delete_post(&self, id: &str) -> Result<(), ApiError> {
        let url = self.posts_url(Some(id))?;
        Self::send::<serde_json::Value>(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    #[instrument(skip(self, form), fields(title = %form.title))]
    async fn create_post(&self, form: &PostForm) -> Result<Option<Post>, ApiError> {
        let url = self.posts_url(None)?;
        Self::send(self.request(Method::POST, url).json(form)).await
    }

    #[instrument(skip(self, form), fields(title = %form.title))]
    async fn update_post(&self, id: &str, form: &PostForm) -> Result<Option<Post>, ApiError> {
        let url = self.posts_url(Some(id))?;
        Self::send(self.request(Method::PUT, url).json(form)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;

    fn client(server: &MockServer) -> ApiClient {
        let base = Url::parse(&server.base_url()).expect("base url");
        ApiClient::new(base, Duration::from_secs(5)).expect("client")
    }

    #[tokio::test]
    async fn list_requests_all_statuses_with_limit() -> Result<(), ApiError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/api/blog")
                .query_param("limit", "100")
                .query_param("status", "all");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"success":true,"data":[{"_id":"a1","title":"One","status":"draft"}]}"#);
        });

        let posts = client(&server).list_posts(100).await?;
        mock.assert();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id.as_deref(), Some("a1"));
        Ok(())
    }

    #[tokio::test]
    async fn list_without_data_is_empty() -> Result<(), ApiError> {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/api/blog");
            then.status(200).body(r#"{"success":true,"data":null}"#);
        });

        assert!(client(&server).list_posts(10).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unsuccessful_envelope_surfaces_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/api/blog/a1");
            then.status(200)
                .body(r#"{"success":false,"error":"Post not found"}"#);
        });

        let err = client(&server).fetch_post("a1").await.expect_err("rejected");
        assert_eq!(err.to_string(), "Post not found");
    }

    #[tokio::test]
    async fn error_status_prefers_envelope_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("DELETE").path("/api/blog/a1");
            then.status(403)
                .body(r#"{"success":false,"error":"Forbidden"}"#);
        });

        let err = client(&server).delete_post("a1").await.expect_err("forbidden");
        assert!(matches!(err, ApiError::Rejected(ref message) if message == "Forbidden"));
    }

    #[tokio::test]
    async fn error_status_without_envelope_reports_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/api/blog");
            then.status(502).body("bad gateway");
        });

        let err = client(&server).list_posts(100).await.expect_err("502");
        assert!(matches!(err, ApiError::Status { status: 502, .. }));
    }

    #[test]
    fn ids_are_encoded_as_one_segment() {
        let base = Url::parse("https://cms.example.com/admin/").expect("base");
        let client = ApiClient::new(base, Duration::from_secs(5)).expect("client");

        let url = client.posts_url(Some("a/b c")).expect("url");
        assert_eq!(url.path(), "/admin/api/blog/a%2Fb%20c");
        assert_eq!(client.posts_url(None).expect("url").path(), "/admin/api/blog");
    }

    #[tokio::test]
    async fn update_puts_camel_case_form() -> Result<(), ApiError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("PUT")
                .path("/api/blog/a1")
                .json_body_includes(r#"{"title":"New","metaTitle":"Meta","isNews":true}"#);
            then.status(200)
                .body(r#"{"success":true,"data":{"id":"a1","title":"New","status":"draft"}}"#);
        });

        let form = PostForm {
            title: "New".into(),
            meta_title: Some("Meta".into()),
            is_news: Some(true),
            ..PostForm::default()
        };
        let post = client(&server).update_post("a1", &form).await?;
        mock.assert();
        assert_eq!(post.and_then(|p| p.id).as_deref(), Some("a1"));
        Ok(())
    }

    #[tokio::test]
    async fn create_posts_to_collection() -> Result<(), ApiError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/api/blog")
                .json_body_includes(r#"{"title":"Hello","status":"published"}"#);
            then.status(201).body(r#"{"success":true}"#);
        });

        let form = PostForm {
            title: "Hello".into(),
            status: newsdesk_api_types::PostStatus::Published,
            ..PostForm::default()
        };
        assert!(client(&server).create_post(&form).await?.is_none());
        mock.assert();
        Ok(())
    }
}
