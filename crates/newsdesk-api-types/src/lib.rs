//! Wire types shared by the blog posts REST API and its clients.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

/// Status filter value that asks the API for posts in every status.
pub const ALL_STATUSES: &str = "all";

/// Lifecycle tag controlling public visibility of a post.
///
/// Statuses the API introduces later are kept verbatim in [`PostStatus::Other`]
/// so they survive a read-modify-write cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Other(String),
}

impl PostStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Other(value) => value.as_str(),
        }
    }
}

impl From<String> for PostStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "draft" => PostStatus::Draft,
            "published" => PostStatus::Published,
            _ => PostStatus::Other(value),
        }
    }
}

impl From<&str> for PostStatus {
    fn from(value: &str) -> Self {
        PostStatus::from(value.to_string())
    }
}

impl From<PostStatus> for String {
    fn from(value: PostStatus) -> Self {
        match value {
            PostStatus::Other(value) => value,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A blog or news record as returned by the API.
///
/// List responses carry partial rows; `GET /api/blog/{id}` returns the full record.
/// Decoding goes through `PostRecord` so one odd row cannot fail a whole list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PostRecord")]
pub struct Post {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub status: PostStatus,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_news: Option<bool>,
}

/// Wire shape of [`Post`]: accepts `id`, `_id` or both (`_id` wins), and
/// treats `null` like an absent field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default)]
    featured_image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    status: PostStatus,
    #[serde(default, with = "time::serde::rfc3339::option")]
    published_at: Option<OffsetDateTime>,
    #[serde(default)]
    views: Option<u64>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    tags: Vec<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    meta_title: Option<String>,
    #[serde(default)]
    meta_description: Option<String>,
    #[serde(default)]
    is_news: Option<bool>,
}

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        Self {
            id: record.mongo_id.or(record.id),
            title: record.title,
            featured_image: record.featured_image,
            status: record.status,
            published_at: record.published_at,
            views: record.views,
            slug: record.slug,
            category: record.category,
            excerpt: record.excerpt,
            content: record.content,
            tags: record.tags,
            author: record.author,
            meta_title: record.meta_title,
            meta_description: record.meta_description,
            is_news: record.is_news,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Create/update payload for `POST /api/blog` and `PUT /api/blog/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostForm {
    pub title: String,
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_news: Option<bool>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<OffsetDateTime>,
}

impl From<&Post> for PostForm {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            status: post.status.clone(),
            slug: post.slug.clone(),
            featured_image: post.featured_image.clone(),
            category: post.category.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            tags: post.tags.clone(),
            author: post.author.clone(),
            meta_title: post.meta_title.clone(),
            meta_description: post.meta_description.clone(),
            is_news: post.is_news,
            published_at: post.published_at,
        }
    }
}

impl From<&PostForm> for Post {
    /// Local stand-in for a write the API acknowledged without echoing the record.
    fn from(form: &PostForm) -> Self {
        Self {
            id: None,
            title: form.title.clone(),
            featured_image: form.featured_image.clone(),
            status: form.status.clone(),
            published_at: form.published_at,
            views: None,
            slug: form.slug.clone(),
            category: form.category.clone(),
            excerpt: form.excerpt.clone(),
            content: form.content.clone(),
            tags: form.tags.clone(),
            author: form.author.clone(),
            meta_title: form.meta_title.clone(),
            meta_description: form.meta_description.clone(),
            is_news: form.is_news,
        }
    }
}

/// Response envelope used by every endpoint: `{ success, data, error? }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Collapse the envelope into its payload, or the server-supplied error message.
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .error
                .unwrap_or_else(|| "request was not successful".to_string()))
        }
    }
}
