//! Rules the admin desk enforces before it talks to the API.

use newsdesk_api_types::{Post, PostForm};
use url::Url;

use super::error::DomainError;

/// Actions that need a stored post to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
    View,
}

impl RowAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RowAction::Edit => "edit",
            RowAction::Delete => "delete",
            RowAction::View => "view",
        }
    }
}

/// Identifier of `post`, or a validation error naming the refused action.
pub fn require_id(post: &Post, action: RowAction) -> Result<&str, DomainError> {
    post.id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| DomainError::missing_id(action.as_str()))
}

/// Trim the form and reject it when the title is blank.
pub fn normalize_form(mut form: PostForm) -> Result<PostForm, DomainError> {
    form.title = form.title.trim().to_string();
    if form.title.is_empty() {
        return Err(DomainError::validation("title must not be empty"));
    }

    for field in [
        &mut form.slug,
        &mut form.featured_image,
        &mut form.category,
        &mut form.excerpt,
        &mut form.author,
        &mut form.meta_title,
        &mut form.meta_description,
    ] {
        *field = field.take().and_then(|value| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });
    }

    let mut tags: Vec<String> = Vec::with_capacity(form.tags.len());
    for tag in form.tags.drain(..) {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    form.tags = tags;

    Ok(form)
}

/// Split a comma separated tag list as typed on the command line.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Public URL of a post on the blog front end, preferring the slug over the id.
pub fn public_link(site: &Url, post: &Post) -> Result<Url, DomainError> {
    let id = require_id(post, RowAction::View)?;
    let key = post
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|slug| !slug.is_empty())
        .unwrap_or(id);

    let mut url = site.clone();
    url.path_segments_mut()
        .map_err(|()| DomainError::validation("public site URL cannot carry a path"))?
        .pop_if_empty()
        .extend(["blog", key]);
    Ok(url)
}
