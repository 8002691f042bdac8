//! Data-access store for the posts table: list, fetch-one, delete and writes,
//! with the loading/error state the view renders from.

use std::collections::HashSet;
use std::sync::Arc;

use newsdesk_api_types::{Post, PostForm};
use tracing::{debug, error, info, instrument};

use super::api::PostsApi;
use super::notify::{Notifier, Toast};
use super::progress::{NoProgress, PendingView, Progress};
use super::prompt::Confirm;

pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// What the view should show for the list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListState<'a> {
    Idle,
    Loading,
    Error(&'a str),
    Loaded(&'a [Post]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
    Failed,
}

pub struct PostsStore {
    api: Arc<dyn PostsApi>,
    notifier: Arc<dyn Notifier>,
    progress: Arc<dyn Progress>,
    limit: u32,
    posts: Vec<Post>,
    loading: bool,
    loaded: bool,
    error: Option<String>,
}

impl PostsStore {
    pub fn new(api: Arc<dyn PostsApi>, notifier: Arc<dyn Notifier>, limit: u32) -> Self {
        Self {
            api,
            notifier,
            progress: Arc::new(NoProgress),
            limit,
            posts: Vec::new(),
            loading: false,
            loaded: false,
            error: None,
        }
    }

    /// Report in-flight requests to `progress` instead of staying silent.
    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    /// Hand the current state, plus the rows being fetched, to the progress hook.
    pub fn announce_pending(&self, loading_rows: &HashSet<String>) {
        self.progress.pending(PendingView {
            list: self.state(),
            loading_rows,
        });
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn state(&self) -> ListState<'_> {
        if self.loading {
            ListState::Loading
        } else if let Some(message) = self.error.as_deref() {
            ListState::Error(message)
        } else if self.loaded {
            ListState::Loaded(&self.posts)
        } else {
            ListState::Idle
        }
    }

    /// Fetch up to `limit` posts across every status. Previously loaded rows
    /// stay in place when the request fails.
    #[instrument(skip(self), fields(limit = self.limit))]
    pub async fn list(&mut self) {
        self.loading = true;
        self.announce_pending(&HashSet::new());
        let result = self.api.list_posts(self.limit).await;
        self.loading = false;

        match result {
            Ok(posts) => {
                debug!(count = posts.len(), "posts loaded");
                self.posts = posts;
                self.loaded = true;
                self.error = None;
            }
            Err(err) => {
                error!(error = %err, "failed to load posts");
                self.notifier
                    .notify(Toast::error(format!("Failed to load posts: {err}")));
                self.error = Some(err.to_string());
            }
        }
    }

    /// Ask `confirm` first; only a confirmed request reaches the API. The
    /// list is refreshed after a successful delete.
    pub async fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> DeleteOutcome {
        let outcome = self.remove(id, confirm).await;
        if outcome == DeleteOutcome::Deleted {
            self.list().await;
        }
        outcome
    }

    /// [`PostsStore::delete`] without the refresh, for callers that never show the list.
    #[instrument(skip(self, confirm))]
    pub async fn remove(&mut self, id: &str, confirm: &dyn Confirm) -> DeleteOutcome {
        if !confirm
            .confirm("Are you sure you want to delete this post?")
            .await
        {
            debug!("delete cancelled");
            return DeleteOutcome::Cancelled;
        }

        self.loading = true;
        let result = self.api.delete_post(id).await;
        self.loading = false;

        match result {
            Ok(()) => {
                info!("post deleted");
                self.notifier.notify(Toast::success("Post deleted"));
                DeleteOutcome::Deleted
            }
            Err(err) => {
                error!(error = %err, "failed to delete post");
                self.notifier
                    .notify(Toast::error(format!("Failed to delete post: {err}")));
                DeleteOutcome::Failed
            }
        }
    }

    /// Full record for editing; rows in the list only carry partial data.
    #[instrument(skip(self))]
    pub async fn fetch_one(&mut self, id: &str) -> Option<Post> {
        match self.api.fetch_post(id).await {
            Ok(post) => Some(post),
            Err(err) => {
                error!(error = %err, "failed to load post");
                self.notifier
                    .notify(Toast::error(format!("Failed to load post: {err}")));
                None
            }
        }
    }

    #[instrument(skip(self, form), fields(title = %form.title))]
    pub async fn create(&mut self, form: &PostForm) -> Option<Post> {
        match self.api.create_post(form).await {
            Ok(post) => {
                info!("post created");
                self.notifier.notify(Toast::success("Post created"));
                Some(post.unwrap_or_else(|| Post::from(form)))
            }
            Err(err) => {
                error!(error = %err, "failed to create post");
                self.notifier
                    .notify(Toast::error(format!("Failed to create post: {err}")));
                None
            }
        }
    }

    #[instrument(skip(self, form), fields(title = %form.title))]
    pub async fn update(&mut self, id: &str, form: &PostForm) -> Option<Post> {
        match self.api.update_post(id, form).await {
            Ok(post) => {
                info!("post updated");
                self.notifier.notify(Toast::success("Post updated"));
                Some(post.unwrap_or_else(|| {
                    let mut post = Post::from(form);
                    post.id = Some(id.to_string());
                    post
                }))
            }
            Err(err) => {
                error!(error = %err, "failed to update post");
                self.notifier
                    .notify(Toast::error(format!("Failed to update post: {err}")));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::posts::prompt::FixedAnswer;
    use crate::application::posts::testing::{
        PendingList, RecordingNotifier, RecordingProgress, StubApi, sample_post,
    };
    use crate::application::posts::notify::ToastKind;

    fn store(api: &Arc<StubApi>, notifier: &Arc<RecordingNotifier>) -> PostsStore {
        PostsStore::new(api.clone(), notifier.clone(), DEFAULT_LIST_LIMIT)
    }

    #[tokio::test]
    async fn list_starts_idle_then_loads() {
        let api = Arc::new(StubApi::with_posts(vec![sample_post("1", "First")]));
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = store(&api, &notifier);

        assert_eq!(store.state(), ListState::Idle);
        store.list().await;

        assert!(matches!(store.state(), ListState::Loaded(posts) if posts.len() == 1));
        assert_eq!(api.list_limits(), vec![DEFAULT_LIST_LIMIT]);
        assert!(notifier.toasts().is_empty());
    }

    #[tokio::test]
    async fn failed_list_keeps_previous_rows_and_notifies() {
        let api = Arc::new(StubApi::with_posts(vec![sample_post("1", "First")]));
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = store(&api, &notifier);
        store.list().await;

        api.fail_lists(true);
        store.list().await;

        assert!(matches!(store.state(), ListState::Error(_)));
        assert!(!store.is_loading());
        assert_eq!(store.posts().len(), 1);
        let toasts = notifier.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert!(toasts[0].text.starts_with("Failed to load posts"));
    }

    #[tokio::test]
    async fn successful_list_clears_error() {
        let api = Arc::new(StubApi::with_posts(Vec::new()));
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = store(&api, &notifier);

        api.fail_lists(true);
        store.list().await;
        assert!(store.error().is_some());

        api.fail_lists(false);
        store.list().await;
        assert_eq!(store.error(), None);
        assert_eq!(store.state(), ListState::Loaded(&[]));
    }

    #[tokio::test]
    async fn declined_delete_makes_no_call() {
        let api = Arc::new(StubApi::with_posts(vec![sample_post("1", "First")]));
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = store(&api, &notifier);

        let outcome = store.delete("1", &FixedAnswer(false)).await;

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert!(api.deleted().is_empty());
        assert!(api.list_limits().is_empty());
        assert!(notifier.toasts().is_empty());
    }

    #[tokio::test]
    async fn confirmed_delete_notifies_and_refreshes() {
        let api = Arc::new(StubApi::with_posts(vec![sample_post("1", "First")]));
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = store(&api, &notifier);

        let outcome = store.delete("1", &FixedAnswer(true)).await;

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(api.deleted(), vec!["1".to_string()]);
        assert_eq!(api.list_limits().len(), 1);
        assert!(store.posts().is_empty());
        assert_eq!(notifier.texts(), vec!["Post deleted".to_string()]);
    }

    #[tokio::test]
    async fn remove_skips_refresh() {
        let api = Arc::new(StubApi::with_posts(vec![sample_post("1", "First")]));
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = store(&api, &notifier);

        let outcome = store.remove("1", &FixedAnswer(true)).await;

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(api.deleted(), vec!["1".to_string()]);
        assert!(api.list_limits().is_empty());
        assert_eq!(notifier.texts(), vec!["Post deleted".to_string()]);
    }

    #[tokio::test]
    async fn list_reports_loading_before_the_request() {
        let api = Arc::new(StubApi::with_posts(vec![sample_post("1", "First")]));
        let notifier = Arc::new(RecordingNotifier::default());
        let progress = Arc::new(RecordingProgress::default());
        let mut store = store(&api, &notifier).with_progress(progress.clone());

        store.list().await;

        assert_eq!(progress.seen(), vec![(PendingList::Loading, Vec::new())]);
        assert!(matches!(store.state(), ListState::Loaded(_)));
    }

    #[tokio::test]
    async fn failed_delete_skips_refresh() {
        let api = Arc::new(StubApi::with_posts(vec![sample_post("1", "First")]));
        api.fail_writes(true);
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = store(&api, &notifier);

        let outcome = store.delete("1", &FixedAnswer(true)).await;

        assert_eq!(outcome, DeleteOutcome::Failed);
        assert!(api.list_limits().is_empty());
        assert!(notifier.texts()[0].starts_with("Failed to delete post"));
    }

    #[tokio::test]
    async fn fetch_one_failure_returns_none() {
        let api = Arc::new(StubApi::with_posts(Vec::new()));
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = store(&api, &notifier);

        assert!(store.fetch_one("missing").await.is_none());
        assert!(notifier.texts()[0].starts_with("Failed to load post"));
    }

    #[tokio::test]
    async fn update_without_echo_keeps_id() {
        let api = Arc::new(StubApi::with_posts(vec![sample_post("3", "Old")]));
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = store(&api, &notifier);

        let form = PostForm {
            title: "New".into(),
            ..PostForm::default()
        };
        let post = store.update("3", &form).await.expect("updated");

        assert_eq!(post.id.as_deref(), Some("3"));
        assert_eq!(post.title, "New");
        assert_eq!(notifier.texts(), vec!["Post updated".to_string()]);
    }
}
