//! In-memory collaborators shared by the store and editor tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use newsdesk_api_types::{Post, PostForm, PostStatus};

use super::api::{ApiError, PostsApi};
use super::editor::DialogState;
use super::notify::{Notifier, Toast};
use super::progress::{PendingView, Progress};
use super::prompt::PostDialog;
use super::store::ListState;

pub(crate) fn sample_post(id: &str, title: &str) -> Post {
    Post {
        id: Some(id.to_string()),
        title: title.to_string(),
        status: PostStatus::Published,
        ..Post::default()
    }
}

#[derive(Default)]
pub(crate) struct StubApi {
    posts: Mutex<Vec<Post>>,
    list_limits: Mutex<Vec<u32>>,
    fetched: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    created: Mutex<Vec<PostForm>>,
    updated: Mutex<Vec<(String, PostForm)>>,
    fail_lists: AtomicBool,
    fail_writes: AtomicBool,
}

impl StubApi {
    pub(crate) fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
            ..Self::default()
        }
    }

    pub(crate) fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn list_limits(&self) -> Vec<u32> {
        self.list_limits.lock().unwrap().clone()
    }

    pub(crate) fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub(crate) fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub(crate) fn created(&self) -> Vec<PostForm> {
        self.created.lock().unwrap().clone()
    }

    pub(crate) fn updated(&self) -> Vec<(String, PostForm)> {
        self.updated.lock().unwrap().clone()
    }

    fn write_guard(&self) -> Result<(), ApiError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ApiError::Rejected("write refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PostsApi for StubApi {
    async fn list_posts(&self, limit: u32) -> Result<Vec<Post>, ApiError> {
        self.list_limits.lock().unwrap().push(limit);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "boom".into(),
            });
        }
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn fetch_post(&self, id: &str) -> Result<Post, ApiError> {
        self.fetched.lock().unwrap().push(id.to_string());
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| post.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| ApiError::Rejected("Post not found".into()))
    }

    async fn delete_post(&self, id: &str) -> Result<(), ApiError> {
        self.write_guard()?;
        self.deleted.lock().unwrap().push(id.to_string());
        self.posts
            .lock()
            .unwrap()
            .retain(|post| post.id.as_deref() != Some(id));
        Ok(())
    }

    async fn create_post(&self, form: &PostForm) -> Result<Option<Post>, ApiError> {
        self.write_guard()?;
        self.created.lock().unwrap().push(form.clone());
        let mut posts = self.posts.lock().unwrap();
        let mut post = Post::from(form);
        post.id = Some(format!("new-{}", posts.len() + 1));
        posts.push(post.clone());
        Ok(Some(post))
    }

    async fn update_post(&self, id: &str, form: &PostForm) -> Result<Option<Post>, ApiError> {
        self.write_guard()?;
        self.updated
            .lock()
            .unwrap()
            .push((id.to_string(), form.clone()));
        let mut posts = self.posts.lock().unwrap();
        if let Some(post) = posts.iter_mut().find(|post| post.id.as_deref() == Some(id)) {
            let mut replacement = Post::from(form);
            replacement.id = post.id.clone();
            *post = replacement;
        }
        Ok(None)
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub(crate) fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub(crate) fn texts(&self) -> Vec<String> {
        self.toasts().into_iter().map(|toast| toast.text).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

/// Hands out queued forms, then cancels.
pub(crate) struct ScriptedDialog {
    forms: VecDeque<PostForm>,
    pub(crate) seen: Vec<DialogState>,
}

impl ScriptedDialog {
    pub(crate) fn new(forms: impl IntoIterator<Item = PostForm>) -> Self {
        Self {
            forms: forms.into_iter().collect(),
            seen: Vec::new(),
        }
    }
}

#[async_trait]
impl PostDialog for ScriptedDialog {
    async fn collect(&mut self, state: &DialogState) -> Option<PostForm> {
        self.seen.push(state.clone());
        self.forms.pop_front()
    }
}

/// Owned copy of a [`ListState`], so snapshots outlive the store borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingList {
    Idle,
    Loading,
    Error(String),
    Loaded(usize),
}

#[derive(Default)]
pub(crate) struct RecordingProgress {
    seen: Mutex<Vec<(PendingList, Vec<String>)>>,
}

impl RecordingProgress {
    pub(crate) fn seen(&self) -> Vec<(PendingList, Vec<String>)> {
        self.seen.lock().unwrap().clone()
    }
}

impl Progress for RecordingProgress {
    fn pending(&self, view: PendingView<'_>) {
        let list = match view.list {
            ListState::Idle => PendingList::Idle,
            ListState::Loading => PendingList::Loading,
            ListState::Error(message) => PendingList::Error(message.to_string()),
            ListState::Loaded(posts) => PendingList::Loaded(posts.len()),
        };
        let mut rows: Vec<String> = view.loading_rows.iter().cloned().collect();
        rows.sort();
        self.seen.lock().unwrap().push((list, rows));
    }
}
