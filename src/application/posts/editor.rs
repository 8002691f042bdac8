//! Editor view state: the posts table plus the add/edit dialog.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use newsdesk_api_types::{Post, PostForm};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::domain::posts::{RowAction, normalize_form, public_link, require_id};

use super::notify::{Notifier, Toast};
use super::prompt::{Confirm, PostDialog};
use super::store::{DeleteOutcome, PostsStore};

/// Time the dialog stays mounted after it is hidden, so its exit transition can finish.
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq)]
pub enum DialogState {
    Closed,
    Adding,
    Editing(Post),
}

#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub close_delay: Duration,
    pub public_site_url: Option<Url>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            close_delay: DEFAULT_CLOSE_DELAY,
            public_site_url: None,
        }
    }
}

pub struct PostsEditor {
    store: PostsStore,
    notifier: Arc<dyn Notifier>,
    settings: EditorSettings,
    dialog: DialogState,
    dialog_open: bool,
    row_loading: HashSet<String>,
}

impl PostsEditor {
    pub fn new(store: PostsStore, notifier: Arc<dyn Notifier>, settings: EditorSettings) -> Self {
        Self {
            store,
            notifier,
            settings,
            dialog: DialogState::Closed,
            dialog_open: false,
            row_loading: HashSet::new(),
        }
    }

    pub fn store(&self) -> &PostsStore {
        &self.store
    }

    pub fn dialog(&self) -> &DialogState {
        &self.dialog
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn is_row_loading(&self, id: &str) -> bool {
        self.row_loading.contains(id)
    }

    /// Row in the current list with the given identifier.
    pub fn row(&self, id: &str) -> Option<&Post> {
        self.store
            .posts()
            .iter()
            .find(|post| post.id.as_deref() == Some(id))
    }

    pub async fn mount(&mut self) {
        self.store.list().await;
    }

    pub async fn retry(&mut self) {
        self.store.list().await;
    }

    pub fn add(&mut self) {
        self.dialog = DialogState::Adding;
        self.dialog_open = true;
    }

    /// Fetch the full record behind `row` and open it in the dialog.
    /// Returns whether the dialog opened.
    #[instrument(skip_all, fields(id = row.id.as_deref().unwrap_or("")))]
    pub async fn edit(&mut self, row: &Post) -> bool {
        let id = match require_id(row, RowAction::Edit) {
            Ok(id) => id.to_string(),
            Err(err) => {
                warn!(error = %err, "edit refused");
                self.notifier.notify(Toast::error(err.to_string()));
                return false;
            }
        };

        self.row_loading.insert(id.clone());
        self.store.announce_pending(&self.row_loading);
        let fetched = self.store.fetch_one(&id).await;
        self.row_loading.remove(&id);

        match fetched {
            Some(post) => {
                self.dialog = DialogState::Editing(post);
                self.dialog_open = true;
                true
            }
            None => false,
        }
    }

    /// Returns `None` when the row cannot be deleted because it has no identifier.
    #[instrument(skip_all, fields(id = row.id.as_deref().unwrap_or("")))]
    pub async fn delete(&mut self, row: &Post, confirm: &dyn Confirm) -> Option<DeleteOutcome> {
        let id = match require_id(row, RowAction::Delete) {
            Ok(id) => id.to_string(),
            Err(err) => {
                warn!(error = %err, "delete refused");
                self.notifier.notify(Toast::error(err.to_string()));
                return None;
            }
        };
        Some(self.store.delete(&id, confirm).await)
    }

    pub fn view_link(&self, row: &Post) -> Option<Url> {
        let Some(site) = self.settings.public_site_url.as_ref() else {
            self.notifier
                .notify(Toast::error("No public site URL is configured"));
            return None;
        };
        match public_link(site, row) {
            Ok(url) => Some(url),
            Err(err) => {
                self.notifier.notify(Toast::error(err.to_string()));
                None
            }
        }
    }

    /// Validate and save the dialog's form; the dialog closes only on success.
    #[instrument(skip_all)]
    pub async fn submit(&mut self, form: PostForm) -> bool {
        let target = match &self.dialog {
            DialogState::Closed => {
                warn!("submit without an open dialog");
                return false;
            }
            DialogState::Adding => None,
            DialogState::Editing(post) => match require_id(post, RowAction::Edit) {
                Ok(id) => Some(id.to_string()),
                Err(err) => {
                    self.notifier.notify(Toast::error(err.to_string()));
                    return false;
                }
            },
        };

        let form = match normalize_form(form) {
            Ok(form) => form,
            Err(err) => {
                self.notifier.notify(Toast::error(err.to_string()));
                return false;
            }
        };

        let saved = match target {
            None => self.store.create(&form).await,
            Some(id) => self.store.update(&id, &form).await,
        };
        if saved.is_none() {
            return false;
        }

        self.close().await;
        true
    }

    /// Hide the dialog, wait out the exit transition, drop the edit state and refresh.
    pub async fn close(&mut self) {
        self.dialog_open = false;
        if !self.settings.close_delay.is_zero() {
            tokio::time::sleep(self.settings.close_delay).await;
        }
        self.dialog = DialogState::Closed;
        debug!("dialog closed");
        self.store.list().await;
    }

    /// Drive `dialog` until a submission succeeds or the user cancels.
    pub async fn run_dialog(&mut self, dialog: &mut dyn PostDialog) {
        while self.dialog_open {
            let Some(form) = dialog.collect(&self.dialog).await else {
                self.close().await;
                return;
            };
            if self.submit(form).await {
                return;
            }
        }
    }
}
