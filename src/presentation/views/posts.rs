use askama::Template;
use newsdesk_api_types::Post;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::application::posts::{DialogState, ListState, PendingView, PostsEditor, PostsStore};

use super::TemplateRenderError;

const TITLE_WIDTH: usize = 36;
const CONSOLE_EMPTY_HINT: &str = "Type `new` to write the first one.";
const COMMAND_EMPTY_HINT: &str = "Create one with `newsdesk posts create --title …`.";
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Clone)]
pub struct PostRowView {
    pub marker: &'static str,
    pub id: String,
    pub title: String,
    pub status: String,
    pub published: String,
    pub views: String,
    pub news: &'static str,
}

#[derive(Template)]
#[template(path = "admin/posts_panel.txt")]
pub struct PostsPanelTemplate {
    pub heading: String,
    pub loading: bool,
    pub idle: bool,
    pub failed: bool,
    pub error_message: String,
    pub rows: Vec<PostRowView>,
    pub empty_hint: &'static str,
    pub dialog_line: String,
}

impl PostsPanelTemplate {
    /// One-shot table for `posts list`; the empty state points at `posts create`.
    pub fn from_store(store: &PostsStore) -> Self {
        let mut panel = Self::build(store.state(), |_| false, String::new());
        panel.empty_hint = COMMAND_EMPTY_HINT;
        panel
    }

    /// Snapshot taken while a request is still in flight.
    pub fn from_pending(view: &PendingView<'_>) -> Self {
        Self::build(view.list, |id| view.is_row_loading(id), String::new())
    }

    pub fn from_editor(editor: &PostsEditor) -> Self {
        let dialog_line = if editor.is_dialog_open() {
            match editor.dialog() {
                DialogState::Closed => String::new(),
                DialogState::Adding => "» New post".to_string(),
                DialogState::Editing(post) => format!("» Editing \"{}\"", post.title),
            }
        } else {
            String::new()
        };
        Self::build(
            editor.store().state(),
            |id| editor.is_row_loading(id),
            dialog_line,
        )
    }

    fn build(
        list: ListState<'_>,
        row_loading: impl Fn(&str) -> bool,
        dialog_line: String,
    ) -> Self {
        let mut panel = Self {
            heading: "Posts".to_string(),
            loading: false,
            idle: false,
            failed: false,
            error_message: String::new(),
            rows: Vec::new(),
            empty_hint: CONSOLE_EMPTY_HINT,
            dialog_line,
        };

        match list {
            ListState::Idle => panel.idle = true,
            ListState::Loading => panel.loading = true,
            ListState::Error(message) => {
                panel.failed = true;
                panel.error_message = message.to_string();
            }
            ListState::Loaded(posts) => {
                panel.heading = format!("Posts ({})", posts.len());
                panel.rows = posts
                    .iter()
                    .map(|post| row_view(post, &row_loading))
                    .collect();
            }
        }
        panel
    }

    pub fn render_text(&self) -> Result<String, TemplateRenderError> {
        self.render().map_err(|err| {
            TemplateRenderError::new(
                "presentation::views::posts",
                "Failed to render the posts table",
                err,
            )
        })
    }
}

fn row_view(post: &Post, row_loading: &impl Fn(&str) -> bool) -> PostRowView {
    let id = post.id.clone().unwrap_or_default();
    let marker = if !id.is_empty() && row_loading(&id) {
        "⟳"
    } else {
        ""
    };

    PostRowView {
        marker,
        title: truncate(&post.title, TITLE_WIDTH),
        status: post.status.to_string(),
        published: post
            .published_at
            .and_then(|at| at.format(DATE_FORMAT).ok())
            .unwrap_or_else(|| "-".to_string()),
        views: post
            .views
            .map_or_else(|| "-".to_string(), |views| views.to_string()),
        news: match post.is_news {
            Some(true) => "yes",
            _ => "",
        },
        id: if id.is_empty() { "-".to_string() } else { id },
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(width - 1).collect();
    cut.push('…');
    cut
}
