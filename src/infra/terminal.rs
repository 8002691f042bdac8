//! Line-oriented terminal adapters: toasts on stderr, prompts on stdout,
//! answers from any buffered async reader.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use newsdesk_api_types::{PostForm, PostStatus};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::application::posts::{Confirm, DialogState, Notifier, PostDialog, Toast, ToastKind};
use crate::domain::posts::parse_tags;

use super::error::InfraError;

/// Prints toasts to stderr so they never mix with rendered output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, toast: Toast) {
        let marker = match toast.kind {
            ToastKind::Success => "✔",
            ToastKind::Error => "✖",
        };
        debug!(
            id = %toast.id,
            kind = toast.kind.as_variant(),
            ttl_ms = toast.ttl.as_millis(),
            "toast"
        );
        eprintln!("{marker} {}", toast.text);
    }
}

/// Shared line source; clones read from the same underlying stream.
pub struct Terminal<R> {
    lines: Arc<Mutex<Lines<R>>>,
}

impl<R> Clone for Terminal<R> {
    fn clone(&self) -> Self {
        Self {
            lines: Arc::clone(&self.lines),
        }
    }
}

impl Terminal<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> Terminal<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: Arc::new(Mutex::new(reader.lines())),
        }
    }

    /// Next input line without its terminator, or `None` at end of input.
    pub async fn read_line(&self) -> Result<Option<String>, InfraError> {
        let mut lines = self.lines.lock().await;
        Ok(lines.next_line().await?)
    }

    pub async fn ask(&self, prompt: &str) -> Result<Option<String>, InfraError> {
        {
            let mut out = std::io::stdout().lock();
            write!(out, "{prompt}")?;
            out.flush()?;
        }
        self.read_line().await
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send + 'static> Confirm for Terminal<R> {
    async fn confirm(&self, question: &str) -> bool {
        match self.ask(&format!("{question} [y/N] ")).await {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "failed to read confirmation");
                false
            }
        }
    }
}

enum FieldInput {
    Keep,
    Clear,
    Set(String),
}

/// Asks for each post field in turn, offering the current value as the default.
pub struct TerminalDialog<R> {
    terminal: Terminal<R>,
}

impl<R: AsyncBufRead + Unpin + Send> TerminalDialog<R> {
    pub fn new(terminal: Terminal<R>) -> Self {
        Self { terminal }
    }

    async fn field(&self, label: &str, current: Option<&str>) -> Option<FieldInput> {
        let prompt = match current {
            Some(value) if !value.is_empty() => format!("{label} [{}]: ", preview(value)),
            _ => format!("{label}: "),
        };
        let line = match self.terminal.ask(&prompt).await {
            Ok(Some(line)) => line,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "failed to read dialog input");
                return None;
            }
        };
        let line = line.trim();
        Some(match line {
            "" => FieldInput::Keep,
            "-" => FieldInput::Clear,
            value => FieldInput::Set(value.to_string()),
        })
    }

    async fn optional(&self, label: &str, slot: &mut Option<String>) -> Option<()> {
        let input = self.field(label, slot.as_deref()).await?;
        match input {
            FieldInput::Keep => {}
            FieldInput::Clear => *slot = None,
            FieldInput::Set(value) => *slot = Some(value),
        }
        Some(())
    }

    async fn fill(&self, form: &mut PostForm) -> Option<()> {
        let title = self
            .field("Title ('.' cancels)", Some(form.title.as_str()))
            .await?;
        match title {
            FieldInput::Set(value) if value == "." => return None,
            FieldInput::Set(value) => form.title = value,
            FieldInput::Keep | FieldInput::Clear => {}
        }

        let status = form.status.to_string();
        let status = self
            .field("Status (draft/published)", Some(status.as_str()))
            .await?;
        if let FieldInput::Set(value) = status {
            form.status = PostStatus::from(value);
        }

        self.optional("Slug", &mut form.slug).await?;
        self.optional("Category", &mut form.category).await?;
        self.optional("Excerpt", &mut form.excerpt).await?;
        self.optional("Content", &mut form.content).await?;

        let tags = form.tags.join(", ");
        let tags = self
            .field("Tags (comma separated)", Some(tags.as_str()))
            .await?;
        match tags {
            FieldInput::Keep => {}
            FieldInput::Clear => form.tags.clear(),
            FieldInput::Set(value) => form.tags = parse_tags(&value),
        }

        self.optional("Featured image", &mut form.featured_image).await?;
        self.optional("Author", &mut form.author).await?;
        self.optional("Meta title", &mut form.meta_title).await?;
        self.optional("Meta description", &mut form.meta_description).await?;

        let news = form.is_news.map(|flag| if flag { "y" } else { "n" });
        let news = self.field("News item (y/n)", news).await?;
        match news {
            FieldInput::Keep => {}
            FieldInput::Clear => form.is_news = None,
            FieldInput::Set(value) => {
                form.is_news = Some(matches!(value.to_ascii_lowercase().as_str(), "y" | "yes"));
            }
        }

        let published = form
            .published_at
            .and_then(|at| at.format(&Rfc3339).ok());
        let published = self
            .field("Published at (RFC 3339)", published.as_deref())
            .await?;
        match published {
            FieldInput::Keep => {}
            FieldInput::Clear => form.published_at = None,
            FieldInput::Set(value) => match OffsetDateTime::parse(&value, &Rfc3339) {
                Ok(at) => form.published_at = Some(at),
                Err(err) => eprintln!("✖ ignoring publish time `{value}`: {err}"),
            },
        }

        Some(())
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send + 'static> PostDialog for TerminalDialog<R> {
    async fn collect(&mut self, state: &DialogState) -> Option<PostForm> {
        let mut form = match state {
            DialogState::Closed => return None,
            DialogState::Adding => {
                println!("New post (enter keeps a value, '-' clears it)");
                PostForm::default()
            }
            DialogState::Editing(post) => {
                println!("Editing \"{}\" (enter keeps a value, '-' clears it)", post.title);
                PostForm::from(post)
            }
        };
        self.fill(&mut form).await?;
        Some(form)
    }
}

fn preview(value: &str) -> String {
    const MAX: usize = 40;
    let single_line = value.replace('\n', " ");
    if single_line.chars().count() > MAX {
        let cut: String = single_line.chars().take(MAX).collect();
        format!("{cut}…")
    } else {
        single_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdesk_api_types::Post;

    fn terminal(input: &'static str) -> Terminal<&'static [u8]> {
        Terminal::new(input.as_bytes())
    }

    #[tokio::test]
    async fn confirm_accepts_yes_variants_only() {
        assert!(terminal("y\n").confirm("Delete?").await);
        assert!(terminal("YES\n").confirm("Delete?").await);
        assert!(!terminal("n\n").confirm("Delete?").await);
        assert!(!terminal("\n").confirm("Delete?").await);
        assert!(!terminal("").confirm("Delete?").await);
    }

    #[tokio::test]
    async fn clones_share_one_stream() -> Result<(), InfraError> {
        let first = terminal("one\ntwo\n");
        let second = first.clone();
        assert_eq!(first.read_line().await?.as_deref(), Some("one"));
        assert_eq!(second.read_line().await?.as_deref(), Some("two"));
        assert_eq!(first.read_line().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn dialog_builds_new_form() {
        let input = "Hello\npublished\nhello\nnews\n\nBody text\nrust, web\n\nAda\n\n\ny\n2024-05-01T10:00:00Z\n";
        let mut dialog = TerminalDialog::new(terminal(input));

        let form = dialog.collect(&DialogState::Adding).await.expect("form");

        assert_eq!(form.title, "Hello");
        assert_eq!(form.status, PostStatus::Published);
        assert_eq!(form.slug.as_deref(), Some("hello"));
        assert_eq!(form.category.as_deref(), Some("news"));
        assert_eq!(form.excerpt, None);
        assert_eq!(form.content.as_deref(), Some("Body text"));
        assert_eq!(form.tags, vec!["rust".to_string(), "web".to_string()]);
        assert_eq!(form.author.as_deref(), Some("Ada"));
        assert_eq!(form.is_news, Some(true));
        assert!(form.published_at.is_some());
    }

    #[tokio::test]
    async fn dialog_keeps_and_clears_existing_values() {
        let post = Post {
            id: Some("1".into()),
            title: "Old".into(),
            slug: Some("old".into()),
            category: Some("misc".into()),
            ..Post::default()
        };
        let input = "\n\n\n-\n\n\n\n\n\n\n\n\n\n";
        let mut dialog = TerminalDialog::new(terminal(input));

        let form = dialog
            .collect(&DialogState::Editing(post))
            .await
            .expect("form");

        assert_eq!(form.title, "Old");
        assert_eq!(form.slug.as_deref(), Some("old"));
        assert_eq!(form.category, None);
    }

    #[tokio::test]
    async fn dot_title_or_end_of_input_cancels() {
        let mut cancel = TerminalDialog::new(terminal(".\n"));
        assert!(cancel.collect(&DialogState::Adding).await.is_none());

        let mut truncated = TerminalDialog::new(terminal("Title\n"));
        assert!(truncated.collect(&DialogState::Adding).await.is_none());
    }
}
