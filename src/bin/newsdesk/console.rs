//! Interactive session: the posts table stays on screen and every command
//! re-renders it.

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use newsdesk::application::posts::{PendingView, PostsEditor, Progress};
use newsdesk::infra::terminal::{Terminal, TerminalDialog};
use newsdesk::presentation::views::posts::PostsPanelTemplate;
use newsdesk_api_types::Post;
use tokio::io::AsyncBufRead;
use tracing::{debug, warn};

use crate::client::{CliError, Ctx};

const PROMPT: &str = "newsdesk> ";

const HELP: &str = "\
Commands:
  list | refresh     reload the table
  retry              reload after a failed load
  new                write a new post
  edit <row>         edit a post
  delete <row>       delete a post (asks first)
  view <row>         print the public link of a post
  help               show this text
  quit | exit        leave the console
A <row> is a post id, or `#N` for the N-th row of the table.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Id(String),
    Position(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ConsoleCommand {
    Empty,
    List,
    Retry,
    New,
    Edit(Target),
    Delete(Target),
    View(Target),
    Help,
    Quit,
}

impl ConsoleCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Self::Empty);
        };
        let target = words.next().map(parse_target).transpose()?;
        if let Some(extra) = words.next() {
            return Err(format!("unexpected argument `{extra}`"));
        }

        let needs_target = |build: fn(Target) -> Self| {
            target
                .clone()
                .map(build)
                .ok_or_else(|| format!("`{verb}` needs a post id or #row"))
        };

        match verb.to_ascii_lowercase().as_str() {
            "list" | "refresh" => Ok(Self::List),
            "retry" => Ok(Self::Retry),
            "new" | "add" => Ok(Self::New),
            "edit" => needs_target(Self::Edit),
            "delete" | "rm" => needs_target(Self::Delete),
            "view" | "open" => needs_target(Self::View),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command `{other}`; type `help`")),
        }
    }
}

fn parse_target(raw: &str) -> Result<Target, String> {
    match raw.strip_prefix('#') {
        Some(position) => match position.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Target::Position(n)),
            _ => Err(format!("`{raw}` is not a row number")),
        },
        None => Ok(Target::Id(raw.to_string())),
    }
}

/// Row a target points at. Ids missing from the table still resolve, so posts
/// beyond the list limit stay reachable.
fn resolve(editor: &PostsEditor, target: &Target) -> Result<Post, String> {
    match target {
        Target::Id(id) => Ok(editor.row(id).cloned().unwrap_or_else(|| Post {
            id: Some(id.clone()),
            ..Post::default()
        })),
        Target::Position(n) => editor
            .store()
            .posts()
            .get(n - 1)
            .cloned()
            .ok_or_else(|| format!("there is no row #{n}")),
    }
}

/// Console output. Command results and in-flight snapshots share one writer.
pub struct Screen<W> {
    out: Mutex<W>,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.out.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn print(&self, text: &str) -> Result<(), CliError> {
        let mut out = self.lock();
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn line(&self, text: &str) -> Result<(), CliError> {
        self.print(&format!("{text}\n"))
    }

    fn render(&self, editor: &PostsEditor) -> Result<(), CliError> {
        self.print(&PostsPanelTemplate::from_editor(editor).render_text()?)
    }

    #[cfg(test)]
    pub fn contents(&self) -> W
    where
        W: Clone,
    {
        self.lock().clone()
    }
}

impl<W: Write + Send> Progress for Screen<W> {
    fn pending(&self, view: PendingView<'_>) {
        let shown = PostsPanelTemplate::from_pending(&view)
            .render_text()
            .map_err(CliError::from)
            .and_then(|panel| self.print(&panel));
        if let Err(err) = shown {
            warn!(error = %err, "could not show pending request");
        }
    }
}

pub async fn run<R, W>(
    ctx: &Ctx,
    terminal: Terminal<R>,
    screen: Arc<Screen<W>>,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: Write + Send + 'static,
{
    let mut editor = ctx.editor(screen.clone());
    let mut dialog = TerminalDialog::new(terminal.clone());

    editor.mount().await;
    screen.render(&editor)?;

    while let Some(line) = terminal.ask(PROMPT).await? {
        let command = match ConsoleCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                screen.line(&message)?;
                continue;
            }
        };
        debug!(?command, "console command");

        match command {
            ConsoleCommand::Empty => continue,
            ConsoleCommand::Quit => break,
            ConsoleCommand::Help => {
                screen.line(HELP)?;
                continue;
            }
            ConsoleCommand::List => editor.mount().await,
            ConsoleCommand::Retry => editor.retry().await,
            ConsoleCommand::New => {
                editor.add();
                screen.render(&editor)?;
                editor.run_dialog(&mut dialog).await;
            }
            ConsoleCommand::Edit(target) => match resolve(&editor, &target) {
                Ok(row) => {
                    if editor.edit(&row).await {
                        screen.render(&editor)?;
                        editor.run_dialog(&mut dialog).await;
                    }
                }
                Err(message) => screen.line(&message)?,
            },
            ConsoleCommand::Delete(target) => match resolve(&editor, &target) {
                Ok(row) => {
                    editor.delete(&row, &terminal).await;
                }
                Err(message) => screen.line(&message)?,
            },
            ConsoleCommand::View(target) => {
                match resolve(&editor, &target) {
                    Ok(row) => {
                        if let Some(link) = editor.view_link(&row) {
                            screen.line(link.as_str())?;
                        }
                    }
                    Err(message) => screen.line(&message)?,
                }
                continue;
            }
        }
        screen.render(&editor)?;
    }

    Ok(())
}
