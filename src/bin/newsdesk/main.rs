//! newsdesk: admin desk for blog and news posts.
//! One-shot `posts` subcommands for scripting, `console` for an interactive table.
#![deny(clippy::all, clippy::pedantic)]

mod client;
mod console;
mod handlers;
mod io;
mod print;

use std::process;
use std::sync::Arc;

use newsdesk::config::{self, Command};
use newsdesk::infra::telemetry;
use newsdesk::infra::terminal::{Terminal, TerminalNotifier};
use tracing::{Dispatch, Level, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

use client::{CliError, Ctx};
use console::Screen;
use handlers::posts;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_error(&error);
        process::exit(1);
    }
}

fn report_error(error: &CliError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "newsdesk failed");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "newsdesk failed");
    });
}

async fn run() -> Result<(), CliError> {
    let (args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    let ctx = Ctx::new(settings, Arc::new(TerminalNotifier))?;

    match args.command {
        Command::Posts(cmd) => posts::handle(&ctx, cmd.action).await?,
        Command::Console => {
            let screen = Arc::new(Screen::new(std::io::stdout()));
            console::run(&ctx, Terminal::stdin(), screen).await?;
        }
    }

    Ok(())
}
