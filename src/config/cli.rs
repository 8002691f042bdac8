use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the newsdesk binary.
#[derive(Debug, Parser)]
#[command(name = "newsdesk", version, about = "Blog and news post admin desk")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "NEWSDESK_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the API base URL, e.g. <https://cms.example.com>.
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Post management (list/get/create/update/delete)
    Posts(PostsArgs),
    /// Interactive session over the posts table.
    Console,
}

#[derive(Debug, Args, Clone)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Debug, Subcommand, Clone)]
pub enum PostsCmd {
    /// Render the posts table (up to the configured limit, every status)
    List {
        /// Print the raw records as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Print the full record of a post
    Get { id: String },
    /// Create a post
    Create(PostFieldArgs),
    /// Update a post; fields left out keep their current values
    Update {
        id: String,
        #[command(flatten)]
        fields: PostFieldArgs,
    },
    /// Delete a post after confirmation
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args, Default, Clone)]
pub struct PostFieldArgs {
    #[arg(long)]
    pub title: Option<String>,
    /// draft, published, or any status the API understands.
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub slug: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub excerpt: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    /// Read the content from a file (takes precedence over --content).
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub content_file: Option<PathBuf>,
    /// Comma separated tag list; an empty string clears the tags.
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long)]
    pub featured_image: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub meta_title: Option<String>,
    #[arg(long)]
    pub meta_description: Option<String>,
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub news: Option<bool>,
    /// RFC 3339 publish time.
    #[arg(long)]
    pub published_at: Option<String>,
}
