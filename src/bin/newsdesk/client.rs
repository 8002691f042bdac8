use std::sync::Arc;

use newsdesk::application::posts::{Notifier, PostsEditor, PostsStore, Progress};
use newsdesk::config::{LoadError, Settings};
use newsdesk::domain::error::DomainError;
use newsdesk::infra::error::InfraError;
use newsdesk::infra::http::{ApiClient, ClientError};
use newsdesk::presentation::views::TemplateRenderError;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to set up the API client: {0}")]
    Client(#[from] ClientError),
    #[error(transparent)]
    Render(#[from] TemplateRenderError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Failed(String),
}

impl CliError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Everything a command needs: the API adapter, resolved settings and the toast sink.
#[derive(Clone)]
pub struct Ctx {
    pub api: Arc<ApiClient>,
    pub settings: Settings,
    pub notifier: Arc<dyn Notifier>,
}

impl Ctx {
    pub fn new(settings: Settings, notifier: Arc<dyn Notifier>) -> Result<Self, CliError> {
        let api = ApiClient::from_settings(&settings.api)?;
        debug!(base = %api.base(), "api client ready");
        Ok(Self {
            api: Arc::new(api),
            settings,
            notifier,
        })
    }

    pub fn store(&self) -> PostsStore {
        PostsStore::new(
            self.api.clone(),
            self.notifier.clone(),
            self.settings.api.list_limit.get(),
        )
    }

    /// Editor whose in-flight requests are reported to `progress`.
    pub fn editor(&self, progress: Arc<dyn Progress>) -> PostsEditor {
        PostsEditor::new(
            self.store().with_progress(progress),
            self.notifier.clone(),
            self.settings.editor.clone(),
        )
    }
}
