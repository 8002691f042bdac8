//! Interactive collaborators the editor delegates to.

use async_trait::async_trait;
use newsdesk_api_types::PostForm;

use super::editor::DialogState;

/// Yes/no question asked before destructive actions.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, question: &str) -> bool;
}

/// Answers every question with the same value (`--yes`, scripted runs).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

#[async_trait]
impl Confirm for FixedAnswer {
    async fn confirm(&self, _question: &str) -> bool {
        self.0
    }
}

/// The add/edit form. Returns `None` when the user cancels.
#[async_trait]
pub trait PostDialog: Send {
    async fn collect(&mut self, state: &DialogState) -> Option<PostForm>;
}
