//! Posts administration: the data-access store, the editor view and the
//! collaborator seams they talk through.

pub mod api;
pub mod editor;
pub mod notify;
pub mod progress;
pub mod prompt;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiError, PostsApi};
pub use editor::{DialogState, EditorSettings, PostsEditor};
pub use notify::{Notifier, Toast, ToastKind};
pub use progress::{NoProgress, PendingView, Progress};
pub use prompt::{Confirm, FixedAnswer, PostDialog};
pub use store::{DeleteOutcome, ListState, PostsStore};
