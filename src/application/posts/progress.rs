//! Hook for showing work that is still in flight.

use std::collections::HashSet;

use super::store::ListState;

/// State of the table while a request is pending: the list is `Loading`
/// during a list fetch, and `loading_rows` names rows whose full record is
/// being fetched.
#[derive(Debug, Clone, Copy)]
pub struct PendingView<'a> {
    pub list: ListState<'a>,
    pub loading_rows: &'a HashSet<String>,
}

impl PendingView<'_> {
    pub fn is_row_loading(&self, id: &str) -> bool {
        self.loading_rows.contains(id)
    }
}

/// Called right before the store or editor awaits a request.
pub trait Progress: Send + Sync {
    fn pending(&self, view: PendingView<'_>);
}

/// Shows nothing; one-shot commands print only their result.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn pending(&self, _view: PendingView<'_>) {}
}
