//! Observable sidebar state.

use crate::api::ChatSessionSummary;
use serde::Serialize;

/// Snapshot of everything a renderer needs to draw the sidebar.
///
/// The current selection is not part of this state; it belongs to the
/// embedding application and is passed into operations that need it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SidebarState {
    /// Sessions in backend order
    pub sessions: Vec<ChatSessionSummary>,
    /// A session list fetch is outstanding
    pub loading: bool,
    /// Inline error from the last failed list fetch
    pub error: Option<String>,
    /// A session creation is outstanding
    pub creating: bool,
    /// Display-only expanded/collapsed flag
    pub expanded: bool,
}

impl SidebarState {
    /// Looks up a session by id.
    pub fn session(&self, session_id: i64) -> Option<&ChatSessionSummary> {
        self.sessions.iter().find(|s| s.session_id == session_id)
    }

    /// Whether the list has nothing to show and nothing pending.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty() && !self.loading
    }
}
