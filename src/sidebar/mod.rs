//! Chat session sidebar
//!
//! [`SessionListController`] owns the session list of the signed-in user,
//! keeps it in sync with the chat API, and exposes selection, creation,
//! auto-titling and transcript download. Renderers observe it through
//! [`SessionListController::subscribe`]; the embedding application
//! receives selections through a [`SelectionHandler`] and user-facing
//! messages through a [`UserNotifier`].

pub mod controller;
pub mod render;
pub mod state;
pub mod title;
pub mod transcript;

use crate::api::ConversationMessage;
use std::path::Path;

pub use controller::{
    SessionListController, DOWNLOAD_FAILED_MESSAGE, LOAD_FAILED_MESSAGE, SELECT_SESSION_PROMPT,
};
pub use state::SidebarState;
pub use title::{derive_title, needs_auto_title, MAX_TITLE_CHARS};

/// Receives the outcome of selecting a session.
pub trait SelectionHandler: Send + Sync {
    /// Called once per selection with the session's messages, which are
    /// empty for a new session or when the history could not be loaded.
    fn on_select(&self, session_id: i64, messages: Vec<ConversationMessage>);
}

impl<F> SelectionHandler for F
where
    F: Fn(i64, Vec<ConversationMessage>) + Send + Sync,
{
    fn on_select(&self, session_id: i64, messages: Vec<ConversationMessage>) {
        self(session_id, messages)
    }
}

/// User-facing messages raised by the sidebar.
pub trait UserNotifier: Send + Sync {
    /// Non-blocking hint, e.g. a missing precondition.
    fn prompt(&self, message: &str);

    /// Blocking alert for a failed user action.
    fn alert(&self, message: &str);

    /// A downloaded resource was saved.
    fn saved(&self, _path: &Path) {}
}
