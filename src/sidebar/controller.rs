//! Session list synchronization and selection.

use crate::api::{
    ApiError, ChatApi, ConversationMessage, TranscriptFormat, DEFAULT_SESSION_TITLE,
};
use crate::error::SideChatError;
use crate::sidebar::state::SidebarState;
use crate::sidebar::title::{derive_title, needs_auto_title};
use crate::sidebar::transcript::save_transcript;
use crate::sidebar::{SelectionHandler, UserNotifier};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Inline message shown when the session list cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load chat sessions.";

/// Prompt shown when a download is requested without a selection.
pub const SELECT_SESSION_PROMPT: &str = "Please select a chat session first.";

/// Alert shown when a transcript download fails.
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download chat history.";

struct Inner {
    state: SidebarState,
    user_id: Option<i64>,
    api: Arc<dyn ChatApi>,
    // At most one outstanding list fetch per controller.
    inflight: Option<CancellationToken>,
}

/// Owns the session list of the current user.
///
/// All remote failures are handled here; no operation returns an error.
/// Only the most recently issued list fetch may update the list: starting
/// a fetch cancels the previous one, and a cancelled fetch never touches
/// `sessions` or `error`.
///
/// # Example
///
/// ```rust,no_run
/// use sidechat::api::{ChatApiConfig, ConversationMessage, HttpChatApi};
/// use sidechat::sidebar::{SessionListController, UserNotifier};
/// use std::sync::Arc;
///
/// struct Quiet;
///
/// impl UserNotifier for Quiet {
///     fn prompt(&self, _message: &str) {}
///     fn alert(&self, _message: &str) {}
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api = HttpChatApi::new(ChatApiConfig {
///         base_url: "http://localhost:8000".to_string(),
///         token: None,
///         timeout_secs: 30,
///     })?;
///     let controller = SessionListController::new(
///         Arc::new(api),
///         Some(42),
///         Arc::new(|id: i64, messages: Vec<ConversationMessage>| {
///             println!("{}: {} messages", id, messages.len())
///         }),
///         Arc::new(Quiet),
///         std::env::temp_dir(),
///     );
///     controller.mount().await;
///     println!("{} sessions", controller.state().await.sessions.len());
///     Ok(())
/// }
/// ```
pub struct SessionListController {
    inner: Mutex<Inner>,
    state_tx: watch::Sender<SidebarState>,
    selection: Arc<dyn SelectionHandler>,
    notifier: Arc<dyn UserNotifier>,
    download_dir: PathBuf,
}

impl SessionListController {
    /// Creates a controller. Nothing is fetched until [`mount`](Self::mount).
    pub fn new(
        api: Arc<dyn ChatApi>,
        user_id: Option<i64>,
        selection: Arc<dyn SelectionHandler>,
        notifier: Arc<dyn UserNotifier>,
        download_dir: PathBuf,
    ) -> Self {
        let (state_tx, _) = watch::channel(SidebarState::default());
        Self {
            inner: Mutex::new(Inner {
                state: SidebarState::default(),
                user_id,
                api,
                inflight: None,
            }),
            state_tx,
            selection,
            notifier,
            download_dir,
        }
    }

    /// Subscribes to state snapshots; one is published after every change.
    pub fn subscribe(&self) -> watch::Receiver<SidebarState> {
        self.state_tx.subscribe()
    }

    /// Current state snapshot.
    pub async fn state(&self) -> SidebarState {
        self.inner.lock().await.state.clone()
    }

    /// Current user identity.
    pub async fn user_id(&self) -> Option<i64> {
        self.inner.lock().await.user_id
    }

    fn publish(&self, state: &SidebarState) {
        self.state_tx.send_replace(state.clone());
    }

    async fn api(&self) -> Arc<dyn ChatApi> {
        Arc::clone(&self.inner.lock().await.api)
    }

    /// Initial synchronization with the backend.
    pub async fn mount(&self) {
        info!("Mounting session list");
        self.fetch_sessions().await;
    }

    /// Cancels any outstanding fetch and discards the list.
    pub async fn unmount(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(token) = inner.inflight.take() {
            token.cancel();
        }
        inner.state.sessions.clear();
        inner.state.loading = false;
        self.publish(&inner.state);
        info!("Unmounted session list");
    }

    /// Switches the signed-in user; a change triggers a full refresh.
    ///
    /// Signing out cancels any outstanding fetch and clears the list.
    pub async fn set_user(&self, user_id: Option<i64>) {
        {
            let mut inner = self.inner.lock().await;
            if inner.user_id == user_id {
                return;
            }
            info!(?user_id, "User identity changed");
            inner.user_id = user_id;

            if user_id.is_none() {
                if let Some(token) = inner.inflight.take() {
                    token.cancel();
                }
                inner.state.sessions.clear();
                inner.state.error = None;
                inner.state.loading = false;
                self.publish(&inner.state);
                return;
            }
        }
        self.fetch_sessions().await;
    }

    /// Swaps the API client used by every later request.
    ///
    /// The client is always replaced, so a rebuilt client with fresh
    /// credentials takes effect immediately. Only a different base URL
    /// triggers a full refresh.
    pub async fn set_api(&self, api: Arc<dyn ChatApi>) {
        {
            let mut inner = self.inner.lock().await;
            let base_url_changed = inner.api.base_url() != api.base_url();
            inner.api = api;
            if !base_url_changed {
                debug!("Chat API client replaced, base URL unchanged");
                return;
            }
            info!(base_url = %inner.api.base_url(), "Chat API base URL changed");
        }
        self.fetch_sessions().await;
    }

    /// Flips the display-only expanded flag and returns its new value.
    pub async fn toggle_expanded(&self) -> bool {
        let mut inner = self.inner.lock().await;
        inner.state.expanded = !inner.state.expanded;
        self.publish(&inner.state);
        inner.state.expanded
    }

    /// Replaces the session list with the backend's.
    ///
    /// No-op without a signed-in user. Cancels the previous fetch of this
    /// controller, if still outstanding.
    pub async fn fetch_sessions(&self) {
        let (api, user_id, token) = {
            let mut inner = self.inner.lock().await;
            let Some(user_id) = inner.user_id else {
                debug!("No user identity, skipping session fetch");
                return;
            };
            if let Some(previous) = inner.inflight.take() {
                previous.cancel();
            }
            let token = CancellationToken::new();
            inner.inflight = Some(token.clone());
            inner.state.loading = true;
            self.publish(&inner.state);
            (Arc::clone(&inner.api), user_id, token)
        };

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(ApiError::Cancelled),
            result = api.list_sessions(user_id) => result,
        };

        let mut inner = self.inner.lock().await;
        // A response that lost the race with a newer fetch is discarded.
        let result = if token.is_cancelled() {
            Err(ApiError::Cancelled)
        } else {
            result
        };

        match result {
            Ok(sessions) => {
                debug!(user_id, count = sessions.len(), "Loaded chat sessions");
                inner.state.sessions = sessions;
                inner.state.error = None;
                inner.inflight = None;
            }
            Err(e) if e.is_cancelled() => {
                debug!(user_id, "Session fetch superseded");
            }
            Err(e) => {
                error!(user_id, error = %e, "Failed to load chat sessions");
                inner.state.error = Some(LOAD_FAILED_MESSAGE.to_string());
                inner.state.sessions.clear();
                inner.inflight = None;
            }
        }
        inner.state.loading = false;
        self.publish(&inner.state);
    }

    /// Titles an untitled session after its first user message.
    ///
    /// Fires only when both inputs are present and the matching session's
    /// title is absent, empty or the default. The local copy is updated
    /// before the remote patch is sent; a failed patch is only logged.
    /// Returns the applied title.
    pub async fn apply_auto_title(
        &self,
        last_user_message: Option<&str>,
        current_session_id: Option<i64>,
    ) -> Option<String> {
        let message = last_user_message.filter(|m| !m.is_empty())?;
        let session_id = current_session_id?;

        let (api, title) = {
            let mut inner = self.inner.lock().await;
            let session = inner
                .state
                .sessions
                .iter_mut()
                .find(|s| s.session_id == session_id)?;
            if !needs_auto_title(session.title.as_deref()) {
                return None;
            }
            let title = derive_title(message);
            session.title = Some(title.clone());
            self.publish(&inner.state);
            (Arc::clone(&inner.api), title)
        };

        debug!(session_id, title = %title, "Applied automatic title");
        if let Err(e) = api.update_title(session_id, &title).await {
            warn!(session_id, error = %e, "Failed to update session title");
        }
        Some(title)
    }

    /// Loads a session's messages and hands them to the selection handler.
    ///
    /// The handler is called exactly once; if the history cannot be
    /// fetched it receives an empty conversation.
    pub async fn select_session(&self, session_id: i64) {
        let api = self.api().await;
        let messages = match api.list_messages(session_id).await {
            Ok(records) => records
                .into_iter()
                .map(ConversationMessage::from)
                .collect(),
            Err(e) => {
                warn!(session_id, error = %e, "Failed to load session messages");
                Vec::new()
            }
        };
        self.selection.on_select(session_id, messages);
    }

    /// Creates a session titled "New Chat", refreshes the list and selects
    /// the new session with an empty conversation.
    ///
    /// No-op without a signed-in user. Returns the new session id.
    pub async fn create_session(&self) -> Option<i64> {
        let (api, user_id) = {
            let mut inner = self.inner.lock().await;
            let Some(user_id) = inner.user_id else {
                debug!("No user identity, skipping session creation");
                return None;
            };
            inner.state.creating = true;
            self.publish(&inner.state);
            (Arc::clone(&inner.api), user_id)
        };

        let created = match api.create_session(user_id, DEFAULT_SESSION_TITLE).await {
            Ok(session_id) => Some(session_id),
            Err(e) => {
                error!(user_id, error = %e, "Failed to create chat session");
                None
            }
        };

        if let Some(session_id) = created {
            self.fetch_sessions().await;
            self.selection.on_select(session_id, Vec::new());
        }

        let mut inner = self.inner.lock().await;
        inner.state.creating = false;
        self.publish(&inner.state);
        created
    }

    /// Downloads the current session's transcript into the download
    /// directory and returns the saved path.
    ///
    /// Without a selection the user is prompted and nothing is requested.
    /// Failures raise an alert.
    pub async fn download_transcript(
        &self,
        current_session_id: Option<i64>,
        format: TranscriptFormat,
    ) -> Option<PathBuf> {
        let Some(session_id) = current_session_id else {
            self.notifier.prompt(SELECT_SESSION_PROMPT);
            return None;
        };

        match self.fetch_transcript(session_id, format).await {
            Ok(path) => {
                info!(session_id, path = %path.display(), "Saved transcript");
                self.notifier.saved(&path);
                Some(path)
            }
            Err(e) => {
                error!(session_id, %format, error = %e, "Failed to download transcript");
                self.notifier.alert(DOWNLOAD_FAILED_MESSAGE);
                None
            }
        }
    }

    async fn fetch_transcript(
        &self,
        session_id: i64,
        format: TranscriptFormat,
    ) -> Result<PathBuf, SideChatError> {
        let api = self.api().await;
        let contents = api.download_transcript(session_id, format).await?;
        save_transcript(&self.download_dir, session_id, format, &contents).await
    }
}

impl Drop for SessionListController {
    fn drop(&mut self) {
        if let Some(token) = self.inner.get_mut().inflight.take() {
            token.cancel();
        }
    }
}
