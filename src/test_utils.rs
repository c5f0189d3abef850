//! Test utilities for SideChat
//!
//! Scriptable chat API fake and recording sidebar hooks.

use crate::api::{
    ApiError, ChatApi, ChatSessionSummary, ConversationMessage, RemoteMessage, TranscriptFormat,
};
use crate::sidebar::{SelectionHandler, UserNotifier};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted result: `Err(status)` becomes `ApiError::Server`.
pub type Scripted<T> = Result<T, u16>;

fn server_error(status: u16) -> ApiError {
    ApiError::Server {
        status,
        message: "scripted failure".to_string(),
    }
}

/// In-memory [`ChatApi`] with scripted responses and a call log.
///
/// List responses are consumed in order, each after its own delay; an
/// exhausted script answers with an empty list.
pub struct FakeChatApi {
    base_url: String,
    sessions: Mutex<VecDeque<(Duration, Scripted<Vec<ChatSessionSummary>>)>>,
    messages: Mutex<Scripted<Vec<RemoteMessage>>>,
    created: Mutex<Scripted<i64>>,
    transcript: Mutex<Scripted<Vec<u8>>>,
    fail_updates: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

impl FakeChatApi {
    /// Creates a fake reporting the given base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            sessions: Mutex::new(VecDeque::new()),
            messages: Mutex::new(Ok(Vec::new())),
            created: Mutex::new(Ok(1)),
            transcript: Mutex::new(Ok(Vec::new())),
            fail_updates: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queues the response of the next unanswered `list_sessions` call.
    pub fn push_sessions(&self, delay: Duration, result: Scripted<Vec<ChatSessionSummary>>) {
        self.sessions.lock().unwrap().push_back((delay, result));
    }

    /// Sets the response of `list_messages`.
    pub fn set_messages(&self, result: Scripted<Vec<RemoteMessage>>) {
        *self.messages.lock().unwrap() = result;
    }

    /// Sets the response of `create_session`.
    pub fn set_created(&self, result: Scripted<i64>) {
        *self.created.lock().unwrap() = result;
    }

    /// Sets the response of `download_transcript`.
    pub fn set_transcript(&self, result: Scripted<Vec<u8>>) {
        *self.transcript.lock().unwrap() = result;
    }

    /// Makes every `update_title` call fail.
    pub fn fail_updates(&self) {
        *self.fail_updates.lock().unwrap() = true;
    }

    /// Calls received so far, as `name:arg:...` strings.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatApi for FakeChatApi {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn list_sessions(&self, user_id: i64) -> Result<Vec<ChatSessionSummary>, ApiError> {
        self.record(format!("list_sessions:{}", user_id));
        let scripted = self.sessions.lock().unwrap().pop_front();
        let (delay, result) = scripted.unwrap_or((Duration::ZERO, Ok(Vec::new())));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result.map_err(server_error)
    }

    async fn list_messages(&self, session_id: i64) -> Result<Vec<RemoteMessage>, ApiError> {
        self.record(format!("list_messages:{}", session_id));
        self.messages.lock().unwrap().clone().map_err(server_error)
    }

    async fn create_session(&self, user_id: i64, title: &str) -> Result<i64, ApiError> {
        self.record(format!("create_session:{}:{}", user_id, title));
        (*self.created.lock().unwrap()).map_err(server_error)
    }

    async fn update_title(&self, session_id: i64, title: &str) -> Result<(), ApiError> {
        self.record(format!("update_title:{}:{}", session_id, title));
        if *self.fail_updates.lock().unwrap() {
            Err(server_error(500))
        } else {
            Ok(())
        }
    }

    async fn download_transcript(
        &self,
        session_id: i64,
        format: TranscriptFormat,
    ) -> Result<Bytes, ApiError> {
        self.record(format!("download_transcript:{}:{}", session_id, format));
        self.transcript
            .lock()
            .unwrap()
            .clone()
            .map(Bytes::from)
            .map_err(server_error)
    }
}

/// Records every selection.
#[derive(Default)]
pub struct RecordingSelection {
    selections: Mutex<Vec<(i64, Vec<ConversationMessage>)>>,
}

impl RecordingSelection {
    /// Selections received so far.
    pub fn selections(&self) -> Vec<(i64, Vec<ConversationMessage>)> {
        self.selections.lock().unwrap().clone()
    }
}

impl SelectionHandler for RecordingSelection {
    fn on_select(&self, session_id: i64, messages: Vec<ConversationMessage>) {
        self.selections.lock().unwrap().push((session_id, messages));
    }
}

/// Records prompts, alerts and saved paths.
#[derive(Default)]
pub struct RecordingNotifier {
    prompts: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
    saved: Mutex<Vec<PathBuf>>,
}

impl RecordingNotifier {
    /// Prompts raised so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Alerts raised so far.
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    /// Paths reported as saved.
    pub fn saved_paths(&self) -> Vec<PathBuf> {
        self.saved.lock().unwrap().clone()
    }
}

impl UserNotifier for RecordingNotifier {
    fn prompt(&self, message: &str) {
        self.prompts.lock().unwrap().push(message.to_string());
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn saved(&self, path: &Path) {
        self.saved.lock().unwrap().push(path.to_path_buf());
    }
}
