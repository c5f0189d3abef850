//! Chat API access
//!
//! The sidebar talks to the remote chat service only through the
//! [`ChatApi`] trait. [`HttpChatApi`] is the reqwest implementation;
//! tests substitute their own.
//!
//! # Endpoints
//!
//! - `GET /chat/sessions/{user_id}`: sessions of a user
//! - `GET /chat/messages/{session_id}`: message history of a session
//! - `POST /chat/session`: create a session (multipart `user_id`, `title`)
//! - `PATCH /chat/session/{session_id}`: rename a session
//! - `GET /chat/download/{session_id}?format=...`: transcript export

pub mod client;
pub mod types;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use client::{ChatApiConfig, HttpChatApi};
pub use types::{
    ChatSessionSummary, ConversationMessage, RemoteMessage, TranscriptFormat,
    DEFAULT_SESSION_TITLE,
};

/// Failure of a single chat API call.
///
/// `Cancelled` is the only kind the controller treats as "not an error".
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, broken body)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request was superseded by a newer one and abandoned
    #[error("Request superseded")]
    Cancelled,

    /// The server answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// The response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether this error is a superseded-request cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Network(error)
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Decode(error.to_string())
    }
}

/// Operations the sidebar needs from the chat backend.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Base URL the implementation talks to; a change of base URL
    /// means a different backend and triggers a full refresh.
    fn base_url(&self) -> &str;

    /// Lists the sessions of `user_id` in backend order.
    ///
    /// A response body that is not a JSON array yields an empty list.
    async fn list_sessions(&self, user_id: i64) -> Result<Vec<ChatSessionSummary>, ApiError>;

    /// Fetches the message history of a session.
    async fn list_messages(&self, session_id: i64) -> Result<Vec<RemoteMessage>, ApiError>;

    /// Creates a session and returns its server-assigned id.
    async fn create_session(&self, user_id: i64, title: &str) -> Result<i64, ApiError>;

    /// Replaces the title of a session.
    async fn update_title(&self, session_id: i64, title: &str) -> Result<(), ApiError>;

    /// Downloads the transcript of a session in the given format.
    async fn download_transcript(
        &self,
        session_id: i64,
        format: TranscriptFormat,
    ) -> Result<Bytes, ApiError>;
}
