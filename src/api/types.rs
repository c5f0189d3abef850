//! Wire types for the chat API.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Title the backend gives a freshly created session.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// Summary of one persisted chat session, as listed for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSessionSummary {
    /// Server-assigned identifier, immutable once assigned
    #[serde(alias = "sessionId")]
    pub session_id: i64,
    /// Short title; `None` means untitled
    #[serde(default)]
    pub title: Option<String>,
    /// Creation time, if the backend reported a parseable one
    #[serde(
        default,
        alias = "createdAt",
        deserialize_with = "deserialize_lenient_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl ChatSessionSummary {
    /// Creates an untitled summary with no timestamp.
    pub fn new(session_id: i64) -> Self {
        Self {
            session_id,
            title: None,
            created_at: None,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title for display, falling back to the default session title.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => DEFAULT_SESSION_TITLE,
        }
    }
}

/// One stored message as returned by `GET /chat/messages/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteMessage {
    /// Author role ("user", "assistant", ...)
    #[serde(default)]
    pub role: Option<String>,
    /// Message body
    #[serde(default)]
    pub content: Option<String>,
}

/// A message as handed to the selection handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationMessage {
    /// Author role
    pub role: String,
    /// Message text
    pub text: String,
}

impl From<RemoteMessage> for ConversationMessage {
    fn from(message: RemoteMessage) -> Self {
        Self {
            role: message.role.unwrap_or_default(),
            text: message.content.unwrap_or_default(),
        }
    }
}

/// Response body of `POST /chat/session`.
#[derive(Debug, Deserialize)]
pub struct CreateSessionResponse {
    /// Identifier of the created session
    pub session_id: i64,
}

/// Request body of `PATCH /chat/session/{id}`.
#[derive(Debug, Serialize)]
pub struct UpdateTitleRequest<'a> {
    /// New title
    pub title: &'a str,
}

/// Transcript export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptFormat {
    /// Portable Document Format
    Pdf,
    /// Word document
    Docx,
    /// Comma-separated values
    Csv,
}

impl TranscriptFormat {
    /// Value of the `format` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptFormat::Pdf => "pdf",
            TranscriptFormat::Docx => "docx",
            TranscriptFormat::Csv => "csv",
        }
    }

    /// File extension for a saved transcript.
    pub fn extension(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for TranscriptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses an RFC 3339 or naive (assumed UTC) timestamp.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

// An unparseable timestamp must not fail the whole session list.
fn deserialize_lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}
