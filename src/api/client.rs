//! reqwest-backed chat API client.
//!
//! # Example
//!
//! ```rust,no_run
//! use sidechat::api::{ChatApi, ChatApiConfig, HttpChatApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = HttpChatApi::new(ChatApiConfig {
//!         base_url: "http://localhost:8000".to_string(),
//!         token: None,
//!         timeout_secs: 30,
//!     })?;
//!     let sessions = api.list_sessions(42).await?;
//!     println!("{} sessions", sessions.len());
//!     Ok(())
//! }
//! ```

use crate::api::types::{
    ChatSessionSummary, CreateSessionResponse, RemoteMessage, TranscriptFormat,
    UpdateTitleRequest,
};
use crate::api::{ApiError, ChatApi};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, info};

/// Chat API client configuration.
#[derive(Debug, Clone)]
pub struct ChatApiConfig {
    /// Base URL of the chat API, without trailing slash
    pub base_url: String,
    /// Optional bearer token
    pub token: Option<String>,
    /// Request timeout in seconds; 0 disables the timeout
    pub timeout_secs: u64,
}

impl From<&crate::config::ApiConfig> for ChatApiConfig {
    fn from(config: &crate::config::ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            timeout_secs: config.timeout_seconds,
        }
    }
}

/// HTTP implementation of [`ChatApi`].
pub struct HttpChatApi {
    client: Client,
    config: ChatApiConfig,
}

impl HttpChatApi {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the HTTP client cannot be built.
    pub fn new(mut config: ChatApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder.build()?;

        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { client, config })
    }

    fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        let request = self.client.request(method, url);
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Server {
                status: status.as_u16(),
                message: body,
            })
        }
    }

    // Non-array bodies are treated as "nothing to show".
    async fn get_json_array<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let response = self.send(self.build_request(Method::GET, path)).await?;
        match response.json::<JsonValue>().await? {
            JsonValue::Array(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(ApiError::from))
                .collect(),
            other => {
                debug!(path = %path, kind = json_kind(&other), "Expected a JSON array");
                Ok(Vec::new())
            }
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn list_sessions(&self, user_id: i64) -> Result<Vec<ChatSessionSummary>, ApiError> {
        debug!(user_id, "Listing chat sessions");
        self.get_json_array(&format!("/chat/sessions/{}", user_id))
            .await
    }

    async fn list_messages(&self, session_id: i64) -> Result<Vec<RemoteMessage>, ApiError> {
        debug!(session_id, "Fetching chat messages");
        self.get_json_array(&format!("/chat/messages/{}", session_id))
            .await
    }

    async fn create_session(&self, user_id: i64, title: &str) -> Result<i64, ApiError> {
        let form = reqwest::multipart::Form::new()
            .text("user_id", user_id.to_string())
            .text("title", title.to_string());

        let response = self
            .send(
                self.build_request(Method::POST, "/chat/session")
                    .multipart(form),
            )
            .await?;
        let created: CreateSessionResponse = response.json().await?;
        info!(user_id, session_id = created.session_id, "Created chat session");
        Ok(created.session_id)
    }

    async fn update_title(&self, session_id: i64, title: &str) -> Result<(), ApiError> {
        self.send(
            self.build_request(Method::PATCH, &format!("/chat/session/{}", session_id))
                .json(&UpdateTitleRequest { title }),
        )
        .await?;
        debug!(session_id, title = %title, "Updated session title");
        Ok(())
    }

    async fn download_transcript(
        &self,
        session_id: i64,
        format: TranscriptFormat,
    ) -> Result<Bytes, ApiError> {
        let response = self
            .send(
                self.build_request(Method::GET, &format!("/chat/download/{}", session_id))
                    .query(&[("format", format.as_str())]),
            )
            .await?;
        Ok(response.bytes().await?)
    }
}
