//! SideChat - chat session sidebar library
//!
//! This library keeps a chat-session sidebar in sync with a remote chat API
//! and provides a small outbound mail helper.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: Chat API abstraction, wire types and the reqwest client
//! - `sidebar`: Session list controller, observable state and rendering
//! - `mail`: SMTP mail helper
//! - `config`: Configuration management and validation
//! - `logging`: Tracing subscriber setup
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use sidechat::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod mail;
pub mod sidebar;

// Re-export commonly used types
pub use api::{ApiError, ChatApi, ChatSessionSummary, HttpChatApi, TranscriptFormat};
pub use config::Config;
pub use error::{Result, SideChatError};
pub use mail::{DeliveryReceipt, Mailer};
pub use sidebar::{SessionListController, SidebarState};

#[cfg(test)]
pub mod test_utils;
