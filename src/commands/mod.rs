/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes two top-level command modules:

- `sessions` - Drive the session sidebar (list, open, new, title, download)
- `mail`     - Send one email through the configured SMTP relay

Console implementations of the sidebar hooks live here as well: selections
are printed as conversations, prompts and alerts go to the terminal.
*/

use crate::api::{ConversationMessage, HttpChatApi};
use crate::config::Config;
use crate::error::{Result, SideChatError};
use crate::sidebar::render::render_conversation;
use crate::sidebar::{SelectionHandler, SessionListController, UserNotifier};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Prints every selected session as a conversation.
pub struct ConsoleSelection;

impl SelectionHandler for ConsoleSelection {
    fn on_select(&self, session_id: i64, messages: Vec<ConversationMessage>) {
        print!("{}", render_conversation(session_id, &messages));
    }
}

/// Writes prompts to stdout and alerts to stderr.
pub struct ConsoleNotifier;

impl UserNotifier for ConsoleNotifier {
    fn prompt(&self, message: &str) {
        println!("{}", message.yellow());
    }

    fn alert(&self, message: &str) {
        eprintln!("{}", message.red().bold());
    }

    fn saved(&self, path: &Path) {
        println!("{} {}", "Saved".green(), path.display());
    }
}

/// Builds a controller talking to the configured API as the configured user.
pub fn build_controller(config: &Config, download_dir: PathBuf) -> Result<SessionListController> {
    let api = HttpChatApi::new((&config.api).into()).map_err(SideChatError::from)?;
    Ok(SessionListController::new(
        Arc::new(api),
        config.user.user_id,
        Arc::new(ConsoleSelection),
        Arc::new(ConsoleNotifier),
        download_dir,
    ))
}

fn require_user(config: &Config) -> Result<i64> {
    config.user.user_id.ok_or_else(|| {
        eprintln!(
            "{}",
            "No user configured; pass --user or set SIDECHAT_USER_ID.".yellow()
        );
        SideChatError::MissingIdentity.into()
    })
}

// Session sidebar command handlers
pub mod sessions {
    //! Session sidebar handlers.
    //!
    //! Each handler builds a controller, drives one sidebar operation and
    //! prints the outcome. Remote failures are reported by the controller
    //! itself; handlers only fail on configuration problems.

    use super::*;
    use crate::api::TranscriptFormat;
    use crate::sidebar::render::render_sidebar;

    /// List the current user's sessions
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration
    /// * `json` - Print JSON instead of a table
    /// * `current` - Session to mark as selected
    pub async fn list(config: &Config, json: bool, current: Option<i64>) -> Result<()> {
        require_user(config)?;
        let controller = build_controller(config, config.sidebar.resolved_download_dir())?;
        controller.mount().await;
        controller.toggle_expanded().await;
        let state = controller.state().await;

        if json {
            println!("{}", serde_json::to_string_pretty(&state.sessions)?);
        } else {
            print!("{}", render_sidebar(&state, current));
        }
        Ok(())
    }

    /// Select a session and print its messages
    pub async fn open(config: &Config, session_id: i64) -> Result<()> {
        let controller = build_controller(config, config.sidebar.resolved_download_dir())?;
        controller.select_session(session_id).await;
        Ok(())
    }

    /// Create a session, refresh the list and select it
    pub async fn create(config: &Config) -> Result<()> {
        require_user(config)?;
        let controller = build_controller(config, config.sidebar.resolved_download_dir())?;
        match controller.create_session().await {
            Some(session_id) => {
                println!("{} {}", "Created session".green(), session_id);
                Ok(())
            }
            None => Err(anyhow::anyhow!("Failed to create chat session")),
        }
    }

    /// Give an untitled session a title derived from a user message
    pub async fn retitle(config: &Config, session_id: i64, message: &str) -> Result<()> {
        require_user(config)?;
        let controller = build_controller(config, config.sidebar.resolved_download_dir())?;
        controller.mount().await;

        match controller
            .apply_auto_title(Some(message), Some(session_id))
            .await
        {
            Some(title) => println!("Session {} titled \"{}\"", session_id, title),
            None => println!("Session {} keeps its title", session_id),
        }
        Ok(())
    }

    /// Download a session transcript
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration
    /// * `session_id` - Session to export
    /// * `format` - Transcript format
    /// * `output_dir` - Overrides the configured download directory
    pub async fn download(
        config: &Config,
        session_id: i64,
        format: TranscriptFormat,
        output_dir: Option<PathBuf>,
    ) -> Result<()> {
        let dir = output_dir.unwrap_or_else(|| config.sidebar.resolved_download_dir());
        let controller = build_controller(config, dir)?;
        controller
            .download_transcript(Some(session_id), format)
            .await;
        Ok(())
    }

}

/// Mail command
///
/// Sends one message through the relay configured in `mail`.
pub mod mail {
    use super::*;
    use crate::mail::Mailer;

    /// Send an email
    ///
    /// # Errors
    ///
    /// Returns error if the mail configuration is invalid or the relay
    /// rejects the message.
    pub async fn send(
        config: &Config,
        to: &str,
        subject: &str,
        body: &str,
        html: Option<&str>,
    ) -> Result<()> {
        let mailer = Mailer::new(&config.mail)?;
        let receipt = mailer.send(to, subject, body, html).await?;
        println!(
            "{} {} {}",
            "Delivered".green(),
            receipt.code,
            receipt.message
        );
        Ok(())
    }

}
