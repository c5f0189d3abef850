//! Command-line interface definition for SideChat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands that drive the session sidebar and the mail helper.

use crate::api::TranscriptFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SideChat - chat session sidebar for a remote chat API
#[derive(Parser, Debug, Clone)]
#[command(name = "sidechat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Act as this user (overrides config and SIDECHAT_USER_ID)
    #[arg(short, long, global = true)]
    pub user: Option<i64>,

    /// Chat API base URL (overrides config and SIDECHAT_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for SideChat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List the chat sessions of the current user
    Sessions {
        /// Print the sessions as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Highlight this session as the current selection
        #[arg(long)]
        current: Option<i64>,
    },

    /// Open a session and print its messages
    Open {
        /// Session identifier
        session_id: i64,
    },

    /// Create a new session and select it
    New,

    /// Derive a title for a session from its first user message
    Title {
        /// Session identifier
        session_id: i64,

        /// Last user message of the session
        #[arg(short, long)]
        message: String,
    },

    /// Download a session transcript
    Download {
        /// Session identifier
        session_id: i64,

        /// Transcript format
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: TranscriptFormat,

        /// Directory to save into (overrides sidebar.download_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Send an email through the configured SMTP relay
    Mail {
        /// Recipient address
        #[arg(long)]
        to: String,

        /// Subject line
        #[arg(long)]
        subject: String,

        /// Plain-text body
        #[arg(long)]
        body: String,

        /// Optional HTML body
        #[arg(long)]
        html: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            user: None,
            api_url: None,
            command: Commands::Sessions {
                json: false,
                current: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Sessions { json: false, .. }));
    }

    #[test]
    fn test_cli_parse_sessions_with_user() {
        let cli = Cli::try_parse_from(["sidechat", "sessions", "--user", "42", "--json"]).unwrap();
        assert_eq!(cli.user, Some(42));
        assert!(matches!(cli.command, Commands::Sessions { json: true, .. }));
    }

    #[test]
    fn test_cli_parse_download_format() {
        let cli = Cli::try_parse_from(["sidechat", "download", "5", "--format", "docx"]).unwrap();
        match cli.command {
            Commands::Download {
                session_id, format, ..
            } => {
                assert_eq!(session_id, 5);
                assert_eq!(format, TranscriptFormat::Docx);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["sidechat", "download", "5", "--format", "txt"]).is_err());
    }

    #[test]
    fn test_cli_parse_mail() {
        let cli = Cli::try_parse_from([
            "sidechat",
            "mail",
            "--to",
            "a@example.com",
            "--subject",
            "Hi",
            "--body",
            "Hello",
        ])
        .unwrap();
        match cli.command {
            Commands::Mail { to, html, .. } => {
                assert_eq!(to, "a@example.com");
                assert!(html.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
