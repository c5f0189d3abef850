//! Configuration management for SideChat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, SideChatError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure for SideChat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat API connection settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Signed-in user identity
    #[serde(default)]
    pub user: UserConfig,
    /// Sidebar behavior
    #[serde(default)]
    pub sidebar: SidebarConfig,
    /// Outbound mail settings
    #[serde(default)]
    pub mail: MailConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat API connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the chat API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional bearer token issued by the authentication provider
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout (seconds); 0 waits indefinitely
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_seconds: default_api_timeout(),
        }
    }
}

/// Identity of the signed-in user
///
/// An absent `user_id` means nobody is signed in; session operations
/// that need a user become no-ops.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Backend user identifier
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Sidebar configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SidebarConfig {
    /// Directory transcripts are saved into
    ///
    /// Defaults to the platform download directory, then the current
    /// working directory.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

impl SidebarConfig {
    /// Directory downloaded transcripts are written to.
    pub fn resolved_download_dir(&self) -> PathBuf {
        if let Some(dir) = &self.download_dir {
            return dir.clone();
        }
        directories::UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Outbound SMTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// SMTP relay host
    #[serde(default)]
    pub host: String,

    /// SMTP port
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// SMTP username
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password
    #[serde(default)]
    pub password: Option<String>,

    /// Envelope and header sender address
    #[serde(default)]
    pub from_address: String,

    /// Display name for the sender
    #[serde(default)]
    pub from_name: Option<String>,

    /// Transport security; derived from the port when unset
    #[serde(default)]
    pub tls: Option<MailTls>,
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTls {
    /// TLS from the first byte (SMTPS, usually port 465)
    Implicit,
    /// Plain connection upgraded with a mandatory STARTTLS
    Starttls,
    /// STARTTLS when the relay offers it, plain otherwise
    Opportunistic,
    /// No TLS; only for local development relays
    Plain,
}

impl MailTls {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "implicit" => Some(MailTls::Implicit),
            "starttls" => Some(MailTls::Starttls),
            "opportunistic" => Some(MailTls::Opportunistic),
            "plain" | "none" => Some(MailTls::Plain),
            _ => None,
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_smtp_port(),
            username: None,
            password: None,
            from_address: String::new(),
            from_name: None,
            tls: None,
        }
    }
}

impl MailConfig {
    /// Effective transport security: the configured mode, else implicit TLS
    /// on port 465 and mandatory STARTTLS anywhere else.
    pub fn tls_mode(&self) -> MailTls {
        match self.tls {
            Some(tls) => tls,
            None if self.port == 465 => MailTls::Implicit,
            None => MailTls::Starttls,
        }
    }

    /// Whether any mail setting has been provided.
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty() || !self.from_address.is_empty() || self.username.is_some()
    }

    /// Validate the mail configuration
    ///
    /// # Errors
    ///
    /// Returns error if the host or sender is missing, the port is zero,
    /// the sender is not a valid address, or only one of username and
    /// password is set.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(SideChatError::Config("mail.host cannot be empty".to_string()).into());
        }

        if self.port == 0 {
            return Err(
                SideChatError::Config("mail.port must be greater than 0".to_string()).into(),
            );
        }

        if self.from_address.is_empty() {
            return Err(
                SideChatError::Config("mail.from_address cannot be empty".to_string()).into(),
            );
        }

        if let Err(e) = self.from_address.parse::<lettre::Address>() {
            return Err(SideChatError::Config(format!(
                "mail.from_address is not a valid address: {}",
                e
            ))
            .into());
        }

        if self.username.is_some() != self.password.is_some() {
            return Err(SideChatError::Config(
                "mail.username and mail.password must be set together".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_format: bool,

    /// Optional file to append logs to, in addition to stderr
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SideChatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SideChatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("SIDECHAT_API_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(token) = std::env::var("SIDECHAT_API_TOKEN") {
            self.api.token = Some(token);
        }

        if let Ok(timeout) = std::env::var("SIDECHAT_API_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid SIDECHAT_API_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(user_id) = std::env::var("SIDECHAT_USER_ID") {
            if let Ok(value) = user_id.parse() {
                self.user.user_id = Some(value);
            } else {
                tracing::warn!("Invalid SIDECHAT_USER_ID: {}", user_id);
            }
        }

        if let Ok(dir) = std::env::var("SIDECHAT_DOWNLOAD_DIR") {
            self.sidebar.download_dir = Some(PathBuf::from(dir));
        }

        if let Ok(level) = std::env::var("SIDECHAT_LOG_LEVEL") {
            self.logging.level = level;
        }

        // Mail
        if let Ok(host) = std::env::var("SMTP_HOST") {
            self.mail.host = host;
        }

        if let Ok(port) = std::env::var("SMTP_PORT") {
            if let Ok(value) = port.parse() {
                self.mail.port = value;
            } else {
                tracing::warn!("Invalid SMTP_PORT: {}", port);
            }
        }

        if let Ok(user) = std::env::var("SMTP_USER") {
            self.mail.username = Some(user);
        }

        if let Ok(pass) = std::env::var("SMTP_PASS") {
            self.mail.password = Some(pass);
        }

        if let Ok(from) = std::env::var("SMTP_FROM") {
            self.mail.from_address = from;
        }

        if let Ok(name) = std::env::var("SMTP_FROM_NAME") {
            self.mail.from_name = Some(name);
        }

        if let Ok(tls) = std::env::var("SMTP_TLS") {
            match MailTls::parse(&tls) {
                Some(mode) => self.mail.tls = Some(mode),
                None => tracing::warn!("Invalid SMTP_TLS: {}", tls),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            self.logging.level = "debug".to_string();
        }

        if let Some(user_id) = cli.user {
            self.user.user_id = Some(user_id);
        }

        if let Some(api_url) = &cli.api_url {
            self.api.base_url = api_url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// Mail settings are only checked when some of them are present, so
    /// a sidebar-only deployment needs no SMTP configuration.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| {
            SideChatError::Config(format!(
                "Invalid api.base_url {}: {}",
                self.api.base_url, e
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(SideChatError::Config(format!(
                "api.base_url must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if let Some(user_id) = self.user.user_id {
            if user_id <= 0 {
                return Err(SideChatError::Config(
                    "user.user_id must be greater than 0".to_string(),
                )
                .into());
            }
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(SideChatError::Config(format!(
                "Invalid logging.level: {}. Must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            ))
            .into());
        }

        if self.mail.is_configured() {
            self.mail.validate()?;
        }

        Ok(())
    }
}
