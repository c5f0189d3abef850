//! SideChat - chat session sidebar CLI
//!
#![doc = "SideChat - chat session sidebar CLI"]
#![doc = "Main entry point for the SideChat application."]

use anyhow::Result;

use sidechat::cli::{Cli, Commands};
use sidechat::commands;
use sidechat::config::Config;
use sidechat::logging::{bootstrap_subscriber, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration; warnings go to a bootstrap subscriber until the
    // configured one is installed
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        Config::load(config_path, &cli)
    })?;

    init_logging(&config.logging)?;

    // Validate configuration (mail settings included, when present)
    config.validate()?;

    match cli.command {
        Commands::Sessions { json, current } => {
            tracing::info!("Listing chat sessions");
            commands::sessions::list(&config, json, current).await
        }
        Commands::Open { session_id } => {
            tracing::info!(session_id, "Opening chat session");
            commands::sessions::open(&config, session_id).await
        }
        Commands::New => {
            tracing::info!("Creating chat session");
            commands::sessions::create(&config).await
        }
        Commands::Title {
            session_id,
            message,
        } => {
            tracing::info!(session_id, "Deriving session title");
            commands::sessions::retitle(&config, session_id, &message).await
        }
        Commands::Download {
            session_id,
            format,
            output_dir,
        } => {
            tracing::info!(session_id, %format, "Downloading transcript");
            commands::sessions::download(&config, session_id, format, output_dir).await
        }
        Commands::Mail {
            to,
            subject,
            body,
            html,
        } => {
            tracing::info!("Sending mail");
            commands::mail::send(&config, &to, &subject, &body, html.as_deref()).await
        }
    }
}
