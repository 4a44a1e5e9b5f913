use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod auth;
pub mod chat;

use crate::core::AppConfig;
use auth::AuthAction;

#[derive(Subcommand)]
enum Command {
    /// Start an interactive page automation chat session
    Chat {},
    /// Manage the stored API credential and model preference
    Auth {
        #[arg(long, value_enum)]
        action: AuthAction,

        /// The API key to store (only used with --action set)
        #[arg(long)]
        api_key: Option<String>,

        /// The model to store (only used with --action set)
        #[arg(long)]
        model: Option<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();
    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Chat {}) => {
            chat::run(&config).await?;
        }
        Some(Command::Auth {
            action,
            api_key,
            model,
        }) => {
            auth::run(&config, action, api_key, model).await?;
        }
        None => {}
    }

    Ok(())
}
