// ABOUTME: Chat gateway server binary with operational subcommands
// ABOUTME: Serves HTTP, generates the signing secret or creates the database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! # Chat Gateway Binary
//!
//! `chat-gateway` with no subcommand starts the HTTP server.

use anyhow::Result;
use chat_gateway::{
    config::{
        environment::{load_dotenv, ServerConfig},
        secret::{write_secret, SecretWriteOutcome},
    },
    constants::{defaults, env_config},
    database::Database,
    llm::{openai::OpenAiCompletionClient, CompletionClient},
    logging,
    resources::ServerResources,
    server,
};
use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "chat-gateway")]
#[command(about = "Chat Gateway - authenticated relay to a text-completion API")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Override HTTP port
        #[arg(long)]
        http_port: Option<u16>,
    },
    /// Write a fresh signing secret into the .env file
    CreateSecret {
        /// Replace an existing secret
        #[arg(long)]
        overwrite: bool,
    },
    /// Create the database file and tables, then exit
    CreateDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    // Logging settings may live in the same .env file as the server config
    let dotenv = load_dotenv(Path::new(defaults::DOTENV_FILE));
    logging::init_from_env()?;
    match dotenv {
        Ok(true) => info!("Loaded environment from {}", defaults::DOTENV_FILE),
        Ok(false) => info!("No {} file found, using process environment", defaults::DOTENV_FILE),
        Err(e) => {
            error!("{e:#}");
            return Err(e);
        }
    }

    match args.command.unwrap_or(Command::Serve { http_port: None }) {
        Command::Serve { http_port } => serve(http_port).await,
        Command::CreateSecret { overwrite } => create_secret(overwrite),
        Command::CreateDb => create_db().await,
    }
}

async fn serve(http_port: Option<u16>) -> Result<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = http_port {
        config.http_port = http_port;
    }

    info!("Starting Chat Gateway");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url).await?;
    let completion_client: Arc<dyn CompletionClient> =
        Arc::new(OpenAiCompletionClient::new(config.completion.clone())?);
    info!(
        "Completion client ready (default model: {})",
        completion_client.default_model()
    );

    display_available_endpoints(&config);

    let resources = Arc::new(ServerResources::new(database, completion_client, config));
    if let Err(e) = server::run(resources).await {
        error!("Server error: {e:#}");
        return Err(e);
    }
    Ok(())
}

fn create_secret(overwrite: bool) -> Result<()> {
    let path = Path::new(defaults::DOTENV_FILE);
    match write_secret(path, overwrite)? {
        SecretWriteOutcome::Created => info!("Wrote {} to {}", env_config::SECRET, path.display()),
        SecretWriteOutcome::Replaced => {
            info!("Replaced {} in {}", env_config::SECRET, path.display());
        }
        SecretWriteOutcome::Kept => info!(
            "{} already present in {}; pass --overwrite to replace it",
            env_config::SECRET,
            path.display()
        ),
    }
    Ok(())
}

async fn create_db() -> Result<()> {
    let config = ServerConfig::from_env()?;
    Database::new(&config.database.url).await?;
    info!("Database created at {}", config.database.url);
    Ok(())
}

#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(config: &ServerConfig) {
    let host = &config.host;
    let port = config.http_port;
    info!("=== Available API Endpoints ===");
    info!("   User Registration: POST http://{host}:{port}/create_user");
    info!(
        "   User Login:        POST http://{host}:{port}{}",
        config.auth.token_url
    );
    info!("   Chat Message:      POST http://{host}:{port}/chat-message");
    info!("   Health Check:      GET  http://{host}:{port}/health");
    info!("   Readiness:         GET  http://{host}:{port}/ready");
    info!("=== End of Endpoint List ===");
}
