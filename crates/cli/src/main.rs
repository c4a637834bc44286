use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vidocs_core::Config;
use vidocs_http::{create_router, AppState};
use vidocs_provider::ProviderClient;
use vidocs_service::{ChatService, DocumentationService};
use vidocs_storage::SessionStore;

#[derive(Parser)]
#[command(name = "vidocs")]
#[command(about = "Video-to-documentation backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve {
        #[arg(short, long, default_value = "8000")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// List persisted sessions, newest first.
    History,
    /// Print one session record as JSON.
    Get { id: String },
}

fn get_api_key() -> Result<String> {
    std::env::var("VIDOCS_API_KEY")
        .or_else(|_| std::env::var("GOOGLE_API_KEY"))
        .map_err(|_| {
            anyhow::anyhow!("VIDOCS_API_KEY or GOOGLE_API_KEY environment variable must be set")
        })
}

fn get_base_url() -> String {
    std::env::var("VIDOCS_API_URL")
        .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string())
}

fn get_data_dir() -> PathBuf {
    std::env::var("VIDOCS_DATA_DIR").map_or_else(
        |_| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("vidocs")
        },
        PathBuf::from,
    )
}

fn build_config() -> Result<Config> {
    let mut config = Config::new(get_api_key()?, get_base_url(), get_data_dir());
    if let Ok(origins) = std::env::var("VIDOCS_ALLOWED_ORIGINS") {
        config.allowed_origins =
            origins.split(',').map(|o| o.trim().to_owned()).filter(|o| !o.is_empty()).collect();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => {
            let config = build_config()?;
            let store = SessionStore::new(&config.data_dir)?;
            let client = Arc::new(ProviderClient::new(
                config.api_key.clone(),
                config.base_url.clone(),
            )?);
            let state = Arc::new(AppState {
                docs: DocumentationService::new(
                    Arc::clone(&client),
                    store.clone(),
                    config.clone(),
                ),
                chat: ChatService::new(client, store.clone(), config.clone()),
                store,
            });
            let router = create_router(state, &config.allowed_origins);
            let addr = format!("{host}:{port}");
            tracing::info!("Starting HTTP server on {}", addr);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, router).await?;
        }
        Commands::History => {
            let store = SessionStore::new(get_data_dir())?;
            let listing = store.list_all()?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Commands::Get { id } => {
            let store = SessionStore::new(get_data_dir())?;
            let record = store.get(&id)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}
