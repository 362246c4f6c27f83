use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf::{
    api::{self, ApiState},
    store::BookStore,
};

/// File-backed book tracker.
#[derive(Parser)]
#[command(name = "bookshelf", about = "Track books over HTTP, persisted to a JSON file")]
struct Cli {
    /// Port to listen on. Binds all interfaces.
    #[arg(long, default_value_t = 5000, env = "BOOKSHELF_PORT")]
    port: u16,

    /// Path of the JSON storage file.
    #[arg(long, default_value = "books.json", env = "BOOKSHELF_DATA_FILE")]
    data_file: PathBuf,

    /// Destination file for CSV exports.
    #[arg(long, default_value = "books_export.csv", env = "BOOKSHELF_EXPORT_FILE")]
    export_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshelf=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let store = BookStore::new(cli.data_file);
    tracing::info!(path = %store.path().display(), "Book store ready");

    let state = Arc::new(ApiState::new(store, cli.export_file));

    let bind = format!("0.0.0.0:{}", cli.port);
    api::serve(state, &bind).await?;

    Ok(())
}
