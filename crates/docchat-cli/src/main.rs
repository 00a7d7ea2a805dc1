mod config;
mod repl;
mod upload;

use clap::{Parser, Subcommand};
use docchat_client::{DocumentApi, HttpDocumentApi, UploadFile};
use docchat_core::{ClientConfig, DocumentId, Route};
use docchat_session::{ConversationManager, UploadSession};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docchat", about = "docchat: ask questions about an uploaded document")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the document service (overrides config and environment)
    #[arg(long)]
    api_base_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a document and start chatting with it
    Upload {
        file: PathBuf,
        /// Print the document id and exit instead of opening the chat
        #[arg(long)]
        no_chat: bool,
    },
    /// Open the chat for an already uploaded document
    Chat { document_id: String },
    /// Navigate to a client address: `/` or `/chat/<document_id>`
    Open { address: String },
    /// List documents held by the service
    Documents,
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);
    let _ = dotenvy::dotenv();

    let explicit = cli.config.is_some();
    let path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_FILE));
    let config = config::apply_overrides(
        config::load_file(&path, explicit).await?,
        std::env::var(config::ENV_API_BASE_URL).ok(),
        cli.api_base_url,
    )?;
    info!(api_base_url = %config.api_base_url, "Using document service");

    match cli.command {
        Commands::Upload { file, no_chat } => {
            let route = upload(&config, &file).await?;
            if no_chat {
                if let Route::Chat { document_id } = &route {
                    println!("{document_id}");
                }
                return Ok(());
            }
            navigate(&config, route).await?;
        }
        Commands::Chat { document_id } => {
            navigate(&config, Route::chat(DocumentId::new(document_id)?)).await?;
        }
        Commands::Open { address } => {
            navigate(&config, Route::parse(&address)?).await?;
        }
        Commands::Documents => {
            let api = HttpDocumentApi::new(config)?;
            let documents = api.list_documents().await?;
            if documents.is_empty() {
                println!("No documents uploaded.");
            } else {
                for doc in &documents {
                    println!("  {}  {}", doc.document_id, doc.file_name);
                }
                println!("\nTotal: {} document(s)", documents.len());
            }
        }
    }

    Ok(())
}

/// Shows the view for `route`, following the upload → chat handoff.
/// Both views read from one stdin reader so piped input survives the handoff.
async fn navigate(config: &ClientConfig, mut route: Route) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match route {
            Route::Upload => {
                let session = UploadSession::connect(config)?;
                match upload::upload_prompt(&session, &mut lines).await? {
                    Some(next) => route = next,
                    None => return Ok(()),
                }
            }
            Route::Chat { document_id } => {
                let manager = ConversationManager::connect(config, document_id)?;
                return repl::run_chat(manager, &mut lines).await;
            }
        }
    }
}

/// Single upload attempt with a progress line on stderr.
async fn upload(config: &ClientConfig, path: &std::path::Path) -> anyhow::Result<Route> {
    let file = UploadFile::from_path(path).await?;
    let session = UploadSession::connect(config)?;
    Ok(upload::submit_with_progress(&session, file, &mut std::io::stderr()).await?)
}
