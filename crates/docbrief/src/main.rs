use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docbrief_common::{logger, AppConfig, DocBriefError};
use docbrief_extract::{extract_text, DocumentKind};
use docbrief_llm::{DocumentPipeline, Operation};
use std::path::{Path, PathBuf};

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
            return;
        }
    }
    dotenv::dotenv().ok();
}

#[derive(Parser)]
#[command(name = "docbrief")]
#[command(about = "docbrief - PDF summarization and question answering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },

    /// Summarize a local PDF or text file
    Summarize {
        /// Document to summarize
        file: PathBuf,
    },

    /// Answer a question about a local PDF or text file
    Ask {
        /// Document to use as context
        file: PathBuf,

        /// Question to answer
        #[arg(short, long)]
        question: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_project_root();
    let mut config = AppConfig::from_env()?;

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.server_host = host;
            }
            if let Some(port) = port {
                config.server_port = port;
            }
            serve(config).await?;
        }
        None => serve(config).await?,
        Some(Commands::Summarize { file }) => {
            logger::setup_console_logging(&config.log_level)?;
            let output = run_once(&config, &file, Operation::Summarize).await?;
            println!("{}", output);
        }
        Some(Commands::Ask { file, question }) => {
            logger::setup_console_logging(&config.log_level)?;
            let output = run_once(&config, &file, Operation::answer(question)).await?;
            println!("{}", output);
        }
    }

    Ok(())
}

async fn serve(config: AppConfig) -> Result<()> {
    config.validate()?;
    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("docbrief starting...");
    tracing::info!("Configuration loaded: {:?}", config);

    println!("Server listening on http://{}", config.server_bind_address());

    docbrief_server::start_server(config).await?;
    Ok(())
}

/// Extract a local document and run one pipeline invocation on it
async fn run_once(config: &AppConfig, file: &Path, operation: Operation) -> Result<String> {
    config.validate()?;

    let kind = DocumentKind::from_path(file)
        .with_context(|| format!("Unsupported file type: {}", file.display()))?;
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let document = tokio::task::spawn_blocking(move || extract_text(&bytes, kind)).await??;
    if document.is_empty() {
        return Err(DocBriefError::validation("No text could be extracted from the document").into());
    }
    tracing::info!(
        "Loaded {} - Characters: {}",
        file.display(),
        document.char_count
    );

    let pipeline = DocumentPipeline::from_config(config)?;
    let output = pipeline.process(&document.text, &operation).await?;
    Ok(output.trim().to_string())
}
