#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use agentflow::{
    AgentEnvelope, AgentRegistry, CharacterAgent, Config, DocumentStore, MemoryStore, UtilityAgent,
    handlers,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "agentflow", about = "Agent dispatch and step-plan execution engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch a request envelope read from a JSON file (or stdin).
    Run {
        /// Path to the envelope JSON; stdin when omitted.
        file: Option<PathBuf>,
    },
    /// List the registered handlers.
    Handlers,
    /// List the registered agents.
    Agents,
}

fn log_level(config: &Config) -> Level {
    match config.log_level.as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_init()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&config))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let handler_registry = Arc::new(handlers::default_registry(
        &store,
        &config.character_collection,
    ));

    let mut agents = AgentRegistry::new();
    agents.register(Box::new(CharacterAgent::new(Arc::clone(&handler_registry))));
    agents.register(Box::new(UtilityAgent::new(Arc::clone(&handler_registry))));

    match cli.command {
        Commands::Run { file } => {
            let raw = match file {
                Some(path) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    tokio::io::stdin()
                        .read_to_string(&mut buf)
                        .await
                        .context("failed to read stdin")?;
                    buf
                }
            };
            let envelope: AgentEnvelope =
                serde_json::from_str(&raw).context("invalid request envelope")?;
            let agent_name = envelope.agent_name().to_string();
            let response = agents.dispatch(&agent_name, envelope).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Handlers => {
            for spec in handler_registry.specs() {
                println!("{}.{} — {}", spec.namespace, spec.action, spec.description);
            }
        }
        Commands::Agents => {
            for name in agents.names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}
