// src/main.rs
// Hospital triage recommender - HTTP service and CLI

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use triage::config::{EnvConfig, log_level_from_env};
use triage::triage::{TriageResponse, TriageService};
use triage::web::{self, state::AppState};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Recommend a hospital department from patient symptoms")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve {
        /// Address to bind
        #[arg(long, env = "TRIAGE_HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "TRIAGE_PORT")]
        port: Option<u16>,
    },

    /// Print the configuration report and exit
    CheckConfig,

    /// One-shot recommendation from the command line
    Recommend {
        #[arg(long)]
        gender: String,

        #[arg(long, allow_negative_numbers = true)]
        age: i64,

        /// Repeat for each symptom
        #[arg(long = "symptom", required = true)]
        symptoms: Vec<String>,
    },
}

fn build_service(config: &EnvConfig) -> Result<TriageService> {
    let client = config
        .gemini_client()
        .context("Cannot build Gemini client")?;
    Ok(TriageService::new(Arc::new(client), config.service_options()))
}

/// Refuse to start on configuration errors; surface warnings in the log
fn ensure_valid(config: &EnvConfig) -> Result<()> {
    let validation = config.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.is_valid() {
        bail!("Invalid configuration:\n{}", validation.report());
    }
    Ok(())
}

async fn run_server(mut config: EnvConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    ensure_valid(&config)?;

    let service = build_service(&config)?;
    info!(
        model = %config.provider.model,
        response_format = ?config.triage.response_format,
        deadline_secs = config.triage.deadline.as_secs(),
        "Triage service configured"
    );

    let app = web::create_router(AppState::new(service));
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Hospital triage API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn run_check_config(config: &EnvConfig) -> Result<()> {
    let validation = config.validate();
    println!("Provider: gemini ({})", config.provider.model);
    println!("API key: {}", if config.provider.has_api_key() { "set" } else { "missing" });
    println!("Bind: {}", config.server.bind_addr());
    println!();
    println!("{}", validation.report());

    if !validation.is_valid() {
        bail!("configuration has {} error(s)", validation.errors.len());
    }
    Ok(())
}

/// Request body for the `recommend` subcommand, shaped like `POST /recommend`
fn recommend_body(gender: &str, age: i64, symptoms: &[String]) -> Value {
    json!({ "gender": gender, "age": age, "symptoms": symptoms })
}

/// Run the command-line arguments through the same pipeline as the API,
/// validation included
async fn recommend_from_args(
    service: &TriageService,
    gender: &str,
    age: i64,
    symptoms: &[String],
) -> triage::error::Result<TriageResponse> {
    service.recommend(&recommend_body(gender, age, symptoms)).await
}

async fn run_recommend(
    config: &EnvConfig,
    gender: String,
    age: i64,
    symptoms: Vec<String>,
) -> Result<()> {
    ensure_valid(config)?;
    let service = build_service(config)?;

    let response = recommend_from_args(&service, &gender, age, &symptoms).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level_from_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = EnvConfig::load();

    match cli.command {
        None => run_server(config, None, None).await,
        Some(Commands::Serve { host, port }) => run_server(config, host, port).await,
        Some(Commands::CheckConfig) => run_check_config(&config),
        Some(Commands::Recommend {
            gender,
            age,
            symptoms,
        }) => run_recommend(&config, gender, age, symptoms).await,
    }
}
