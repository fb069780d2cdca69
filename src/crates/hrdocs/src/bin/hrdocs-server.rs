//! hrdocs server binary
//!
//! REST API for HR document tasks, streamed task execution and goal breakdown.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use llm::remote::OpenAiClient;
use llm::RemoteLlmConfig;

use hrdocs::api::{create_router, AppState};
use hrdocs::breakdown::BreakdownPlanner;
use hrdocs::config::ServerConfig;
use hrdocs::db::DatabaseConnection;
use hrdocs::execution::TaskExecutionService;
use hrdocs::generation::LlmDocumentWriter;
use hrdocs::notify::{DisabledDispatcher, NotificationDispatcher, ResendDispatcher};
use hrdocs::DocumentOrchestrator;

#[derive(Debug, Parser)]
#[command(name = "hrdocs-server", version, about = "HR document task server")]
struct Args {
    /// Configuration file (defaults to CONFIG_PATH, then config/hrdocs-server.toml)
    #[arg(long, env = "CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Bind host, overrides [server].host
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Bind port, overrides [server].port
    #[arg(long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing/logging
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(rust_log).init();

    let args = Args::parse();

    tracing::info!("Loading server configuration...");
    let config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::load().context("loading configuration")?,
    };

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", host, port))?;

    // Database
    let database_url = config.database_url();
    tracing::info!("Connecting to database: {}", database_url);
    let db = DatabaseConnection::new(&database_url, config.database.max_connections)
        .await
        .context("opening database")?;

    tracing::info!("Running database migrations");
    db.run_migrations().await.context("running migrations")?;
    db.health_check().await.context("database health check")?;

    // Model client
    let mut llm_config =
        RemoteLlmConfig::from_env(&config.llm.api_key_env, &config.llm.base_url, &config.llm.model)
            .with_context(|| format!("reading API key from {}", config.llm.api_key_env))?
            .with_timeout(Duration::from_secs(config.llm.timeout_secs));
    if let Some(temperature) = config.llm.temperature {
        llm_config = llm_config.with_temperature(temperature);
    }
    let model = Arc::new(OpenAiClient::new(llm_config).context("building model client")?);
    tracing::info!("Model: {}", model.model());

    // Email
    let notifier = build_notifier(&config);

    let prompts = Arc::new(config.prompt_templates());
    let writer = Arc::new(LlmDocumentWriter::new(model.clone(), prompts.clone()));
    let orchestrator = DocumentOrchestrator::new(db.clone(), writer, notifier)
        .with_generation_timeout(config.generation.timeout());

    let app_state = AppState {
        db: db.clone(),
        orchestrator,
        executor: Arc::new(TaskExecutionService::new(model.clone(), prompts.clone())),
        planner: Arc::new(BreakdownPlanner::new(model, prompts)),
    };

    tracing::info!("Building API router");
    let app = create_router(app_state);

    tracing::info!("Starting {} on {}", config.server.name, addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("hrdocs server shut down gracefully");

    Ok(())
}

fn build_notifier(config: &ServerConfig) -> Arc<dyn NotificationDispatcher> {
    if !config.email.enabled {
        tracing::info!("Email notifications disabled");
        return Arc::new(DisabledDispatcher);
    }

    let Ok(api_key) = std::env::var(&config.email.api_key_env) else {
        tracing::warn!(
            "{} not set, email notifications disabled",
            config.email.api_key_env
        );
        return Arc::new(DisabledDispatcher);
    };

    match ResendDispatcher::new(&config.email.api_url, api_key, &config.email.from) {
        Ok(dispatcher) => Arc::new(dispatcher),
        Err(e) => {
            tracing::warn!("Email client setup failed: {}. Notifications disabled.", e);
            Arc::new(DisabledDispatcher)
        }
    }
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for CTRL-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
