//! Switchyard webhook router
//!
//! Accepts JSON webhooks, filters them by content, routes them to a
//! destination chosen from a payload field and forwards them.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use switchyard_core::{Config, LogFormat, LogLevel};
use switchyard_runtime::ProcessingPipeline;
use switchyard_server::{create_router, load_config, AppState};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Switchyard CLI
#[derive(Parser)]
#[command(name = "switchyard")]
#[command(about = "Content-aware webhook router", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SWITCHYARD_CONFIG", default_value = "config.yaml")]
    config: PathBuf,

    /// Load and validate the configuration, then exit
    #[arg(long)]
    validate_only: bool,

    /// Log level (debug, info, warning, error, critical); overrides the configuration
    #[arg(long)]
    log_level: Option<LogLevel>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(cli.log_level.unwrap_or_default(), LogFormat::Text)?;
            error!(path = %cli.config.display(), error = %e, "Configuration error");
            return Err(e.into());
        }
    };

    init_tracing(
        cli.log_level.unwrap_or(config.server.log_level),
        config.server.log_format,
    )?;

    if cli.validate_only {
        info!(path = %cli.config.display(), "Configuration is valid");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.workers)
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(serve(config))
}

async fn serve(config: Config) -> Result<()> {
    let pipeline = ProcessingPipeline::new(&config).context("Failed to build pipeline")?;
    info!(
        rules = config.filtering.rules().len(),
        routes = config.routes.len(),
        route_timeout = config.general.route_timeout,
        "Pipeline initialized"
    );

    let addr = config.server.bind_address();
    let workers = config.server.workers;
    let app = create_router(AppState::new(config, pipeline));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("✓ Server listening on http://{} ({} workers)", addr, workers);
    info!("  Webhook: POST http://{}/webhook", addr);
    info!("  Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Switchyard shut down");
    Ok(())
}

/// Initialize tracing subscriber
///
/// `RUST_LOG` takes precedence over `level`.
fn init_tracing(level: LogLevel, format: LogFormat) -> Result<()> {
    let directive = level.as_directive();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "switchyard={d},switchyard_server={d},switchyard_runtime={d},switchyard_core={d},tower_http={d}",
            d = directive
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
