use anyhow::{Context as _, Result};
use chatrelay_config::{Config, LogConfig, LogFormat};
use chatrelay_proxy::AppState;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chatrelay", about = "Chat and vision relay for hosted LLM APIs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the relay server.
    Serve {
        /// Path to the YAML configuration file.
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Override the listening port (default: 8018).
        #[arg(short, long)]
        port: Option<u16>,
        /// Override the listening address (default: 127.0.0.1).
        #[arg(long)]
        host: Option<String>,
    },
    /// Print the effective configuration as JSON (API key redacted).
    Config {
        /// Path to the YAML configuration file.
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, port, host } => cmd_serve(config, port, host).await,
        Commands::Config { config } => cmd_config(config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = Config::load(path).map_err(|e| anyhow::anyhow!("config error: {e}"))?;
    config.validate()?;
    Ok(config)
}

/// Installs the global subscriber. `RUST_LOG` wins over `log.level`.
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.compact().init(),
    }
}

async fn cmd_serve(
    config_path: Option<PathBuf>,
    port: Option<u16>,
    host: Option<String>,
) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;

    if let Some(p) = port {
        config.port = p;
    }
    if let Some(h) = host {
        config.host = h;
    }

    init_tracing(&config.log);

    let addr = format!("{}:{}", config.host, config.port);
    let path = config.path.clone();
    tracing::info!(
        endpoint = %config.provider.endpoint,
        base_url = %config.provider.base_url,
        text_model = %config.provider.text_model,
        vision_model = %config.provider.vision_model,
        "provider configured"
    );

    let state = AppState::from_config(config);
    let app = chatrelay_proxy::make_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("chatrelay listening on http://{addr}{path}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn cmd_config(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let credential = if config.provider.credentials_from_env().is_some() {
        "configured"
    } else {
        "missing"
    };
    println!("{}", serde_json::to_string_pretty(&config.redacted())?);
    eprintln!("credential: {credential}");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
