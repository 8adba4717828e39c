//! shortcut-mcp binary: parse settings, build the client once, serve MCP.

use clap::Parser;
use miette::Diagnostic;
use shortcut_core::{AsyncClient, ConfigError};
use shortcut_mcp::cli::{Cli, Transport};
use shortcut_mcp::service;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Error, Diagnostic, Debug)]
enum ServerError {
    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(shortcut_mcp::config),
        help("Set SHORTCUT_API_TOKEN (or --api-token) and check SHORTCUT_API_BASE_URL.")
    )]
    Config(#[from] ConfigError),

    #[error("Server I/O error: {0}")]
    #[diagnostic(code(shortcut_mcp::io))]
    Io(#[from] std::io::Error),
}

/// Logs go to stderr; stdout carries the stdio MCP stream.
fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let config = cli.config()?;
    tracing::debug!(?config, "configuration loaded");
    let client = AsyncClient::new(config)?;

    match cli.transport {
        Transport::Stdio => service::serve_stdio(client).await?,
        Transport::Http => {
            let listener = tokio::net::TcpListener::bind(cli.bind_addr()).await?;
            service::serve_http(listener, client).await?
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_filter());
    run(cli).await?;
    Ok(())
}
