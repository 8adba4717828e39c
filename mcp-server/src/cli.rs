//! Command line and environment settings.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use shortcut_core::{Config, ConfigError, DEFAULT_BASE_URL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// MCP over stdin/stdout
    Stdio,
    /// MCP Streamable HTTP at /mcp
    Http,
}

#[derive(Debug, Parser)]
#[command(name = "shortcut-mcp")]
#[command(author, version, about = "MCP server for the Shortcut project-tracking API", long_about = None)]
pub struct Cli {
    /// Shortcut API token
    #[arg(long, env = "SHORTCUT_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Shortcut API base URL
    #[arg(long, env = "SHORTCUT_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Host address to bind to (http transport)
    #[arg(long, env = "SERVER_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on (http transport)
    #[arg(short, long, env = "SERVER_PORT", default_value = "5000")]
    pub port: u16,

    /// Per-request timeout in seconds, 0 to disable
    #[arg(long, env = "SHORTCUT_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Shorthand for --log-level debug
    #[arg(long, env = "DEBUG_MODE")]
    pub debug: bool,
}

impl Cli {
    /// Build the connection settings. A missing or blank token is rejected
    /// here, before any transport starts.
    pub fn config(&self) -> Result<Config, ConfigError> {
        let token = self.api_token.as_deref().unwrap_or_default();
        let config = Config::new(&self.base_url, token)?;
        Ok(match self.timeout_secs {
            0 => config,
            secs => config.with_timeout(Duration::from_secs(secs)),
        })
    }

    pub fn log_filter(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.log_level
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("shortcut-mcp").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "--api-token",
            "abc",
            "--transport",
            "http",
            "--port",
            "8080",
            "--timeout-secs",
            "0",
        ]);
        assert_eq!(cli.transport, Transport::Http);
        assert_eq!(cli.bind_addr().port(), 8080);

        let config = cli.config().unwrap();
        assert_eq!(config.api_token(), "abc");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn blank_token_is_config_error() {
        let cli = parse(&["--api-token", "  "]);
        assert!(matches!(cli.config(), Err(ConfigError::MissingToken)));
    }

    #[test]
    fn bad_base_url_is_config_error() {
        let cli = parse(&["--api-token", "abc", "--base-url", "not a url"]);
        assert!(matches!(
            cli.config(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn debug_flag_wins_over_log_level() {
        let cli = parse(&["--api-token", "abc", "--log-level", "warn", "--debug"]);
        assert_eq!(cli.log_filter(), "debug");
    }

    #[test]
    fn unknown_transport_is_rejected() {
        let result = Cli::try_parse_from(["shortcut-mcp", "--transport", "grpc"]);
        assert!(result.is_err());
    }
}
