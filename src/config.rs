//! Process configuration.
//!
//! Every setting is a CLI flag with an environment fallback. Flags win over
//! the environment; defaults apply when neither is set.

use std::fmt;

use clap::{Parser, ValueEnum};
use miette::Diagnostic;
use reqwest::Url;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    #[diagnostic(code(teamwork_mcp::config::arguments))]
    Arguments(#[from] clap::Error),

    #[error("TEAMWORK_SERVER must be an absolute http(s) URL, got {0:?}")]
    #[diagnostic(
        code(teamwork_mcp::config::server),
        help("for example https://example.teamwork.com")
    )]
    InvalidServer(String),

    #[error("TEAMWORK_API_TOKEN must not be empty")]
    #[diagnostic(code(teamwork_mcp::config::token))]
    MissingToken,
}

/// Verbosity of the crate's own logs and the HTTP trace layer.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// `EnvFilter` directives for this level.
    pub fn directives(self) -> String {
        let level = self.as_str();
        format!("teamwork_mcp={level},tower_http={level}")
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Parser)]
#[command(name = "tw-mcp")]
#[command(author, version, about = "Teamwork MCP server", long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Log verbosity
    #[arg(long, env = "LOG_LEVEL", value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Base URL of the Teamwork site
    #[arg(long, env = "TEAMWORK_SERVER")]
    server: String,

    /// Bearer token for the Teamwork API
    #[arg(long, env = "TEAMWORK_API_TOKEN", hide_env_values = true)]
    token: String,

    /// Name of an agentic backend (informational)
    #[arg(long, env = "AGENTIC_NAME")]
    agentic_name: Option<String>,

    /// Data source string for the agentic backend (informational)
    #[arg(long, env = "AGENTIC_DSN", hide_env_values = true)]
    agentic_dsn: Option<String>,

    /// Host header values accepted on /mcp (comma separated, loopback when unset)
    #[arg(long, env = "MCP_ALLOWED_HOSTS", value_delimiter = ',')]
    allowed_hosts: Vec<String>,
}

/// Validated configuration.
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: LogLevel,
    pub server: Url,
    pub token: String,
    pub agentic_name: Option<String>,
    pub agentic_dsn: Option<String>,
    pub allowed_hosts: Vec<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("server", &self.server.as_str())
            .field("token", &"<redacted>")
            .field("agentic_name", &self.agentic_name)
            .field("agentic_dsn", &self.agentic_dsn.as_ref().map(|_| "<redacted>"))
            .field("allowed_hosts", &self.allowed_hosts)
            .finish()
    }
}

impl Config {
    /// Parse the process arguments and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::try_parse_from(std::env::args_os())
    }

    /// Parse `args` (program name first) with environment fallback.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;
        Self::validate(cli)
    }

    fn validate(cli: Cli) -> Result<Self, ConfigError> {
        let server = Url::parse(&cli.server)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .ok_or_else(|| ConfigError::InvalidServer(cli.server.clone()))?;

        if cli.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Ok(Self {
            port: cli.port,
            log_level: cli.log_level,
            server,
            token: cli.token,
            agentic_name: cli.agentic_name.filter(|name| !name.is_empty()),
            agentic_dsn: cli.agentic_dsn.filter(|dsn| !dsn.is_empty()),
            allowed_hosts: cli
                .allowed_hosts
                .into_iter()
                .map(|host| host.trim().to_string())
                .filter(|host| !host.is_empty())
                .collect(),
        })
    }
}
