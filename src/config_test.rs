use serial_test::serial;
use std::env;

use crate::config::{Config, ConfigError, LogLevel};

const VARS: [&str; 7] = [
    "PORT",
    "LOG_LEVEL",
    "TEAMWORK_SERVER",
    "TEAMWORK_API_TOKEN",
    "AGENTIC_NAME",
    "AGENTIC_DSN",
    "MCP_ALLOWED_HOSTS",
];

fn clear_env() {
    for var in VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

fn set_env(pairs: &[(&str, &str)]) {
    for (key, value) in pairs {
        unsafe {
            env::set_var(key, value);
        }
    }
}

#[test]
#[serial]
fn test_defaults_apply() {
    clear_env();

    let config = Config::try_parse_from([
        "tw-mcp",
        "--server",
        "https://example.teamwork.com",
        "--token",
        "secret",
    ])
    .unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.server.as_str(), "https://example.teamwork.com/");
    assert_eq!(config.token, "secret");
    assert_eq!(config.agentic_name, None);
    assert_eq!(config.agentic_dsn, None);
    assert!(config.allowed_hosts.is_empty());
}

#[test]
#[serial]
fn test_environment_fallback() {
    clear_env();
    set_env(&[
        ("PORT", "9000"),
        ("LOG_LEVEL", "DEBUG"),
        ("TEAMWORK_SERVER", "http://localhost:8081"),
        ("TEAMWORK_API_TOKEN", "from-env"),
        ("AGENTIC_NAME", "assistant"),
        ("AGENTIC_DSN", "postgres://user:pw@db/agent"),
    ]);

    let config = Config::try_parse_from(["tw-mcp"]).unwrap();

    assert_eq!(config.port, 9000);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.server.as_str(), "http://localhost:8081/");
    assert_eq!(config.token, "from-env");
    assert_eq!(config.agentic_name.as_deref(), Some("assistant"));
    assert_eq!(
        config.agentic_dsn.as_deref(),
        Some("postgres://user:pw@db/agent")
    );

    clear_env();
}

#[test]
#[serial]
fn test_flags_override_environment() {
    clear_env();
    set_env(&[
        ("PORT", "9000"),
        ("TEAMWORK_SERVER", "https://env.teamwork.com"),
        ("TEAMWORK_API_TOKEN", "from-env"),
    ]);

    let config = Config::try_parse_from([
        "tw-mcp",
        "--port",
        "7000",
        "--server",
        "https://flag.teamwork.com",
    ])
    .unwrap();

    assert_eq!(config.port, 7000, "CLI flag should override env var");
    assert_eq!(config.server.host_str(), Some("flag.teamwork.com"));
    assert_eq!(config.token, "from-env");

    clear_env();
}

#[test]
#[serial]
fn test_server_must_be_absolute_http_url() {
    clear_env();

    for server in ["example.teamwork.com", "ftp://example.teamwork.com", "/relative"] {
        let err = Config::try_parse_from(["tw-mcp", "--server", server, "--token", "t"])
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidServer(ref got) if got == server),
            "{server} should be rejected, got {err:?}"
        );
    }
}

#[test]
#[serial]
fn test_token_must_not_be_blank() {
    clear_env();

    let err = Config::try_parse_from([
        "tw-mcp",
        "--server",
        "https://example.teamwork.com",
        "--token",
        "  ",
    ])
    .unwrap_err();

    assert!(matches!(err, ConfigError::MissingToken));
}

#[test]
#[serial]
fn test_missing_server_is_an_argument_error() {
    clear_env();

    let err = Config::try_parse_from(["tw-mcp", "--token", "t"]).unwrap_err();

    assert!(matches!(err, ConfigError::Arguments(_)));
}

#[test]
#[serial]
fn test_unknown_log_level_rejected() {
    clear_env();
    set_env(&[("LOG_LEVEL", "verbose")]);

    let err = Config::try_parse_from([
        "tw-mcp",
        "--server",
        "https://example.teamwork.com",
        "--token",
        "t",
    ])
    .unwrap_err();

    assert!(matches!(err, ConfigError::Arguments(_)));
    clear_env();
}

#[test]
#[serial]
fn test_debug_redacts_secrets() {
    clear_env();

    let config = Config::try_parse_from([
        "tw-mcp",
        "--server",
        "https://example.teamwork.com",
        "--token",
        "top-secret-token",
        "--agentic-dsn",
        "postgres://user:hunter2@db/agent",
    ])
    .unwrap();
    let debug = format!("{config:?}");

    assert!(!debug.contains("top-secret-token"));
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("<redacted>"));
    assert!(debug.contains("example.teamwork.com"));
}

#[test]
fn test_log_level_directives() {
    assert_eq!(
        LogLevel::Warn.directives(),
        "teamwork_mcp=warn,tower_http=warn"
    );
    assert_eq!(LogLevel::default(), LogLevel::Info);
    assert_eq!(LogLevel::Trace.to_string(), "trace");
}

#[test]
#[serial]
fn test_allowed_hosts_from_environment() {
    clear_env();
    set_env(&[
        ("TEAMWORK_SERVER", "https://example.teamwork.com"),
        ("TEAMWORK_API_TOKEN", "secret"),
        ("MCP_ALLOWED_HOSTS", "mcp.internal, localhost,,"),
    ]);

    let config = Config::try_parse_from(["tw-mcp"]).unwrap();
    clear_env();

    assert_eq!(config.allowed_hosts, vec!["mcp.internal", "localhost"]);
}
