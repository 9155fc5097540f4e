use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use terraform_provider_jumpcloud::config::Config;
use terraform_provider_jumpcloud::provider::diag::Diagnostic;
use terraform_provider_jumpcloud::provider::{Lifecycle, Provider, Response};
use tracing_subscriber::EnvFilter;

/// Terraform provider for JumpCloud
#[derive(Parser, Debug)]
#[command(name = "terraform-provider-jumpcloud", version, about, long_about = None)]
struct Args {
    /// JumpCloud administrator API key
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// JumpCloud organization ID
    #[arg(long, global = true)]
    org_id: Option<String>,

    /// JumpCloud console endpoint
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log level for debugging (overrides TF_LOG)
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the provider schema
    Schema,
    /// Read a data source
    Data {
        /// Data source type, e.g. jumpcloud_application
        type_name: String,
        /// Configuration as JSON, or "-" for stdin
        #[arg(long, default_value = "{}")]
        config: String,
    },
    /// Run a lifecycle step of a resource
    Resource {
        /// Resource type, e.g. jumpcloud_user_association
        type_name: String,
        step: Step,
        /// Configuration as JSON, or "-" for stdin
        #[arg(long, default_value = "{}")]
        config: String,
        /// Identifier from prior state
        #[arg(long)]
        id: Option<String>,
    },
    /// Import an existing resource
    Import { type_name: String, id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Step {
    Create,
    Read,
    Update,
    Delete,
}

impl From<Step> for Lifecycle {
    fn from(step: Step) -> Self {
        match step {
            Step::Create => Lifecycle::Create,
            Step::Read => Lifecycle::Read,
            Step::Update => Lifecycle::Update,
            Step::Delete => Lifecycle::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Logs go to a file; stdout carries JSON responses
fn setup_logging(level: Option<LogLevel>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let directive = match level {
        Some(level) => level.as_directive().to_string(),
        None => std::env::var("TF_LOG").ok()?.to_lowercase(),
    };
    if directive == "off" {
        return None;
    }
    let filter = EnvFilter::try_new(&directive).ok()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok()?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("provider started with log filter: {}", directive);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Ok(path) = std::env::var("TF_LOG_PATH") {
        return PathBuf::from(path);
    }
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir
            .join("jumpcloud-provider")
            .join("terraform-provider-jumpcloud.log");
    }
    PathBuf::from("terraform-provider-jumpcloud.log")
}

fn parse_config(arg: &str) -> Result<Value> {
    let text = if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read configuration from stdin")?;
        buf
    } else {
        arg.to_string()
    };
    serde_json::from_str(&text).context("Configuration is not valid JSON")
}

/// Parse `--config`; failures come back in the regular response shape
fn config_value(arg: &str) -> std::result::Result<Value, Response> {
    parse_config(arg).map_err(|err| Response::failed(vec![Diagnostic::from_error(&err)]))
}

async fn run(provider: &Provider, command: Command) -> Response {
    let config_response = Response::failed(provider.validate_config());
    if config_response.has_errors() {
        return config_response;
    }

    match command {
        Command::Schema => Response::failed(vec![Diagnostic::error(
            "schema does not run a lifecycle operation",
        )]),
        Command::Data { type_name, config } => match config_value(&config) {
            Ok(config) => provider.read_data_source(&type_name, config).await,
            Err(response) => response,
        },
        Command::Resource {
            type_name,
            step,
            config,
            id,
        } => match config_value(&config) {
            Ok(config) => provider.apply(&type_name, step.into(), config, id).await,
            Err(response) => response,
        },
        Command::Import { type_name, id } => provider.import(&type_name, &id).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    if let Command::Schema = args.command {
        println!("{}", serde_json::to_string_pretty(&Provider::schema())?);
        return Ok(());
    }

    let config = Config::load()
        .with_env(|key| std::env::var(key).ok())
        .with_overrides(args.api_key, args.org_id, args.api_url);
    tracing::debug!("Using config: {:?}", config);

    let provider = Provider::new(config);
    let response = run(&provider, args.command).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_with_key() -> Provider {
        Provider::new(Config {
            api_key: Some("key".to_string()),
            api_url: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_invalid_config_json_is_a_response() {
        let response = config_value("{bad").unwrap_err();
        assert!(response.has_errors());
        assert_eq!(response.id, "");
        assert!(response.diagnostics[0]
            .summary
            .starts_with("Configuration is not valid JSON"));

        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("id").is_some());
        assert!(value["attributes"].is_object());
        assert!(value["diagnostics"].is_array());
    }

    #[test]
    fn test_invalid_config_json_skips_the_api() {
        let response = tokio_test::block_on(run(
            &provider_with_key(),
            Command::Resource {
                type_name: "jumpcloud_user_association".to_string(),
                step: Step::Read,
                config: "{bad".to_string(),
                id: Some("U1/S1".to_string()),
            },
        ));
        assert!(response.has_errors());
        assert_eq!(response.id, "");
    }

    #[test]
    fn test_missing_api_key_is_a_response() {
        let response = tokio_test::block_on(run(
            &Provider::new(Config::default()),
            Command::Import {
                type_name: "jumpcloud_user_association".to_string(),
                id: "U1/S1".to_string(),
            },
        ));
        assert!(response.has_errors());
        assert_eq!(response.diagnostics[0].attribute.as_deref(), Some("api_key"));
        assert!(serde_json::to_value(&response).unwrap()["attributes"].is_object());
    }
}
