//! `kisstrack` binary: sends one tracking call and exits.
//!
//! Exit status is 0 once the request has been sent and the response
//! drained, 1 on usage, configuration, or transport errors. Whether the
//! service actually recorded the call cannot be observed.

mod args;
mod config;

use std::process::ExitCode;

use kisstrack_client::{build_client, call_at};
use tracing_subscriber::EnvFilter;

use crate::args::{parse_args, Command, USAGE};

const DEFAULT_CONFIG_PATH: &str = "kisstrack.toml";

fn resolve_config_path(cli: Option<String>) -> (String, &'static str) {
    if let Some(path) = cli.filter(|value| !value.trim().is_empty()) {
        return (path, "cli-arg");
    }

    if let Ok(path) = std::env::var("KISSTRACK_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (path, "env-var");
        }
    }

    (DEFAULT_CONFIG_PATH.to_string(), "default")
}

#[tokio::main]
async fn main() -> ExitCode {
    let invocation = match parse_args(std::env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("error: {e}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    if invocation.command == Command::Help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let (config_path, config_source) = resolve_config_path(invocation.config_path);
    let config = match config::load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("warn"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::debug!(
        source = config_source,
        path = %config_path,
        "resolved configuration path"
    );

    let Some(call) = invocation.command.into_call() else {
        return ExitCode::SUCCESS;
    };

    let result = async {
        let api_key = config.api_key()?;
        let client = build_client(&config.client_config())?;
        call_at(&client, &config.endpoint(), &api_key, &call).await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    }
    .await;

    match result {
        Ok(()) => {
            tracing::info!(?call, "tracking call sent");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "tracking call failed");
            ExitCode::FAILURE
        }
    }
}
