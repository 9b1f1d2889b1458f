mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, error};

use esquery_core::config::load_dotenv;
use esquery_core::{ConnectionConfig, PluginOutput, Status};
use esquery_search::{run_check, ElasticClient};

use crate::cli::CliArgs;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    load_dotenv();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => return finish(usage_output(&e)),
    };

    init_tracing(args.verbose);
    install_panic_hook();

    let output = match run(args).await {
        Ok(output) => output,
        Err(e) => {
            error!(error = %e, "Check failed");
            failure_output(&e)
        }
    };

    finish(output)
}

async fn run(args: CliArgs) -> Result<PluginOutput> {
    let connection = args.connection(ConnectionConfig::from_env());
    connection.log_summary();

    let config = args
        .into_check_config(connection)
        .validate()
        .context("invalid configuration")?;

    let client = ElasticClient::new(config.connection()).context("error creating the client")?;
    let output = run_check(&client, &config).await?;
    debug!(status = %output.status, "Check finished");

    Ok(output)
}

/// The whole context chain on one line, outermost first.
fn failure_output(err: &anyhow::Error) -> PluginOutput {
    PluginOutput::unknown(format!("{:#}", err))
}

/// Only clap's first line; the usage hint after it is noise for a monitoring UI.
fn usage_output(err: &clap::Error) -> PluginOutput {
    let rendered = err.to_string();
    PluginOutput::unknown(rendered.lines().next().unwrap_or_default().trim())
}

fn finish(output: PluginOutput) -> ExitCode {
    println!("{}", output);
    ExitCode::from(output.status.exit_code())
}

/// Logs go to stderr so stdout carries only the plugin line.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// A panic still has to end as a plugin-conformant UNKNOWN line.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        println!("{} - {}", Status::Unknown, info);
        std::process::exit(i32::from(Status::Unknown.exit_code()));
    }));
}
