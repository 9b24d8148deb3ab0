//! npm-advisor - ranks available npm updates and reports them.

use advisor_cli::{exit_code, pipeline, PipelineReport};
use advisor_config::Settings;
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "npm-advisor", version)]
#[command(about = "Scan an npm project, rank available updates with an AI model and report them")]
#[command(long_about = "Scan an npm project, rank available updates with an AI model and report them.

All configuration is read from the environment (or a .env file):
  AI_PROVIDER          openai (default) or deepseek
  AI_API_KEY           model service key (required)
  AI_API_BASE_URL      OpenAI-compatible endpoint
  AI_MODEL             model name
  AI_MAX_TOKENS        completion limit (default 2000)
  AI_TIMEOUT_SECS      request timeout (default 120)
  SCAN_PROJECT_PATH    project to scan (default: current directory)
  REPORT_OUTPUT_DIR    where reports are written (default: reports)
  NPM_PATH             npm executable (default: npm)
  EMAIL_ENABLED        true/false
  EMAIL_RECIPIENTS     comma-separated addresses
  SMTP_SERVER, SMTP_PORT, SMTP_USER, SMTP_PASSWORD, EMAIL_FROM")]
struct Cli {}

fn main() -> ExitCode {
    let _cli = Cli::parse();

    // Load .env before the subscriber so RUST_LOG can come from it
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    let result = try_main();
    match &result {
        Ok(outcome) => {
            println!(
                "{} Report available at {}",
                "✓".green().bold(),
                outcome.report_path.display()
            );
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
        }
    }
    ExitCode::from(exit_code(&result))
}

fn try_main() -> Result<PipelineReport> {
    let settings = Settings::from_env().context("Failed to load settings")?;
    settings.validate().context("Invalid configuration")?;
    tracing::debug!(?settings, "Settings loaded");

    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(pipeline::run(&settings))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
