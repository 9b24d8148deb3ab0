//! Collect, analyze, save, send

use advisor_ai::{ChatModel, OpenAiCompatibleClient, UpdateAnalyzer};
use advisor_config::Settings;
use advisor_core::ScanResult;
use advisor_deps::Collector;
use advisor_report::{save_report, EmailSender, MailTransport};
use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};

/// What happened to the email step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailStatus {
    /// Email disabled or no recipients configured
    Skipped,
    Sent,
    /// Delivery failed; the run still succeeds
    Failed,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub report_path: PathBuf,
    pub email: EmailStatus,
}

/// A sender and the addresses to mail the report to
pub struct Mail<'a, T> {
    pub sender: &'a EmailSender<T>,
    pub recipients: &'a [String],
}

/// Run every stage against the project named in `settings`
///
/// Settings must already be validated.
pub async fn run(settings: &Settings) -> Result<PipelineReport> {
    let collector = Collector::with_program(&settings.report.npm_path);
    let version = collector
        .manager_version()
        .await
        .with_context(|| format!("{} is not available", collector.program()))?;
    println!("{} npm {}", "✓".green(), version);

    let project_path = &settings.report.project_path;
    println!("Scanning {}...", project_path.display());
    let scan = collector
        .collect(project_path)
        .await
        .context("Failed to collect dependency data")?;
    println!(
        "{} {} dependencies, {} outdated",
        "✓".green(),
        scan.dependencies.len() + scan.dev_dependencies.len(),
        scan.outdated.len()
    );

    let client = OpenAiCompatibleClient::from_config(&settings.ai)
        .context("Failed to create AI client")?;
    let analyzer = UpdateAnalyzer::new(client).with_max_tokens(settings.ai.max_tokens);

    let sender = if settings.email.should_send() {
        match EmailSender::from_config(&settings.email) {
            Ok(sender) => Some(sender),
            Err(e) => {
                tracing::error!("Email transport unavailable: {}", e);
                None
            }
        }
    } else {
        None
    };
    let mail = sender.as_ref().map(|sender| Mail {
        sender,
        recipients: &settings.email.recipients,
    });

    let mut outcome = process(&scan, &analyzer, &settings.report.output_dir, mail).await?;
    // A transport that could not be built counts as a failed send
    if settings.email.should_send() && sender.is_none() {
        outcome.email = EmailStatus::Failed;
    }
    Ok(outcome)
}

/// Analyze a finished scan, save the report and mail it if requested
///
/// Analysis and filesystem failures are errors. Email failure is reported
/// through [`PipelineReport::email`] only.
pub async fn process<M, T>(
    scan: &ScanResult,
    analyzer: &UpdateAnalyzer<M>,
    output_dir: &Path,
    mail: Option<Mail<'_, T>>,
) -> Result<PipelineReport>
where
    M: ChatModel,
    T: MailTransport,
{
    println!("Analyzing updates for {}...", scan.project.bold());
    let report = analyzer
        .analyze(scan)
        .await
        .context("Failed to analyze dependencies")?;

    let report_path = save_report(&report, output_dir)
        .await
        .context("Failed to save report")?;
    println!(
        "{} {} recommendations saved to {}",
        "✓".green(),
        report.recommendations.len(),
        report_path.display()
    );

    let email = match mail {
        Some(Mail { sender, recipients }) if !recipients.is_empty() => {
            if sender.send_report(&report, recipients).await {
                println!("{} Report emailed to {} recipient(s)", "✓".green(), recipients.len());
                EmailStatus::Sent
            } else {
                println!("{} Report could not be emailed", "✗".yellow());
                EmailStatus::Failed
            }
        }
        _ => EmailStatus::Skipped,
    };

    Ok(PipelineReport { report_path, email })
}

/// Process exit status for a pipeline result: 0 on success, 1 otherwise
pub fn exit_code<T>(result: &Result<T>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
