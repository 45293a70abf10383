mod bootstrap_helpers;
mod cli_args;
mod invocation_context;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use warden_issues::issue_config::{ProcessorConfig, RunMode};
use warden_issues::issue_types::RepoRef;
use warden_issues_runtime::{GithubApiClient, IssueProcessor, NotifyOutcome, RunOutcome};

use crate::bootstrap_helpers::init_tracing;
use crate::cli_args::Cli;
use crate::invocation_context::load_invocation_context;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run_cli(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!(error = %format!("{failure:#}"), "issue warden run failed");
            error!("{failure:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run_cli(cli: Cli) -> Result<()> {
    let config = ProcessorConfig::from_inputs(cli.action_inputs())?;
    let repo = RepoRef::parse(&cli.repo)?;
    let invocation = match config.mode {
        RunMode::Comment => Some(load_invocation_context(
            cli.event_path.as_deref(),
            cli.issue_number,
            cli.label.as_deref(),
        )?),
        RunMode::Close => None,
    };

    let client = GithubApiClient::new(
        cli.api_base.clone(),
        config.repo_token.clone(),
        repo.clone(),
        cli.request_timeout_ms,
    )
    .context("failed to initialize github client")?;
    let processor =
        IssueProcessor::new(config, Arc::new(client), repo).with_invocation(invocation);

    let outcome = processor.run().await?;
    log_outcome(&outcome);
    Ok(())
}

fn log_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Notified(NotifyOutcome::Commented {
            issue_number,
            comment_id,
        }) => info!(issue_number, comment_id, "comment posted"),
        RunOutcome::Notified(NotifyOutcome::Unchanged { issue_number }) => {
            info!(issue_number, "comment already up to date")
        }
        RunOutcome::Notified(NotifyOutcome::IgnoredLabel { label_name }) => {
            info!(label = %label_name, "label is not tracked")
        }
        RunOutcome::Swept(reports) => {
            for report in reports {
                info!(
                    label = %report.label,
                    scanned = report.scanned,
                    closed = report.closed_count(),
                    skipped = report.skipped_without_event,
                    "sweep summary"
                );
            }
        }
    }
}
