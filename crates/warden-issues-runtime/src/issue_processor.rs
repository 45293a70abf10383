//! Processor orchestration for the two run modes.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use warden_issues::issue_config::{ConfigError, ProcessorConfig, RunMode};
use warden_issues::issue_template::TemplateFormatError;
use warden_issues::issue_types::{InvocationContext, RepoRef};

use crate::issue_tracker::IssueTracker;

mod close_sweep;
mod comment_notify;

pub use close_sweep::{SweepFailure, SweepReport};
pub use comment_notify::NotifyOutcome;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not resolve the author of issue #{issue_number}")]
    AuthorResolution { issue_number: u64 },
    #[error("issue template {path} is malformed")]
    TemplateFormat {
        path: String,
        #[source]
        source: TemplateFormatError,
    },
    #[error("github {operation} failed")]
    Tracker {
        operation: &'static str,
        #[source]
        source: BoxedSource,
    },
    #[error("close sweep finished with {} failure(s): {}", .failures.len(), .failures.join("; "))]
    SweepIncomplete { failures: Vec<String> },
}

impl ProcessorError {
    pub(crate) fn tracker(operation: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |error| Self::Tracker {
            operation,
            source: error.into(),
        }
    }
}

/// Render an error and its sources on one line, outermost first.
pub(crate) fn describe_error(error: ProcessorError) -> String {
    format!("{:#}", anyhow::Error::from(error))
}

/// What a run did, for logging and for callers that need to inspect it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Notified(NotifyOutcome),
    Swept(Vec<SweepReport>),
}

/// Applies the configured label rules against one repository.
pub struct IssueProcessor {
    config: ProcessorConfig,
    tracker: Arc<dyn IssueTracker>,
    repo: RepoRef,
    invocation: Option<InvocationContext>,
}

impl IssueProcessor {
    pub fn new(config: ProcessorConfig, tracker: Arc<dyn IssueTracker>, repo: RepoRef) -> Self {
        Self {
            config,
            tracker,
            repo,
            invocation: None,
        }
    }

    /// Attach the triggering issue and label used by comment mode.
    pub fn with_invocation(mut self, invocation: Option<InvocationContext>) -> Self {
        self.invocation = invocation;
        self
    }

    pub async fn run(&self) -> Result<RunOutcome, ProcessorError> {
        info!(mode = self.config.mode.as_str(), repo = %self.repo, "running issue warden");
        match self.config.mode {
            RunMode::Comment => {
                let invocation = self
                    .invocation
                    .as_ref()
                    .ok_or(ConfigError::MissingInvocationContext("an issue and label"))?;
                let outcome = self
                    .notify(invocation.issue_number, &invocation.label_name)
                    .await?;
                Ok(RunOutcome::Notified(outcome))
            }
            RunMode::Close => self.close_stale_issues().await.map(RunOutcome::Swept),
        }
    }

    /// Sweep both tracked labels in order; one failing sweep does not stop the other.
    async fn close_stale_issues(&self) -> Result<Vec<SweepReport>, ProcessorError> {
        let mut reports = Vec::new();
        let mut failures = Vec::new();
        for label in self.config.labels.sweep_order() {
            if label.name.is_empty() {
                warn!(
                    kind = label.kind.as_str(),
                    "tracked label is not configured; skipping sweep"
                );
                continue;
            }
            match self.sweep(&label.name).await {
                Ok(report) => {
                    failures.extend(report.failures.iter().map(|failure| {
                        format!(
                            "{}#{}: {}",
                            report.label, failure.issue_number, failure.error
                        )
                    }));
                    reports.push(report);
                }
                Err(error) => {
                    let detail = describe_error(error);
                    warn!(label = %label.name, error = %detail, "close sweep aborted");
                    failures.push(format!("{}: {detail}", label.name));
                }
            }
        }
        if failures.is_empty() {
            Ok(reports)
        } else {
            Err(ProcessorError::SweepIncomplete { failures })
        }
    }
}
