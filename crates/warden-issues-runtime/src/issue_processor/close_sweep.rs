use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use warden_issues::issue_label_history::{
    classify_issue_label_state, last_label_event, IssueLabelState,
};
use warden_issues::issue_types::GithubIssueEvent;

use super::{describe_error, IssueProcessor, ProcessorError};
use crate::issue_tracker::collect_pages;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepFailure {
    pub issue_number: u64,
    pub error: String,
}

/// Result of one pass over the open issues carrying a label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SweepReport {
    pub label: String,
    pub scanned: usize,
    pub closed: Vec<u64>,
    pub skipped_without_event: usize,
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    pub fn closed_count(&self) -> usize {
        self.closed.len()
    }
}

impl IssueProcessor {
    /// Most recent application of `label_name`, after reading the full event history.
    pub async fn resolve_last_label_event(
        &self,
        issue_number: u64,
        label_name: &str,
    ) -> Result<Option<GithubIssueEvent>, ProcessorError> {
        let history = collect_pages(|page| self.tracker.list_issue_events_page(issue_number, page))
            .await
            .map_err(ProcessorError::tracker("list issue events"))?;
        let found = last_label_event(&history, label_name).cloned();
        match &found {
            Some(event) => debug!(issue_number, event_id = event.id, "found label event"),
            None => debug!(issue_number, events = history.len(), "no matching label event"),
        }
        Ok(found)
    }

    /// Close every open issue that has carried `label_name` for longer than
    /// the configured grace period.
    pub async fn sweep(&self, label_name: &str) -> Result<SweepReport, ProcessorError> {
        self.sweep_at(label_name, Utc::now()).await
    }

    pub(crate) async fn sweep_at(
        &self,
        label_name: &str,
        now: DateTime<Utc>,
    ) -> Result<SweepReport, ProcessorError> {
        info!(label = label_name, "starting close sweep");
        // Snapshot the listing first: closing an issue drops it from later pages.
        let issues = collect_pages(|page| self.tracker.list_open_issues_page(label_name, page))
            .await
            .map_err(ProcessorError::tracker("list issues"))?;

        let mut report = SweepReport {
            label: label_name.to_string(),
            scanned: issues.len(),
            ..SweepReport::default()
        };
        for issue in &issues {
            match self.close_if_stale(issue.number, label_name, now).await {
                Ok(IssueLabelState::LabeledStale) => report.closed.push(issue.number),
                Ok(IssueLabelState::Unlabeled) => report.skipped_without_event += 1,
                Ok(IssueLabelState::LabeledRecent) => {}
                Err(error) => {
                    let detail = describe_error(error);
                    warn!(issue_number = issue.number, error = %detail, "failed to process issue");
                    report.failures.push(SweepFailure {
                        issue_number: issue.number,
                        error: detail,
                    });
                }
            }
        }
        info!(
            label = label_name,
            scanned = report.scanned,
            closed = report.closed_count(),
            failures = report.failures.len(),
            "close sweep finished"
        );
        Ok(report)
    }

    async fn close_if_stale(
        &self,
        issue_number: u64,
        label_name: &str,
        now: DateTime<Utc>,
    ) -> Result<IssueLabelState, ProcessorError> {
        let last_event = self
            .resolve_last_label_event(issue_number, label_name)
            .await?;
        let state = classify_issue_label_state(
            last_event.as_ref(),
            now,
            self.config.days_until_close,
        );
        debug!(issue_number, state = state.as_str(), "classified issue");
        if state == IssueLabelState::LabeledStale {
            self.tracker
                .close_issue(issue_number)
                .await
                .map_err(ProcessorError::tracker("close issue"))?;
            info!(issue_number, label = label_name, "closed stale issue");
        }
        Ok(state)
    }
}
