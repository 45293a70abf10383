use chrono::{DateTime, Utc};

use crate::issue_types::GithubIssueEvent;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Where an open issue stands relative to the close deadline for one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLabelState {
    /// No `labeled` event for the label exists in the history.
    Unlabeled,
    LabeledRecent,
    LabeledStale,
}

impl IssueLabelState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unlabeled => "unlabeled",
            Self::LabeledRecent => "labeled_recent",
            Self::LabeledStale => "labeled_stale",
        }
    }
}

/// Latest application of `label_name` in a complete, oldest-first history.
///
/// A label can be removed and re-applied; only the last application counts.
pub fn last_label_event<'a>(
    events: &'a [GithubIssueEvent],
    label_name: &str,
) -> Option<&'a GithubIssueEvent> {
    events
        .iter()
        .rev()
        .find(|event| event.is_labeled_with(label_name))
}

/// Strictly more than `days_until_close` whole days have elapsed since `labeled_at`.
pub fn is_close_eligible(
    labeled_at: DateTime<Utc>,
    now: DateTime<Utc>,
    days_until_close: u64,
) -> bool {
    let elapsed_ms = i128::from(now.signed_duration_since(labeled_at).num_milliseconds());
    let threshold_ms = i128::from(days_until_close) * i128::from(MILLIS_PER_DAY);
    elapsed_ms > threshold_ms
}

pub fn classify_issue_label_state(
    last_event: Option<&GithubIssueEvent>,
    now: DateTime<Utc>,
    days_until_close: u64,
) -> IssueLabelState {
    match last_event {
        None => IssueLabelState::Unlabeled,
        Some(event) if is_close_eligible(event.created_at, now, days_until_close) => {
            IssueLabelState::LabeledStale
        }
        Some(_) => IssueLabelState::LabeledRecent,
    }
}
