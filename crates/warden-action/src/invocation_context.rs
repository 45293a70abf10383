use std::path::Path;

use serde::Deserialize;
use warden_issues::issue_config::ConfigError;
use warden_issues::issue_types::InvocationContext;

#[derive(Debug, Default, Deserialize)]
struct EventPayload {
    #[serde(default)]
    issue: Option<PayloadIssue>,
    #[serde(default)]
    label: Option<PayloadLabel>,
}

#[derive(Debug, Deserialize)]
struct PayloadIssue {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct PayloadLabel {
    name: String,
}

/// Resolve the triggering issue and label for comment mode.
///
/// Explicit overrides win over the `issues` webhook payload stored at `event_path`.
pub fn load_invocation_context(
    event_path: Option<&Path>,
    issue_number_override: Option<u64>,
    label_override: Option<&str>,
) -> Result<InvocationContext, ConfigError> {
    let payload = match event_path {
        Some(path) if issue_number_override.is_none() || label_override.is_none() => {
            read_event_payload(path)?
        }
        _ => EventPayload::default(),
    };

    let issue_number = issue_number_override
        .or_else(|| payload.issue.as_ref().map(|issue| issue.number))
        .ok_or(ConfigError::MissingInvocationContext("an issue number"))?;
    let label_name = label_override
        .map(ToOwned::to_owned)
        .or_else(|| payload.label.map(|label| label.name))
        .filter(|name| !name.trim().is_empty())
        .ok_or(ConfigError::MissingInvocationContext("a label name"))?;

    Ok(InvocationContext {
        issue_number,
        label_name,
    })
}

fn read_event_payload(path: &Path) -> Result<EventPayload, ConfigError> {
    let payload_error = |reason: String| ConfigError::EventPayload {
        path: path.display().to_string(),
        reason,
    };
    let raw = std::fs::read_to_string(path).map_err(|error| payload_error(error.to_string()))?;
    serde_json::from_str(&raw).map_err(|error| payload_error(error.to_string()))
}
