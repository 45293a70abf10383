use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::tracked_labels::TrackedLabels;

pub const DEFAULT_BOT_LOGIN: &str = "github-actions[bot]";
pub const DEFAULT_TEMPLATE_DIR: &str = ".github/ISSUE_TEMPLATE";

/// Validation failures raised before any tracker call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("type is not comment or close: '{0}'")]
    InvalidMode(String),
    #[error("repo-token is required")]
    MissingToken,
    #[error("days-until-close is not an integer: '{0}'")]
    InvalidDaysUntilClose(String),
    #[error("days-until-close must be greater than 0, got {0}")]
    NonPositiveDaysUntilClose(i64),
    #[error("invalid repository '{0}', expected owner/repo")]
    InvalidRepo(String),
    #[error("comment mode requires {0} from the event payload or the command line")]
    MissingInvocationContext(&'static str),
    #[error("failed to read event payload {path}: {reason}")]
    EventPayload { path: String, reason: String },
}

/// Which of the two entry points a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Comment,
    Close,
}

impl RunMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Close => "close",
        }
    }
}

impl FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "comment" => Ok(Self::Comment),
            "close" => Ok(Self::Close),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

/// Unvalidated action inputs as they arrive from the command line or the
/// `INPUT_*` environment.
#[derive(Clone, Default)]
pub struct ActionInputs {
    pub mode: String,
    pub repo_token: String,
    pub days_until_close: String,
    pub template_not_used_label: String,
    pub template_not_used_comment_body: String,
    pub doesnt_follow_template_label: String,
    pub doesnt_follow_template_comment_body: String,
    pub bot_login: String,
    pub template_dir: String,
}

/// Immutable settings for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub mode: RunMode,
    pub repo_token: String,
    pub days_until_close: u64,
    pub labels: TrackedLabels,
    pub bot_login: String,
    pub template_dir: String,
}

impl ProcessorConfig {
    pub fn from_inputs(inputs: ActionInputs) -> Result<Self, ConfigError> {
        let mode = inputs.mode.trim().parse::<RunMode>()?;
        let repo_token = inputs.repo_token.trim().to_string();
        if repo_token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        let days_until_close = parse_days_until_close(&inputs.days_until_close)?;
        let labels = TrackedLabels::new(
            inputs.template_not_used_label,
            inputs.template_not_used_comment_body,
            inputs.doesnt_follow_template_label,
            inputs.doesnt_follow_template_comment_body,
        );
        let bot_login = non_blank_or(inputs.bot_login, DEFAULT_BOT_LOGIN);
        let template_dir = non_blank_or(inputs.template_dir, DEFAULT_TEMPLATE_DIR)
            .trim_matches('/')
            .to_string();
        Ok(Self {
            mode,
            repo_token,
            days_until_close,
            labels,
            bot_login,
            template_dir,
        })
    }
}

impl fmt::Debug for ProcessorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorConfig")
            .field("mode", &self.mode)
            .field("repo_token", &"<redacted>")
            .field("days_until_close", &self.days_until_close)
            .field("labels", &self.labels)
            .field("bot_login", &self.bot_login)
            .field("template_dir", &self.template_dir)
            .finish()
    }
}

pub fn parse_days_until_close(raw: &str) -> Result<u64, ConfigError> {
    let parsed = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidDaysUntilClose(raw.to_string()))?;
    if parsed <= 0 {
        return Err(ConfigError::NonPositiveDaysUntilClose(parsed));
    }
    Ok(parsed.unsigned_abs())
}

fn non_blank_or(value: String, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
