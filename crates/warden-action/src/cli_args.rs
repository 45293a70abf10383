use std::path::PathBuf;

use clap::Parser;
use warden_issues::issue_config::{ActionInputs, DEFAULT_BOT_LOGIN, DEFAULT_TEMPLATE_DIR};

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

/// Action inputs fall back to the `INPUT_*` variables the Actions runner exports.
#[derive(Debug, Parser)]
#[command(
    name = "issue-warden",
    about = "Comment on issues that ignore the issue templates and close them after a grace period",
    version
)]
pub struct Cli {
    #[arg(
        long = "type",
        env = "INPUT_TYPE",
        default_value = "",
        help = "Run mode: `comment` on the labeled issue, or `close` stale labeled issues"
    )]
    pub mode: String,

    #[arg(
        long = "repo-token",
        env = "INPUT_REPO-TOKEN",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true,
        help = "GitHub token used for API access"
    )]
    pub repo_token: String,

    #[arg(
        long = "days-until-close",
        env = "INPUT_DAYS-UNTIL-CLOSE",
        default_value = "",
        help = "Days an issue may carry a tracked label before it is closed"
    )]
    pub days_until_close: String,

    #[arg(
        long = "template-not-used-label",
        env = "INPUT_TEMPLATE-NOT-USED-LABEL",
        default_value = "",
        help = "Label applied to issues that did not use any issue template"
    )]
    pub template_not_used_label: String,

    #[arg(
        long = "template-not-used-comment-body",
        env = "INPUT_TEMPLATE-NOT-USED-COMMENT-BODY",
        default_value = "",
        help = "Comment posted for the template-not-used label; supports {authorLogin} and {daysUntilClose}"
    )]
    pub template_not_used_comment_body: String,

    #[arg(
        long = "doesnt-follow-template-label",
        env = "INPUT_DOESNT-FOLLOW-TEMPLATE-LABEL",
        default_value = "",
        help = "Label applied to issues that used a template but did not fill it in"
    )]
    pub doesnt_follow_template_label: String,

    #[arg(
        long = "doesnt-follow-template-comment-body",
        env = "INPUT_DOESNT-FOLLOW-TEMPLATE-COMMENT-BODY",
        default_value = "",
        help = "Comment posted for the doesnt-follow-template label; supports {authorLogin} and {daysUntilClose}"
    )]
    pub doesnt_follow_template_comment_body: String,

    #[arg(
        long = "repo",
        env = "GITHUB_REPOSITORY",
        help = "GitHub repository in owner/repo format"
    )]
    pub repo: String,

    #[arg(
        long = "api-base",
        env = "GITHUB_API_URL",
        default_value = "https://api.github.com",
        help = "GitHub API base URL"
    )]
    pub api_base: String,

    #[arg(
        long = "event-path",
        env = "GITHUB_EVENT_PATH",
        help = "Webhook payload file providing the issue number and label name in comment mode"
    )]
    pub event_path: Option<PathBuf>,

    #[arg(
        long = "issue-number",
        help = "Issue number for comment mode; overrides the event payload"
    )]
    pub issue_number: Option<u64>,

    #[arg(
        long = "label",
        help = "Triggering label name for comment mode; overrides the event payload"
    )]
    pub label: Option<String>,

    #[arg(
        long = "bot-login",
        env = "INPUT_BOT-LOGIN",
        default_value = DEFAULT_BOT_LOGIN,
        help = "Login of the account that posts comments; used to find earlier comments"
    )]
    pub bot_login: String,

    #[arg(
        long = "template-dir",
        env = "INPUT_TEMPLATE-DIR",
        default_value = DEFAULT_TEMPLATE_DIR,
        help = "Repository directory holding the Markdown issue templates"
    )]
    pub template_dir: String,

    #[arg(
        long = "request-timeout-ms",
        env = "INPUT_REQUEST-TIMEOUT-MS",
        default_value_t = 30_000,
        value_parser = parse_positive_u64,
        help = "Timeout for each GitHub API request in milliseconds"
    )]
    pub request_timeout_ms: u64,
}

impl Cli {
    pub fn action_inputs(&self) -> ActionInputs {
        ActionInputs {
            mode: self.mode.clone(),
            repo_token: self.repo_token.clone(),
            days_until_close: self.days_until_close.clone(),
            template_not_used_label: self.template_not_used_label.clone(),
            template_not_used_comment_body: self.template_not_used_comment_body.clone(),
            doesnt_follow_template_label: self.doesnt_follow_template_label.clone(),
            doesnt_follow_template_comment_body: self.doesnt_follow_template_comment_body.clone(),
            bot_login: self.bot_login.clone(),
            template_dir: self.template_dir.clone(),
        }
    }
}
