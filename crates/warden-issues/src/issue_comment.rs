use crate::issue_template::{render_template_details, IssueTemplate};
use crate::issue_types::GithubIssueComment;

/// Hidden trailer that identifies comments posted by this bot.
pub const COMMENT_MARKER: &str = "<!--action-template-->";
pub const AUTHOR_LOGIN_PLACEHOLDER: &str = "{authorLogin}";
pub const DAYS_UNTIL_CLOSE_PLACEHOLDER: &str = "{daysUntilClose}";

pub fn days_until_close_phrase(days_until_close: u64) -> String {
    if days_until_close == 1 {
        "1 day".to_string()
    } else {
        format!("{days_until_close} days")
    }
}

/// Substitute the first occurrence of each placeholder and trim the result.
pub fn interpolate_comment_body(template: &str, author_login: &str, days_until_close: u64) -> String {
    template
        .replacen(AUTHOR_LOGIN_PLACEHOLDER, author_login, 1)
        .replacen(
            DAYS_UNTIL_CLOSE_PLACEHOLDER,
            &days_until_close_phrase(days_until_close),
            1,
        )
        .trim()
        .to_string()
}

/// Base body followed by one collapsible block per template.
pub fn append_template_details(base_body: &str, templates: &[IssueTemplate]) -> String {
    let mut body = format!("{base_body}\n");
    for template in templates {
        body.push_str(&render_template_details(template));
    }
    body.trim().to_string()
}

pub fn tag_comment_body(body: &str) -> String {
    format!("{body}\n\n{COMMENT_MARKER}")
}

pub fn is_bot_comment(comment: &GithubIssueComment, bot_login: &str) -> bool {
    let authored_by_bot = comment
        .user
        .as_ref()
        .is_some_and(|user| user.login == bot_login);
    authored_by_bot
        && comment
            .body
            .as_deref()
            .is_some_and(|body| body.ends_with(COMMENT_MARKER))
}

/// Most recent marker-tagged comment by the bot in an oldest-first listing.
pub fn find_prior_bot_comment<'a>(
    comments: &'a [GithubIssueComment],
    bot_login: &str,
) -> Option<&'a GithubIssueComment> {
    comments
        .iter()
        .rev()
        .find(|comment| is_bot_comment(comment, bot_login))
}

/// A new comment is needed unless the prior bot comment is byte-identical.
pub fn should_post_comment(prior: Option<&GithubIssueComment>, rendered_body: &str) -> bool {
    prior.and_then(|comment| comment.body.as_deref()) != Some(rendered_body)
}
