use tracing::{debug, info};
use warden_issues::issue_comment::{
    append_template_details, find_prior_bot_comment, interpolate_comment_body,
    should_post_comment, tag_comment_body,
};
use warden_issues::issue_template::{
    is_markdown_template_path, parse_issue_template, IssueTemplate, TemplateFormatError,
};
use warden_issues::issue_types::GithubIssueComment;
use warden_issues::tracked_labels::TrackedLabel;

use super::{IssueProcessor, ProcessorError};
use crate::issue_tracker::collect_pages;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Commented { issue_number: u64, comment_id: u64 },
    /// The latest bot comment already carries the rendered body.
    Unchanged { issue_number: u64 },
    /// The label is not one of the tracked labels.
    IgnoredLabel { label_name: String },
}

impl IssueProcessor {
    /// Post the comment for `label_name` on the issue unless an identical one exists.
    pub async fn notify(
        &self,
        issue_number: u64,
        label_name: &str,
    ) -> Result<NotifyOutcome, ProcessorError> {
        let Some(label) = self.config.labels.lookup(label_name) else {
            info!(label = label_name, "label is not tracked; nothing to do");
            return Ok(NotifyOutcome::IgnoredLabel {
                label_name: label_name.to_string(),
            });
        };
        info!(
            issue_number,
            label = label_name,
            kind = label.kind.as_str(),
            "notifying issue"
        );

        let rendered = self.render_comment_body(issue_number, label).await?;
        let prior = self.latest_bot_comment(issue_number).await?;
        if !should_post_comment(prior.as_ref(), &rendered) {
            info!(issue_number, "latest bot comment is up to date; skipping");
            return Ok(NotifyOutcome::Unchanged { issue_number });
        }

        let comment_id = self
            .tracker
            .create_issue_comment(issue_number, &rendered)
            .await
            .map_err(ProcessorError::tracker("create issue comment"))?;
        info!(issue_number, comment_id, "posted comment");
        Ok(NotifyOutcome::Commented {
            issue_number,
            comment_id,
        })
    }

    /// Fully rendered, marker-tagged comment body for `label`.
    pub async fn render_comment_body(
        &self,
        issue_number: u64,
        label: &TrackedLabel,
    ) -> Result<String, ProcessorError> {
        let template = if label.kind.includes_templates() {
            let templates = self.fetch_templates().await?;
            append_template_details(&label.comment_body, &templates)
        } else {
            label.comment_body.clone()
        };
        let author_login = self.author_login(issue_number).await?;
        let body = interpolate_comment_body(&template, &author_login, self.config.days_until_close);
        Ok(tag_comment_body(&body))
    }

    pub async fn author_login(&self, issue_number: u64) -> Result<String, ProcessorError> {
        let issue = self
            .tracker
            .get_issue(issue_number)
            .await
            .map_err(ProcessorError::tracker("get issue"))?;
        issue
            .author_login()
            .map(ToOwned::to_owned)
            .ok_or(ProcessorError::AuthorResolution { issue_number })
    }

    /// Markdown issue templates in listing order.
    pub async fn fetch_templates(&self) -> Result<Vec<IssueTemplate>, ProcessorError> {
        let entries = self
            .tracker
            .list_directory(&self.config.template_dir)
            .await
            .map_err(ProcessorError::tracker("list issue templates"))?;

        let mut templates = Vec::new();
        for entry in entries
            .iter()
            .filter(|entry| is_markdown_template_path(&entry.path))
        {
            let url = entry
                .download_url
                .as_deref()
                .ok_or_else(|| ProcessorError::TemplateFormat {
                    path: entry.path.clone(),
                    source: TemplateFormatError::MissingDownloadUrl,
                })?;
            let raw = self
                .tracker
                .download_text(url)
                .await
                .map_err(ProcessorError::tracker("download issue template"))?;
            let template =
                parse_issue_template(&raw).map_err(|source| ProcessorError::TemplateFormat {
                    path: entry.path.clone(),
                    source,
                })?;
            debug!(path = %entry.path, name = %template.name, "loaded issue template");
            templates.push(template);
        }
        Ok(templates)
    }

    /// Latest marker-tagged comment by the bot, after reading every page.
    pub async fn latest_bot_comment(
        &self,
        issue_number: u64,
    ) -> Result<Option<GithubIssueComment>, ProcessorError> {
        let comments = collect_pages(|page| {
            self.tracker.list_issue_comments_page(issue_number, page)
        })
        .await
        .map_err(ProcessorError::tracker("list issue comments"))?;
        Ok(find_prior_bot_comment(&comments, &self.config.bot_login).cloned())
    }
}
