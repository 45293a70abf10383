use std::future::Future;

use anyhow::Result;
use async_trait::async_trait;
use warden_issues::issue_pagination::PageCursor;
use warden_issues::issue_types::{
    GithubContentEntry, GithubIssue, GithubIssueComment, GithubIssueEvent,
};

/// Tracker operations the processor depends on, scoped to one repository.
///
/// Listing calls return a single 1-based page; an empty page ends the listing.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Open issues carrying `label_name`, most recently updated first.
    async fn list_open_issues_page(&self, label_name: &str, page: u32)
        -> Result<Vec<GithubIssue>>;

    async fn list_issue_events_page(
        &self,
        issue_number: u64,
        page: u32,
    ) -> Result<Vec<GithubIssueEvent>>;

    async fn list_issue_comments_page(
        &self,
        issue_number: u64,
        page: u32,
    ) -> Result<Vec<GithubIssueComment>>;

    async fn get_issue(&self, issue_number: u64) -> Result<GithubIssue>;

    async fn list_directory(&self, path: &str) -> Result<Vec<GithubContentEntry>>;

    async fn download_text(&self, url: &str) -> Result<String>;

    /// Returns the id of the created comment.
    async fn create_issue_comment(&self, issue_number: u64, body: &str) -> Result<u64>;

    async fn close_issue(&self, issue_number: u64) -> Result<()>;
}

/// Drain a paginated listing into one oldest-first sequence.
pub async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut cursor = PageCursor::new();
    let mut rows = Vec::new();
    while let Some(page) = cursor.next_page() {
        let chunk = fetch_page(page).await?;
        tracing::debug!(page, rows = chunk.len(), "fetched page");
        cursor.advance(chunk.len());
        rows.extend(chunk);
    }
    Ok(rows)
}
