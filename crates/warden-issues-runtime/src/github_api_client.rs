use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use warden_issues::github_transport_helpers::{contents_api_path, truncate_for_error};
use warden_issues::issue_pagination::{COMMENTS_PAGE_SIZE, EVENTS_PAGE_SIZE, ISSUES_PAGE_SIZE};
use warden_issues::issue_types::{
    GithubContentEntry, GithubIssue, GithubIssueComment, GithubIssueEvent, RepoRef,
};

use crate::issue_tracker::IssueTracker;

const ERROR_BODY_MAX_CHARS: usize = 800;

#[derive(Debug, Clone, Deserialize)]
struct GithubCommentCreateResponse {
    id: u64,
}

/// REST client for the GitHub issues API, bound to one repository.
///
/// Every call is attempted once; failures surface to the caller.
#[derive(Clone)]
pub struct GithubApiClient {
    http: reqwest::Client,
    api_base: String,
    repo: RepoRef,
}

impl GithubApiClient {
    pub fn new(
        api_base: String,
        token: String,
        repo: RepoRef,
        request_timeout_ms: u64,
    ) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("issue-template-warden"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        let auth_header = format!("Bearer {}", token.trim());
        let mut auth_value = reqwest::header::HeaderValue::from_str(&auth_header)
            .context("invalid github authorization header")?;
        auth_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create github api client")?;
        Ok(Self {
            http: client,
            api_base: api_base.trim_end_matches('/').to_string(),
            repo,
        })
    }

    fn issue_url(&self, issue_number: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}",
            self.api_base, self.repo.owner, self.repo.name, issue_number
        )
    }

    async fn send(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .with_context(|| format!("github api {operation} request failed"))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        bail!(
            "github api {operation} failed with status {}: {}",
            status.as_u16(),
            truncate_for_error(&body, ERROR_BODY_MAX_CHARS)
        );
    }

    async fn request_json<T>(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send(operation, request)
            .await?
            .json::<T>()
            .await
            .with_context(|| format!("failed to decode github {operation}"))
    }

    async fn request_text(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<String> {
        self.send(operation, request)
            .await?
            .text()
            .await
            .with_context(|| format!("failed to read github {operation} body"))
    }
}

#[async_trait]
impl IssueTracker for GithubApiClient {
    async fn list_open_issues_page(
        &self,
        label_name: &str,
        page: u32,
    ) -> Result<Vec<GithubIssue>> {
        let request = self
            .http
            .get(format!(
                "{}/repos/{}/{}/issues",
                self.api_base, self.repo.owner, self.repo.name
            ))
            .query(&[
                ("state", "open"),
                ("sort", "updated"),
                ("direction", "desc"),
                ("labels", label_name),
            ])
            .query(&[("per_page", ISSUES_PAGE_SIZE), ("page", page)]);
        self.request_json("list issues", request).await
    }

    async fn list_issue_events_page(
        &self,
        issue_number: u64,
        page: u32,
    ) -> Result<Vec<GithubIssueEvent>> {
        let request = self
            .http
            .get(format!("{}/events", self.issue_url(issue_number)))
            .query(&[("per_page", EVENTS_PAGE_SIZE), ("page", page)]);
        self.request_json("list issue events", request).await
    }

    async fn list_issue_comments_page(
        &self,
        issue_number: u64,
        page: u32,
    ) -> Result<Vec<GithubIssueComment>> {
        let request = self
            .http
            .get(format!("{}/comments", self.issue_url(issue_number)))
            .query(&[("per_page", COMMENTS_PAGE_SIZE), ("page", page)]);
        self.request_json("list issue comments", request).await
    }

    async fn get_issue(&self, issue_number: u64) -> Result<GithubIssue> {
        let request = self.http.get(self.issue_url(issue_number));
        self.request_json("get issue", request).await
    }

    async fn list_directory(&self, path: &str) -> Result<Vec<GithubContentEntry>> {
        let request = self.http.get(format!(
            "{}/{}",
            self.api_base,
            contents_api_path(&self.repo.owner, &self.repo.name, path)
        ));
        let listing: Value = self.request_json("get repository content", request).await?;
        if !listing.is_array() {
            bail!("expected {path} to be a directory");
        }
        serde_json::from_value(listing)
            .with_context(|| format!("failed to decode directory listing for {path}"))
    }

    async fn download_text(&self, url: &str) -> Result<String> {
        self.request_text("download file", self.http.get(url)).await
    }

    async fn create_issue_comment(&self, issue_number: u64, body: &str) -> Result<u64> {
        let payload = json!({ "body": body });
        let request = self
            .http
            .post(format!("{}/comments", self.issue_url(issue_number)))
            .json(&payload);
        let created: GithubCommentCreateResponse =
            self.request_json("create issue comment", request).await?;
        Ok(created.id)
    }

    async fn close_issue(&self, issue_number: u64) -> Result<()> {
        let payload = json!({ "state": "closed" });
        let request = self.http.patch(self.issue_url(issue_number)).json(&payload);
        self.send("close issue", request).await?;
        Ok(())
    }
}
