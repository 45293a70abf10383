use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::issue_config::ConfigError;

/// Repository coordinates every tracker call is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parse an `owner/repo` slug.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        let (owner, name) = trimmed
            .split_once('/')
            .ok_or_else(|| ConfigError::InvalidRepo(raw.to_string()))?;
        let owner = owner.trim();
        let name = name.trim();
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(ConfigError::InvalidRepo(raw.to_string()));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The issue and label that triggered a comment-mode run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub issue_number: u64,
    pub label_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GithubUser {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GithubIssueLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubIssue {
    pub id: u64,
    pub number: u64,
    #[serde(default)]
    pub user: Option<GithubUser>,
}

impl GithubIssue {
    /// Author login, if the tracker returned a non-blank one.
    pub fn author_login(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|user| user.login.trim())
            .filter(|login| !login.is_empty())
    }
}

/// One entry of an issue's timeline of events, oldest first within a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GithubIssueEvent {
    pub id: u64,
    pub event: String,
    #[serde(default)]
    pub label: Option<GithubIssueLabel>,
    pub created_at: DateTime<Utc>,
}

impl GithubIssueEvent {
    pub const LABELED: &'static str = "labeled";

    /// True for a `labeled` event whose label name matches exactly.
    pub fn is_labeled_with(&self, label_name: &str) -> bool {
        self.event == Self::LABELED
            && self
                .label
                .as_ref()
                .is_some_and(|label| label.name == label_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GithubIssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<GithubUser>,
}

/// Entry of a repository contents listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GithubContentEntry {
    pub path: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{GithubIssue, GithubIssueEvent, RepoRef};
    use crate::issue_config::ConfigError;
    use serde_json::json;

    #[test]
    fn unit_repo_ref_parse_accepts_owner_repo_slug() {
        let repo = RepoRef::parse(" octo/widgets ").expect("repo");
        assert_eq!(repo.owner, "octo");
        assert_eq!(repo.name, "widgets");
        assert_eq!(repo.to_string(), "octo/widgets");
    }

    #[test]
    fn regression_repo_ref_parse_rejects_malformed_slugs() {
        for raw in ["octo", "/widgets", "octo/", "octo/widgets/extra"] {
            assert_eq!(
                RepoRef::parse(raw),
                Err(ConfigError::InvalidRepo(raw.to_string()))
            );
        }
    }

    #[test]
    fn functional_issue_event_deserializes_labeled_and_unlabeled_shapes() {
        let labeled: GithubIssueEvent = serde_json::from_value(json!({
            "id": 11,
            "event": "labeled",
            "label": { "name": "bad", "color": "ff0000" },
            "created_at": "2026-01-02T03:04:05Z",
            "actor": { "login": "maintainer" }
        }))
        .expect("labeled event");
        assert!(labeled.is_labeled_with("bad"));
        assert!(!labeled.is_labeled_with("Bad"));

        let closed: GithubIssueEvent = serde_json::from_value(json!({
            "id": 12,
            "event": "closed",
            "created_at": "2026-01-02T03:04:06Z"
        }))
        .expect("closed event");
        assert!(closed.label.is_none());
        assert!(!closed.is_labeled_with("bad"));
    }

    #[test]
    fn regression_unlabeled_event_with_matching_name_is_not_a_label_application() {
        let unlabeled: GithubIssueEvent = serde_json::from_value(json!({
            "id": 13,
            "event": "unlabeled",
            "label": { "name": "bad" },
            "created_at": "2026-01-02T03:04:05Z"
        }))
        .expect("unlabeled event");
        assert!(!unlabeled.is_labeled_with("bad"));
    }

    #[test]
    fn unit_issue_author_login_ignores_missing_and_blank_users() {
        let with_user: GithubIssue = serde_json::from_value(json!({
            "id": 1, "number": 7, "title": "t", "user": { "login": "alice" }
        }))
        .expect("issue");
        assert_eq!(with_user.author_login(), Some("alice"));

        let ghost: GithubIssue = serde_json::from_value(json!({
            "id": 2, "number": 8, "title": "t", "user": null
        }))
        .expect("issue");
        assert_eq!(ghost.author_login(), None);

        let blank: GithubIssue = serde_json::from_value(json!({
            "id": 3, "number": 9, "user": { "login": "  " }
        }))
        .expect("issue");
        assert_eq!(blank.author_login(), None);
    }
}
