use std::sync::Arc;

use chrono::{Duration, SecondsFormat, Utc};
use httpmock::prelude::*;
use serde_json::{json, Value};
use warden_issues::issue_config::{ActionInputs, ProcessorConfig};
use warden_issues::issue_types::{InvocationContext, RepoRef};
use warden_issues_runtime::{
    GithubApiClient, IssueProcessor, NotifyOutcome, ProcessorError, RunOutcome,
};

const TEMPLATE_NOT_USED: &str = "template-not-used";
const DOESNT_FOLLOW: &str = "doesnt-follow-template";

fn inputs(mode: &str) -> ActionInputs {
    ActionInputs {
        mode: mode.to_string(),
        repo_token: "integration-token".to_string(),
        days_until_close: "7".to_string(),
        template_not_used_label: TEMPLATE_NOT_USED.to_string(),
        template_not_used_comment_body:
            "Hi {authorLogin}, please use one of the templates below. Closing in {daysUntilClose}."
                .to_string(),
        doesnt_follow_template_label: DOESNT_FOLLOW.to_string(),
        doesnt_follow_template_comment_body:
            "Hi {authorLogin}, please fill in the template. Closing in {daysUntilClose}."
                .to_string(),
        ..ActionInputs::default()
    }
}

fn processor(
    server: &MockServer,
    mode: &str,
    invocation: Option<InvocationContext>,
) -> IssueProcessor {
    let config = ProcessorConfig::from_inputs(inputs(mode)).expect("config");
    let repo = RepoRef::parse("octo/widgets").expect("repo");
    let client = GithubApiClient::new(
        server.base_url(),
        config.repo_token.clone(),
        repo.clone(),
        5_000,
    )
    .expect("client");
    IssueProcessor::new(config, Arc::new(client), repo).with_invocation(invocation)
}

fn invocation(issue_number: u64, label_name: &str) -> Option<InvocationContext> {
    Some(InvocationContext {
        issue_number,
        label_name: label_name.to_string(),
    })
}

fn labeled_event(id: u64, label: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "event": "labeled",
        "label": { "name": label },
        "created_at": created_at
    })
}

fn mock_issue(server: &MockServer, number: u64, login: &str) {
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/repos/octo/widgets/issues/{number}"));
        then.status(200).json_body(json!({
            "id": number * 10,
            "number": number,
            "title": "Something broke",
            "user": { "login": login }
        }));
    });
}

fn mock_paged(server: &MockServer, path: &str, first_page: Value) {
    server.mock(|when, then| {
        when.method(GET).path(path).query_param("page", "1");
        then.status(200).json_body(first_page);
    });
    server.mock(|when, then| {
        when.method(GET).path(path).query_param("page", "2");
        then.status(200).json_body(json!([]));
    });
}

fn mock_issue_listing(server: &MockServer, label: &str, first_page: Value) {
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/octo/widgets/issues")
            .query_param("labels", label)
            .query_param("page", "1");
        then.status(200).json_body(first_page);
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/octo/widgets/issues")
            .query_param("labels", label)
            .query_param("page", "2");
        then.status(200).json_body(json!([]));
    });
}

#[tokio::test]
async fn integration_template_not_used_comment_includes_repository_templates() {
    let server = MockServer::start();
    let bug_url = format!("{}/raw/bug.md", server.base_url());
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/octo/widgets/contents/.github/ISSUE_TEMPLATE");
        then.status(200).json_body(json!([
            {
                "name": "bug.md",
                "path": ".github/ISSUE_TEMPLATE/bug.md",
                "type": "file",
                "download_url": bug_url
            },
            {
                "name": "config.yml",
                "path": ".github/ISSUE_TEMPLATE/config.yml",
                "type": "file",
                "download_url": format!("{}/raw/config.yml", server.base_url())
            }
        ]));
    });
    let download = server.mock(|when, then| {
        when.method(GET).path("/raw/bug.md");
        then.status(200)
            .body("---\nname: Bug report\nabout: Report a crash\n---\n## Steps\n");
    });
    mock_issue(&server, 42, "alice");
    mock_paged(&server, "/repos/octo/widgets/issues/42/comments", json!([]));
    let expected_body = "Hi alice, please use one of the templates below. Closing in 7 days.\n\
<details><summary>Bug report</summary>\n\n```\n## Steps\n```\n</details>\n\n<!--action-template-->";
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/octo/widgets/issues/42/comments")
            .header("authorization", "Bearer integration-token")
            .json_body(json!({ "body": expected_body }));
        then.status(201).json_body(json!({ "id": 9001 }));
    });

    let outcome = processor(&server, "comment", invocation(42, TEMPLATE_NOT_USED))
        .run()
        .await
        .expect("run");

    assert_eq!(
        outcome,
        RunOutcome::Notified(NotifyOutcome::Commented {
            issue_number: 42,
            comment_id: 9001,
        })
    );
    download.assert_calls(1);
    create.assert_calls(1);
}

#[tokio::test]
async fn integration_identical_prior_bot_comment_suppresses_new_comment() {
    let server = MockServer::start();
    mock_issue(&server, 8, "bob");
    let rendered =
        "Hi bob, please fill in the template. Closing in 7 days.\n\n<!--action-template-->";
    mock_paged(
        &server,
        "/repos/octo/widgets/issues/8/comments",
        json!([
            {
                "id": 1,
                "body": "First!",
                "user": { "login": "bob" },
                "created_at": "2026-01-01T00:00:00Z"
            },
            {
                "id": 2,
                "body": rendered,
                "user": { "login": "github-actions[bot]" },
                "created_at": "2026-01-02T00:00:00Z"
            }
        ]),
    );
    let create = server.mock(|when, then| {
        when.method(POST).path("/repos/octo/widgets/issues/8/comments");
        then.status(201).json_body(json!({ "id": 1 }));
    });

    let outcome = processor(&server, "comment", invocation(8, DOESNT_FOLLOW))
        .run()
        .await
        .expect("run");

    assert_eq!(
        outcome,
        RunOutcome::Notified(NotifyOutcome::Unchanged { issue_number: 8 })
    );
    create.assert_calls(0);
}

#[tokio::test]
async fn integration_untracked_label_makes_no_api_calls() {
    let server = MockServer::start();
    let issue = server.mock(|when, then| {
        when.method(GET).path("/repos/octo/widgets/issues/3");
        then.status(500);
    });

    let outcome = processor(&server, "comment", invocation(3, "enhancement"))
        .run()
        .await
        .expect("run");

    assert_eq!(
        outcome,
        RunOutcome::Notified(NotifyOutcome::IgnoredLabel {
            label_name: "enhancement".to_string(),
        })
    );
    issue.assert_calls(0);
}

#[tokio::test]
async fn integration_close_mode_closes_only_stale_labeled_issues() {
    let server = MockServer::start();
    let recent = (Utc::now() - Duration::days(1)).to_rfc3339_opts(SecondsFormat::Secs, true);
    mock_issue_listing(
        &server,
        DOESNT_FOLLOW,
        json!([
            { "id": 10, "number": 1, "title": "stale", "user": { "login": "a" } },
            { "id": 20, "number": 2, "title": "fresh", "user": { "login": "b" } },
            { "id": 30, "number": 3, "title": "unlabeled", "user": { "login": "c" } }
        ]),
    );
    mock_issue_listing(&server, TEMPLATE_NOT_USED, json!([]));
    mock_paged(
        &server,
        "/repos/octo/widgets/issues/1/events",
        json!([
            labeled_event(100, "bug", "2020-01-01T00:00:00Z"),
            labeled_event(101, DOESNT_FOLLOW, "2020-01-02T00:00:00Z")
        ]),
    );
    mock_paged(
        &server,
        "/repos/octo/widgets/issues/2/events",
        json!([
            labeled_event(200, DOESNT_FOLLOW, "2020-01-01T00:00:00Z"),
            labeled_event(201, DOESNT_FOLLOW, &recent)
        ]),
    );
    mock_paged(
        &server,
        "/repos/octo/widgets/issues/3/events",
        json!([labeled_event(300, "bug", "2020-01-01T00:00:00Z")]),
    );
    let close_stale = server.mock(|when, then| {
        when.method(PATCH)
            .path("/repos/octo/widgets/issues/1")
            .json_body(json!({ "state": "closed" }));
        then.status(200).json_body(json!({ "id": 10, "number": 1 }));
    });
    let close_fresh = server.mock(|when, then| {
        when.method(PATCH).path("/repos/octo/widgets/issues/2");
        then.status(200).json_body(json!({ "id": 20, "number": 2 }));
    });
    let close_unlabeled = server.mock(|when, then| {
        when.method(PATCH).path("/repos/octo/widgets/issues/3");
        then.status(200).json_body(json!({ "id": 30, "number": 3 }));
    });

    let outcome = processor(&server, "close", None).run().await.expect("run");

    let RunOutcome::Swept(reports) = outcome else {
        panic!("expected sweep outcome");
    };
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].label, DOESNT_FOLLOW);
    assert_eq!(reports[0].scanned, 3);
    assert_eq!(reports[0].closed, vec![1]);
    assert_eq!(reports[0].skipped_without_event, 1);
    assert_eq!(reports[1].label, TEMPLATE_NOT_USED);
    assert_eq!(reports[1].scanned, 0);
    close_stale.assert_calls(1);
    close_fresh.assert_calls(0);
    close_unlabeled.assert_calls(0);
}

#[tokio::test]
async fn integration_close_mode_reports_failures_after_finishing_both_sweeps() {
    let server = MockServer::start();
    mock_issue_listing(
        &server,
        DOESNT_FOLLOW,
        json!([
            { "id": 40, "number": 4, "title": "broken history", "user": { "login": "d" } }
        ]),
    );
    mock_issue_listing(
        &server,
        TEMPLATE_NOT_USED,
        json!([
            { "id": 50, "number": 5, "title": "stale", "user": { "login": "e" } }
        ]),
    );
    server.mock(|when, then| {
        when.method(GET).path("/repos/octo/widgets/issues/4/events");
        then.status(500).body("upstream exploded");
    });
    mock_paged(
        &server,
        "/repos/octo/widgets/issues/5/events",
        json!([labeled_event(500, TEMPLATE_NOT_USED, "2020-01-01T00:00:00Z")]),
    );
    let close = server.mock(|when, then| {
        when.method(PATCH).path("/repos/octo/widgets/issues/5");
        then.status(200).json_body(json!({ "id": 50, "number": 5 }));
    });

    let error = processor(&server, "close", None)
        .run()
        .await
        .expect_err("sweep should report the failed issue");

    close.assert_calls(1);
    let ProcessorError::SweepIncomplete { failures } = &error else {
        panic!("unexpected error: {error}");
    };
    assert_eq!(failures.len(), 1);
    assert!(failures[0].starts_with("doesnt-follow-template#4: "));
    assert!(failures[0].contains("status 500"));
}
