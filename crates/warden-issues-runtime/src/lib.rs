//! Issue-template warden runtime: the GitHub client and the processor that
//! comments on labeled issues and closes stale ones.

mod github_api_client;
mod issue_processor;
mod issue_tracker;

pub use github_api_client::GithubApiClient;
pub use issue_processor::{
    IssueProcessor, NotifyOutcome, ProcessorError, RunOutcome, SweepFailure, SweepReport,
};
pub use issue_tracker::{collect_pages, IssueTracker};
