//! Shared helpers for the issue-template warden.
//! This crate holds the GitHub wire types, label-history resolution, template
//! frontmatter parsing, and comment rendering consumed by the runtime crate.
//! Nothing in here performs I/O.

pub mod github_transport_helpers;
pub mod issue_comment;
pub mod issue_config;
pub mod issue_label_history;
pub mod issue_pagination;
pub mod issue_template;
pub mod issue_types;
pub mod tracked_labels;
