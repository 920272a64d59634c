//! Clients for the external systems the bot drives.
//!
//! - [`git`]: Git working-copy operations (clone, branch, commit, push)
//! - [`github`]: GitHub pull request listing and creation
//! - [`github_curl`]: Curl-based HTTP client for making GitHub API requests
//!
//! The pipeline talks to [`git::GitOps`] and [`github::GithubOps`] so tests can
//! swap in mocks or fakes.

pub mod git;
pub mod github;
pub mod github_curl;
