use std::fmt;
use std::path;

use anyhow::Result;

use crate::config::Config;
use crate::config::redact_url;

/// State threaded through one run of the pipeline.
pub struct JobContext {
    pub owner: String,
    pub repo: String,
    /// Clone and push URL, possibly carrying credentials.
    pub clone_url: String,
    /// Where the working copy lives.
    pub repo_dir: path::PathBuf,
    /// Branch checked out right after cloning; the pull request targets it.
    pub base_branch: Option<String>,
}

impl fmt::Debug for JobContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobContext")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("clone_url", &redact_url(&self.clone_url))
            .field("repo_dir", &self.repo_dir)
            .field("base_branch", &self.base_branch)
            .finish()
    }
}

impl JobContext {
    pub fn new(owner: &str, repo: &str, clone_url: String, repo_dir: path::PathBuf) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            clone_url,
            repo_dir,
            base_branch: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            &config.owner,
            &config.repo,
            config.clone_url()?,
            config.repo_dir(),
        ))
    }
}
