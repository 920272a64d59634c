#![allow(async_fn_in_trait)]

use std::path;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::instrument;

// -----------------------------------------------------------------------------
// GitOps trait

/// Operations the pipeline needs from Git.
#[cfg_attr(test, automock)]
pub trait GitOps {
    /// Clone `url` into the client's working directory.
    async fn clone_repo(&self, url: &str) -> Result<()>;

    /// Local and remote-tracking branches, plus the one currently checked out.
    async fn branches(&self) -> Result<Branches>;

    async fn set_remote_url(&self, remote: &str, url: &str) -> Result<()>;
    async fn set_config(&self, key: &str, value: &str) -> Result<()>;
    async fn checkout_new_branch(&self, branch: &str) -> Result<()>;

    /// Stage every change in the working tree.
    async fn add_all(&self) -> Result<()>;

    async fn commit(&self, message: &str) -> Result<()>;

    /// Full message of the commit at HEAD, without trailing newlines.
    async fn head_commit_message(&self) -> Result<String>;

    /// Push `branch` to `remote` and set it as upstream.
    async fn push_upstream(&self, remote: &str, branch: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branches {
    /// Checked out branch; empty on a detached HEAD.
    pub current: String,
    /// Short names, e.g. `main` and `origin/main`.
    pub all: Vec<String>,
}

impl Branches {
    /// Whether any branch name contains `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.all.iter().any(|branch| branch.contains(name))
    }
}

// -----------------------------------------------------------------------------
// GitClient

/// Git client that shells out to the git CLI inside one working copy.
pub struct GitClient {
    path: path::PathBuf,
}

impl GitClient {
    pub fn new(path: path::PathBuf) -> Self {
        Self { path }
    }

    /// Run git in the working copy and return its stdout.
    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .current_dir(&self.path)
            .args(args)
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args[0],
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}

impl GitOps for GitClient {
    #[instrument(skip_all)]
    async fn clone_repo(&self, url: &str) -> Result<()> {
        // The target does not exist yet, so run from wherever we are.
        let output = Command::new("git")
            .arg("clone")
            .arg(url)
            .arg(&self.path)
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            bail!(
                "git clone failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(())
    }

    #[instrument(skip_all)]
    async fn branches(&self) -> Result<Branches> {
        let current = self.run(&["branch", "--show-current"]).await?;
        let all = self
            .run(&["branch", "-a", "--format=%(refname:short)"])
            .await?;

        Ok(Branches {
            current: current.trim().to_string(),
            all: all
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| line.to_string())
                .collect(),
        })
    }

    async fn set_remote_url(&self, remote: &str, url: &str) -> Result<()> {
        self.run(&["remote", "set-url", remote, url]).await?;
        Ok(())
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.run(&["config", key, value]).await?;
        Ok(())
    }

    async fn checkout_new_branch(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", "-b", branch]).await?;
        Ok(())
    }

    async fn add_all(&self) -> Result<()> {
        self.run(&["add", "."]).await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message]).await?;
        Ok(())
    }

    async fn head_commit_message(&self) -> Result<String> {
        let message = self.run(&["log", "-1", "--format=%B"]).await?;
        Ok(message.trim_end_matches('\n').to_string())
    }

    #[instrument(skip_all)]
    async fn push_upstream(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", "-u", remote, branch]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branches_contains_matches_remote_tracking_names() {
        let branches = Branches {
            current: "main".to_string(),
            all: vec!["main".to_string(), "origin/chrome_100.0.0.0".to_string()],
        };
        assert!(branches.contains("chrome_100.0.0.0"));
        assert!(!branches.contains("copyright_to_2026"));
    }
}
