use std::fmt::Display;

use anyhow::Result;
use colored::Colorize;

use crate::clients::git::GitOps;
use crate::clients::github::GithubOps;
use crate::context::JobContext;
use crate::updater::Updater;

pub struct App<G: GitOps, H: GithubOps> {
    pub updater: Updater,
    pub git: G,
    pub gh: H,
}

/// How a run ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    PullRequestCreated(String),
    PullRequestExists,
    /// The branch was pushed but GitHub refused the pull request.
    PullRequestFailed,
    NothingToDo,
    BranchExists(String),
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PullRequestCreated(url) => write!(f, "Pull request is created: {url}"),
            Self::PullRequestExists => f.write_str("Pull request with this branch already exists."),
            Self::PullRequestFailed => f.write_str("Pull request could not be created."),
            Self::NothingToDo => f.write_str("No modified files."),
            Self::BranchExists(branch) => write!(f, "Our branch already exists: {branch}"),
        }
    }
}

impl<G: GitOps, H: GithubOps> App<G, H> {
    pub fn new(updater: Updater, git: G, gh: H) -> Self {
        Self { updater, git, gh }
    }

    /// Run the whole job: clone, rewrite, commit and push, open a pull request.
    ///
    /// Each step only starts once the previous one succeeded. Benign stops are
    /// returned as an [`Outcome`]; anything else is an error.
    pub async fn run(
        &self,
        ctx: &mut JobContext,
        stdout: &mut impl std::io::Write,
    ) -> Result<Outcome> {
        self.clone_repo(ctx).await?;

        if self.rewrite_files(ctx, stdout).await? == 0 {
            return self.finish(Outcome::NothingToDo, stdout);
        }

        if let Some(stop) = self.commit_and_push(ctx, stdout).await? {
            return self.finish(stop, stdout);
        }

        let outcome = self.open_pull_request(ctx).await?;
        self.finish(outcome, stdout)
    }

    fn finish(&self, outcome: Outcome, stdout: &mut impl std::io::Write) -> Result<Outcome> {
        let line = outcome.to_string();
        match outcome {
            Outcome::PullRequestCreated(_) => writeln!(stdout, "{}", line.green())?,
            Outcome::PullRequestFailed => writeln!(stdout, "{}", line.red())?,
            _ => writeln!(stdout, "{}", line.yellow())?,
        }
        Ok(outcome)
    }
}
