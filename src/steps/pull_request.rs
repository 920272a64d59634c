use anyhow::Context;
use anyhow::Result;
use tracing::error;
use tracing::instrument;

use crate::App;
use crate::Outcome;
use crate::clients::git::GitOps;
use crate::clients::github::GithubOps;
use crate::context::JobContext;

impl<G: GitOps, H: GithubOps> App<G, H> {
    /// Open a pull request for the update branch unless one is already open.
    ///
    /// A failure to create the pull request is logged and reported as
    /// [`Outcome::PullRequestFailed`]; the branch is already pushed by then.
    #[instrument(skip_all)]
    pub async fn open_pull_request(&self, ctx: &JobContext) -> Result<Outcome> {
        let branch = self.updater.branch_name();
        let base = ctx
            .base_branch
            .as_deref()
            .context("Base branch is not known yet")?;

        let pulls = self.gh.list_pulls().await?;
        if pulls.iter().any(|pr| pr.head.ref_name == branch) {
            return Ok(Outcome::PullRequestExists);
        }

        let title = self.updater.commit_message();
        match self.gh.create_pull(&title, "", &branch, base).await {
            Ok(url) => Ok(Outcome::PullRequestCreated(url)),
            Err(e) => {
                error!("Failed to create pull request for {}: {:#}", branch, e);
                Ok(Outcome::PullRequestFailed)
            }
        }
    }
}
