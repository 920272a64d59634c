use anyhow::Result;
use anyhow::bail;
use log::info;

use crate::App;
use crate::Outcome;
use crate::clients::git::GitOps;
use crate::clients::github::GithubOps;
use crate::context::JobContext;

/// Remote the update branch is pushed to.
pub const REMOTE: &str = "origin";

pub const COMMITTER_NAME: &str = "GitHub Action";
pub const COMMITTER_EMAIL: &str = "action@github.com";

impl<G: GitOps, H: GithubOps> App<G, H> {
    /// Commit the rewritten files on the update branch and push it.
    ///
    /// Records the branch checked out after cloning as the base branch. Returns
    /// [`Outcome::BranchExists`] without touching anything when a previous run
    /// already created the update branch.
    pub async fn commit_and_push(
        &self,
        ctx: &mut JobContext,
        stdout: &mut impl std::io::Write,
    ) -> Result<Option<Outcome>> {
        let branch = self.updater.branch_name();
        let message = self.updater.commit_message();

        let branches = self.git.branches().await?;
        if branches.current.is_empty() {
            bail!("No branch is checked out in {}", ctx.repo_dir.display());
        }
        ctx.base_branch = Some(branches.current.clone());

        if branches.contains(&branch) {
            return Ok(Some(Outcome::BranchExists(branch)));
        }

        self.git.set_remote_url(REMOTE, &ctx.clone_url).await?;
        self.git.set_config("user.name", COMMITTER_NAME).await?;
        self.git.set_config("user.email", COMMITTER_EMAIL).await?;
        self.git.checkout_new_branch(&branch).await?;
        self.git.add_all().await?;
        self.git.commit(&message).await?;

        // Hooks may rewrite the message; never push a commit we didn't author.
        let committed = self.git.head_commit_message().await?;
        if committed != message {
            bail!(
                "Commit message mismatch: expected {:?}, found {:?}",
                message,
                committed
            );
        }

        self.git.push_upstream(REMOTE, &branch).await?;
        info!("Pushed {} to {}", branch, REMOTE);
        writeln!(stdout, "Commit message: {}", committed)?;

        Ok(None)
    }
}
