use anyhow::Context;
use anyhow::Result;
use log::info;

use crate::App;
use crate::clients::git::GitOps;
use crate::clients::github::GithubOps;
use crate::config::redact_url;
use crate::context::JobContext;

impl<G: GitOps, H: GithubOps> App<G, H> {
    pub async fn clone_repo(&self, ctx: &JobContext) -> Result<()> {
        let url = redact_url(&ctx.clone_url);
        info!("Cloning {} into {}", url, ctx.repo_dir.display());
        self.git
            .clone_repo(&ctx.clone_url)
            .await
            .with_context(|| format!("Failed to clone {url}"))
    }
}
