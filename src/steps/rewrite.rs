use anyhow::Context;
use anyhow::Result;
use colored::Colorize;
use log::debug;
use walkdir::WalkDir;

use crate::App;
use crate::clients::git::GitOps;
use crate::clients::github::GithubOps;
use crate::content::Content;
use crate::content::classify;
use crate::context::JobContext;

/// Version control metadata, never touched.
const GIT_DIR: &str = ".git";

impl<G: GitOps, H: GithubOps> App<G, H> {
    /// Apply the updater to every text file in the working copy.
    ///
    /// Each rewritten path is printed relative to the repository root.
    /// Returns how many files were rewritten.
    pub async fn rewrite_files(
        &self,
        ctx: &JobContext,
        stdout: &mut impl std::io::Write,
    ) -> Result<usize> {
        let walker = WalkDir::new(&ctx.repo_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != GIT_DIR);

        let mut modified = 0;
        for entry in walker {
            let entry = entry.context("Failed to walk repository")?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let Content::Text(original) = classify(&bytes) else {
                debug!("Skipping binary file {}", path.display());
                continue;
            };

            let updated = self.updater.replace(original);
            if updated == original {
                continue;
            }

            tokio::fs::write(path, updated.as_bytes())
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;

            if modified == 0 {
                writeln!(stdout, "{}", "Modified files:".bold())?;
            }
            let relative = path.strip_prefix(&ctx.repo_dir).unwrap_or(path);
            writeln!(stdout, "{}", relative.display())?;
            modified += 1;
        }

        Ok(modified)
    }
}
