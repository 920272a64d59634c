use std::fmt;
use std::path;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;

/// Run-scoped settings gathered from the command line and the CI environment.
#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub server_url: String,
    pub api_url: String,
    /// Directory the repository is cloned into, as `<work_dir>/<repo>`.
    pub work_dir: path::PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"***")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("server_url", &self.server_url)
            .field("api_url", &self.api_url)
            .field("work_dir", &self.work_dir)
            .finish()
    }
}

impl Config {
    pub fn new(
        token: String,
        repository: &str,
        server_url: String,
        api_url: String,
        work_dir: path::PathBuf,
    ) -> Result<Self> {
        let (owner, repo) = Self::parse_repository(repository)?;
        Ok(Self {
            token,
            owner,
            repo,
            server_url,
            api_url,
            work_dir,
        })
    }

    /// Split `owner/repo` as found in `GITHUB_REPOSITORY`.
    pub fn parse_repository(repository: &str) -> Result<(String, String)> {
        let repository = repository.trim().trim_end_matches(".git");
        let Some((owner, repo)) = repository.split_once('/') else {
            bail!("Repository must look like owner/repo, got: {}", repository);
        };
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            bail!("Repository must look like owner/repo, got: {}", repository);
        }
        Ok((owner.to_string(), repo.to_string()))
    }

    /// Runs triggered by pull requests do nothing, including the bot's own.
    pub fn is_pull_request_event(event_name: &str) -> bool {
        event_name.starts_with("pull_request")
    }

    /// HTTPS clone URL carrying the token, e.g.
    /// `https://x-access-token:<token>@github.com/owner/repo`.
    pub fn clone_url(&self) -> Result<String> {
        let (scheme, host) = self
            .server_url
            .trim_end_matches('/')
            .split_once("://")
            .context("Server URL must include a scheme")?;
        if host.is_empty() {
            bail!("Server URL has no host: {}", self.server_url);
        }
        Ok(format!(
            "{scheme}://x-access-token:{}@{host}/{}/{}",
            self.token, self.owner, self.repo
        ))
    }

    pub fn repo_dir(&self) -> path::PathBuf {
        self.work_dir.join(&self.repo)
    }

    /// Default config for tests
    pub fn default_for_tests() -> Self {
        Self {
            token: "secret-token".to_string(),
            owner: "octo".to_string(),
            repo: "widgets".to_string(),
            server_url: "https://github.com".to_string(),
            api_url: "https://api.github.com".to_string(),
            work_dir: path::PathBuf::from("."),
        }
    }
}

/// Hide the userinfo part of a URL so tokens stay out of logs.
pub fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{scheme}://***@{}", &rest[at + 1..]),
        None => url.to_string(),
    }
}
