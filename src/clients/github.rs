#![allow(async_fn_in_trait)]

use anyhow::Result;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use serde::Serialize;
use tracing::instrument;

use super::github_curl::GithubCurlClient;

/// Pull requests fetched per page when listing.
const PAGE_SIZE: usize = 100;

// -----------------------------------------------------------------------------
// GithubOps trait

/// Pull request operations against one repository.
#[cfg_attr(test, automock)]
pub trait GithubOps {
    /// All open pull requests.
    async fn list_pulls(&self) -> Result<Vec<PullRequest>>;

    /// Create a new PR and return the PR URL
    async fn create_pull(
        &self,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<String>;
}

// -----------------------------------------------------------------------------
// Types

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
    pub head: PullRequestRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
}

#[derive(Debug, Serialize)]
struct CreatePullRequest<'a> {
    title: &'a str,
    body: &'a str,
    head: &'a str,
    base: &'a str,
}

/// Client to interact with GitHub API.
pub struct GithubClient {
    api_url: String,
    owner: String,
    repo: String,
    http_client: GithubCurlClient,
}

// -----------------------------------------------------------------------------
// GithubClient impl

impl GithubClient {
    pub fn new(token: String, api_url: &str, owner: &str, repo: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            http_client: GithubCurlClient::new(token),
        }
    }

    fn pulls_url(&self) -> String {
        format!("{}/repos/{}/{}/pulls", self.api_url, self.owner, self.repo)
    }
}

impl GithubOps for GithubClient {
    #[instrument(skip_all)]
    async fn list_pulls(&self) -> Result<Vec<PullRequest>> {
        let mut pulls = Vec::new();
        for page in 1.. {
            let url = format!(
                "{}?state=open&per_page={}&page={}",
                self.pulls_url(),
                PAGE_SIZE,
                page
            );
            let response = self.http_client.get(&url).await?;
            let batch: Vec<PullRequest> = serde_json::from_str(&response)?;
            let done = batch.len() < PAGE_SIZE;
            pulls.extend(batch);
            if done {
                break;
            }
        }
        Ok(pulls)
    }

    #[instrument(skip_all)]
    async fn create_pull(
        &self,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<String> {
        let request_body = CreatePullRequest {
            title,
            body,
            head,
            base,
        };

        let json_data = serde_json::to_string(&request_body)?;
        let response = self.http_client.post(&self.pulls_url(), &json_data).await?;
        let pr: PullRequest = serde_json::from_str(&response)?;
        Ok(pr.html_url)
    }
}
