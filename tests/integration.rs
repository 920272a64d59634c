//! cargo test --test integration -- --nocapture

mod utils;

use std::cell::Cell;
use std::cell::RefCell;
use std::path::Path;

use upkeep::App;
use upkeep::JobContext;
use upkeep::Outcome;
use upkeep::Updater;
use upkeep::clients::git::GitClient;
use upkeep::clients::github::GithubOps;
use upkeep::clients::github::PullRequest;

const LICENSE: &[u8] = b"MIT License\n\nCopyright (c) 2014-2025 Example Authors\n";
const LOGO: &[u8] = b"\x89PNG\r\n\x1a\n\0\0Copyright (c) 2014-2025 Example Authors\0";
const BRANCH: &str = "copyright_to_2026";

#[ctor::ctor]
fn init() {
    // Disable colors for all integration tests to get clean output
    colored::control::set_override(false);
    utils::setup_logging().unwrap();
}

/// Records what the pipeline asks of GitHub.
#[derive(Default)]
struct FakeForge {
    open: Vec<PullRequest>,
    listed: Cell<usize>,
    created: RefCell<Vec<(String, String, String, String)>>,
}

impl GithubOps for FakeForge {
    async fn list_pulls(&self) -> anyhow::Result<Vec<PullRequest>> {
        self.listed.set(self.listed.get() + 1);
        Ok(self.open.clone())
    }

    async fn create_pull(
        &self,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> anyhow::Result<String> {
        let mut created = self.created.borrow_mut();
        created.push((
            title.to_string(),
            body.to_string(),
            head.to_string(),
            base.to_string(),
        ));
        Ok(format!("https://github.com/octo/widgets/pull/{}", created.len()))
    }
}

fn app(repo_dir: &Path) -> App<GitClient, FakeForge> {
    App::new(
        Updater::LicenseYear { year: 2026 },
        GitClient::new(repo_dir.to_path_buf()),
        FakeForge::default(),
    )
}

fn context(remote: &Path, repo_dir: &Path) -> JobContext {
    JobContext::new(
        "octo",
        "widgets",
        remote.display().to_string(),
        repo_dir.to_path_buf(),
    )
}

#[tokio::test]
async fn test_license_year_end_to_end() -> anyhow::Result<()> {
    let test_dir = utils::TestDir::new()?;
    let root = test_dir.path();
    let remote = root.join("remote.git");
    utils::create_remote(
        root,
        &remote,
        &[
            ("LICENSE", LICENSE),
            ("assets/logo.png", LOGO),
            ("README.md", b"# Widgets\n"),
        ],
    )
    .await?;

    let repo_dir = root.join("work").join("widgets");
    let app = app(&repo_dir);
    let mut ctx = context(&remote, &repo_dir);
    let mut out = Vec::new();
    let outcome = app.run(&mut ctx, &mut out).await?;

    assert_eq!(
        outcome,
        Outcome::PullRequestCreated("https://github.com/octo/widgets/pull/1".to_string())
    );
    insta::assert_snapshot!(String::from_utf8(out)?, @r"
    Modified files:
    LICENSE
    Commit message: Update copyright year to 2026.
    Pull request is created: https://github.com/octo/widgets/pull/1
    ");

    // The pull request targets the branch the clone started on.
    assert_eq!(
        app.gh.created.borrow().as_slice(),
        &[(
            "Update copyright year to 2026.".to_string(),
            String::new(),
            BRANCH.to_string(),
            "main".to_string(),
        )]
    );

    // The branch reached the remote with the rewritten license only.
    let license = utils::git_output(&remote, &["show", &format!("{BRANCH}:LICENSE")]).await?;
    assert_eq!(
        String::from_utf8(license)?,
        "MIT License\n\nCopyright (c) 2014-2026 Example Authors\n"
    );
    let logo = utils::git_output(&remote, &["show", &format!("{BRANCH}:assets/logo.png")]).await?;
    assert_eq!(logo, LOGO);
    let message = utils::git_output(&remote, &["log", "-1", "--format=%an <%ae>%n%B", BRANCH]).await?;
    assert_eq!(
        String::from_utf8(message)?.trim_end(),
        "GitHub Action <action@github.com>\nUpdate copyright year to 2026."
    );

    Ok(())
}

#[tokio::test]
async fn test_second_run_finds_existing_branch() -> anyhow::Result<()> {
    let test_dir = utils::TestDir::new()?;
    let root = test_dir.path();
    let remote = root.join("remote.git");
    utils::create_remote(root, &remote, &[("LICENSE", LICENSE)]).await?;

    let first_dir = root.join("first").join("widgets");
    let first = app(&first_dir);
    let outcome = first
        .run(&mut context(&remote, &first_dir), &mut Vec::new())
        .await?;
    assert!(matches!(outcome, Outcome::PullRequestCreated(_)));

    let second_dir = root.join("second").join("widgets");
    let second = app(&second_dir);
    let mut out = Vec::new();
    let outcome = second
        .run(&mut context(&remote, &second_dir), &mut out)
        .await?;

    assert_eq!(outcome, Outcome::BranchExists(BRANCH.to_string()));
    assert_eq!(second.gh.listed.get(), 0);
    assert!(second.gh.created.borrow().is_empty());
    insta::assert_snapshot!(String::from_utf8(out)?, @r"
    Modified files:
    LICENSE
    Our branch already exists: copyright_to_2026
    ");

    Ok(())
}

#[tokio::test]
async fn test_nothing_to_do_leaves_remote_alone() -> anyhow::Result<()> {
    let test_dir = utils::TestDir::new()?;
    let root = test_dir.path();
    let remote = root.join("remote.git");
    utils::create_remote(
        root,
        &remote,
        &[("LICENSE", b"Copyright (c) 2014-2026 Example Authors\n")],
    )
    .await?;

    let repo_dir = root.join("work").join("widgets");
    let app = app(&repo_dir);
    let mut out = Vec::new();
    let outcome = app.run(&mut context(&remote, &repo_dir), &mut out).await?;

    assert_eq!(outcome, Outcome::NothingToDo);
    assert_eq!(app.gh.listed.get(), 0);
    let branches = utils::git_output(&remote, &["branch", "--format=%(refname:short)"]).await?;
    assert_eq!(String::from_utf8(branches)?.trim(), "main");

    Ok(())
}

#[tokio::test]
async fn test_clone_failure_is_an_error() -> anyhow::Result<()> {
    let test_dir = utils::TestDir::new()?;
    let root = test_dir.path();

    let repo_dir = root.join("work").join("widgets");
    let app = app(&repo_dir);
    let mut out = Vec::new();
    let result = app
        .run(&mut context(&root.join("missing.git"), &repo_dir), &mut out)
        .await;

    assert!(result.is_err());
    assert!(!repo_dir.exists());
    assert!(out.is_empty());

    Ok(())
}
