use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Runs git in `dir`, failing on a non-zero exit.
pub async fn git(dir: &Path, args: &[&str]) -> anyhow::Result<()> {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;
    anyhow::ensure!(status.success(), "git {} failed", args.join(" "));

    Ok(())
}

/// Runs git in `dir` and returns its raw stdout.
pub async fn git_output(dir: &Path, args: &[&str]) -> anyhow::Result<Vec<u8>> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await?;
    anyhow::ensure!(output.status.success(), "git {} failed", args.join(" "));

    Ok(output.stdout)
}

/// Creates a git repository in the given directory.
///
/// This initializes the repo on `main` and sets basic git config needed for
/// commits. The directory should already exist.
pub async fn create_git_repo(dir: &Path) -> anyhow::Result<()> {
    git(dir, &["init", "-b", "main"]).await?;
    git(dir, &["config", "user.name", "Test User"]).await?;
    git(dir, &["config", "user.email", "test@example.com"]).await?;

    Ok(())
}

/// Builds a bare repository at `remote` whose `main` holds `files`.
pub async fn create_remote(
    root: &Path,
    remote: &Path,
    files: &[(&str, &[u8])],
) -> anyhow::Result<()> {
    let seed = root.join("seed");
    tokio::fs::create_dir_all(&seed).await?;
    create_git_repo(&seed).await?;
    for (name, contents) in files {
        let path = seed.join(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, contents).await?;
    }
    git(&seed, &["add", "."]).await?;
    git(&seed, &["commit", "-m", "Initial commit"]).await?;

    tokio::fs::create_dir_all(remote).await?;
    git(remote, &["init", "--bare", "-b", "main"]).await?;
    let remote_url = remote.display().to_string();
    git(&seed, &["remote", "add", "origin", &remote_url]).await?;
    git(&seed, &["push", "origin", "main"]).await?;

    Ok(())
}

pub fn setup_logging() -> anyhow::Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_test_writer()
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).try_init()?;
    Ok(())
}

pub enum TestDir {
    Temp(tempfile::TempDir),
    Kept(std::path::PathBuf),
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;

        if std::env::var("DEBUG_TESTS").is_ok() {
            let path = temp_dir.keep();
            eprintln!("Test directory kept at: {}", path.display());
            Ok(TestDir::Kept(path))
        } else {
            Ok(TestDir::Temp(temp_dir))
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            TestDir::Temp(t) => t.path(),
            TestDir::Kept(p) => p.as_path(),
        }
    }
}
