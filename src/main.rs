use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use upkeep::App;
use upkeep::Config;
use upkeep::JobContext;
use upkeep::JobType;
use upkeep::Updater;
use upkeep::clients::git::GitClient;
use upkeep::clients::github::GithubClient;

#[derive(Parser)]
#[command(name = "upkeep")]
#[command(about = "Rewrite a repository's text files and open a pull request with the result", long_about = None)]
pub struct Cli {
    /// Token used to clone, push and open the pull request
    token: String,

    /// Job to run: user-agent or license-year
    job_type: String,

    /// Event that triggered the run; pull request events are ignored
    #[arg(long, env = "GITHUB_EVENT_NAME", default_value = "")]
    event_name: String,

    /// Target repository as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    #[arg(long, env = "GITHUB_SERVER_URL", default_value = "https://github.com")]
    server_url: String,

    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    api_url: String,

    /// Directory to clone into
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,

    /// Browser binary queried for the current version
    #[arg(long, default_value = "google-chrome")]
    browser: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();

    if Config::is_pull_request_event(&cli.event_name) {
        println!(
            "Event name: {}. There's nothing here yet.",
            cli.event_name
        );
        return Ok(());
    }

    let job_type: JobType = cli.job_type.parse()?;
    let Some(repository) = cli.repository.as_deref() else {
        anyhow::bail!("No repository given; set GITHUB_REPOSITORY or pass --repository");
    };
    let config = Config::new(
        cli.token,
        repository,
        cli.server_url,
        cli.api_url,
        cli.work_dir,
    )?;
    let mut ctx = JobContext::from_config(&config)?;
    info!("Running {} job for {}/{}", job_type, config.owner, config.repo);
    let updater = Updater::for_job(job_type, &cli.browser).await?;

    let app = App::new(
        updater,
        GitClient::new(ctx.repo_dir.clone()),
        GithubClient::new(config.token.clone(), &config.api_url, &config.owner, &config.repo),
    );
    app.run(&mut ctx, &mut stdout).await?;

    Ok(())
}

fn setup_logging() -> Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_writer(std::io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).init();
    Ok(())
}
