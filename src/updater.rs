use std::borrow::Cow;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use chrono::Datelike;
use log::info;
use regex::NoExpand;
use regex::Regex;
use tokio::process::Command;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+").unwrap());

static USER_AGENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Chrome/[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+").unwrap());

/// First year of every copyright span we roll forward.
const COPYRIGHT_START_YEAR: i32 = 2014;

/// Which job the run performs, as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobType {
    UserAgent,
    LicenseYear,
}

impl FromStr for JobType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user-agent" => Ok(Self::UserAgent),
            "license-year" => Ok(Self::LicenseYear),
            _ => bail!("Job type not found: {}", s),
        }
    }
}

impl Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserAgent => f.write_str("user-agent"),
            Self::LicenseYear => f.write_str("license-year"),
        }
    }
}

/// The text substitution applied to every file in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Updater {
    /// Point `Chrome/x.x.x.x` User-Agent strings at the installed browser.
    UserAgent { version: String },
    /// Extend `Copyright (c) 2014-<last year>` to the current year.
    LicenseYear { year: i32 },
}

impl Updater {
    /// Build the updater for `job_type`, probing the browser or the clock as needed.
    pub async fn for_job(job_type: JobType, browser: &str) -> Result<Self> {
        let updater = match job_type {
            JobType::UserAgent => Self::UserAgent {
                version: detect_browser_version(browser).await?,
            },
            JobType::LicenseYear => Self::LicenseYear {
                year: chrono::Local::now().year(),
            },
        };
        Ok(updater)
    }

    pub fn replace<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match self {
            Self::UserAgent { version } => {
                USER_AGENT_RE.replace_all(text, NoExpand(&format!("Chrome/{version}")))
            }
            Self::LicenseYear { year } => roll_copyright_year(text, *year),
        }
    }

    pub fn commit_message(&self) -> String {
        match self {
            Self::UserAgent { version } => format!("Update User-Agent for DNS to Chrome {version}."),
            Self::LicenseYear { year } => format!("Update copyright year to {year}."),
        }
    }

    pub fn branch_name(&self) -> String {
        match self {
            Self::UserAgent { version } => format!("chrome_{version}"),
            Self::LicenseYear { year } => format!("copyright_to_{year}"),
        }
    }
}

/// Rewrite `<last year>` to `year` in every `copyright (c) 2014-<last year>`,
/// matched ASCII case-insensitively and keeping the notice's own case.
fn roll_copyright_year(text: &str, year: i32) -> Cow<'_, str> {
    let previous = (year - 1).to_string();
    let notice = format!("copyright (c) {COPYRIGHT_START_YEAR}-{previous}");
    // ASCII lowering keeps byte offsets identical to `text`.
    let lower = text.to_ascii_lowercase();
    let mut matches = lower.match_indices(&notice).peekable();
    if matches.peek().is_none() {
        return Cow::Borrowed(text);
    }

    let year = year.to_string();
    let mut updated = String::with_capacity(text.len());
    let mut last = 0;
    for (start, _) in matches {
        let end = start + notice.len();
        updated.push_str(&text[last..end - previous.len()]);
        updated.push_str(&year);
        last = end;
    }
    updated.push_str(&text[last..]);
    Cow::Owned(updated)
}

/// Ask the browser binary for its version, e.g. `Google Chrome 118.0.5993.70`.
async fn detect_browser_version(browser: &str) -> Result<String> {
    let output = Command::new(browser)
        .arg("--version")
        .output()
        .await
        .with_context(|| format!("Failed to execute {browser}"))?;

    if !output.status.success() {
        bail!(
            "{} --version failed: {}",
            browser,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let version = parse_browser_version(&String::from_utf8_lossy(&output.stdout))?;
    info!("Current version: {version}.");
    Ok(version)
}

fn parse_browser_version(output: &str) -> Result<String> {
    VERSION_RE
        .find(output)
        .map(|m| m.as_str().to_string())
        .with_context(|| format!("No browser version found in: {}", output.trim()))
}
