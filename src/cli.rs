use crate::analyzer::AnalyzerConfig;
use crate::document::{DocumentOptions, DEFAULT_TAGLINE, DEFAULT_TITLE};
use crate::github::API_BASE_URL;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "awesome-stars")]
#[command(about = "Awesome Stars - Renders, lints and audits a list of starred GitHub repositories")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render the list from a star snapshot
    Render(RenderArgs),
    /// Check a list for broken anchors, duplicate headings and malformed entries
    Lint(LintArgs),
    /// Convert a rendered list back into a star snapshot
    Export(ExportArgs),
    /// Look up every listed repository and report stale ones
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
pub struct RenderArgs {
    /// Star snapshot (JSON)
    #[arg(long, env = "AWESOME_STARS_SNAPSHOT", default_value = "stars.json")]
    pub snapshot: PathBuf,

    /// Write the document here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Document title
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Quote shown under the title
    #[arg(long, default_value = DEFAULT_TAGLINE)]
    pub tagline: String,
}

impl RenderArgs {
    pub fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            title: self.title.clone(),
            tagline: self.tagline.clone(),
        }
    }
}

#[derive(Args)]
pub struct LintArgs {
    /// Path to README.md file
    #[arg(long, env = "AWESOME_STARS_README", default_value = "README.md")]
    pub readme: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Path to README.md file
    #[arg(long, env = "AWESOME_STARS_README", default_value = "README.md")]
    pub readme: PathBuf,

    /// Write the snapshot here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to README.md file
    #[arg(long, env = "AWESOME_STARS_README", default_value = "README.md")]
    pub readme: PathBuf,

    /// Output JSON file path [default: staleness_analysis_<timestamp>.json]
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Only analyze the first N repositories
    #[arg(long)]
    pub limit: Option<usize>,

    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API root
    #[arg(long, env = "GITHUB_API_URL", default_value = API_BASE_URL)]
    pub api_url: String,

    /// Repositories per batch
    #[arg(long, default_value_t = 50)]
    pub batch_size: usize,

    /// Lookups in flight at once
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Delay after each lookup, in milliseconds
    #[arg(long, default_value_t = 50)]
    pub request_delay_ms: u64,

    /// Pause between batches, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub batch_pause_ms: u64,
}

impl AnalyzeArgs {
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            batch_size: self.batch_size,
            concurrency: self.concurrency,
            request_delay: Duration::from_millis(self.request_delay_ms),
            batch_pause: Duration::from_millis(self.batch_pause_ms),
        }
    }

    /// Where the report is saved; timestamped when `--output` is not given.
    pub fn output_path(&self, now: DateTime<Utc>) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!("staleness_analysis_{}.json", now.format("%Y%m%d_%H%M%S")))
        })
    }

    /// Keeps the first `--limit` repositories, in README order.
    pub fn select(&self, mut repos: Vec<String>) -> Vec<String> {
        if let Some(limit) = self.limit {
            repos.truncate(limit);
        }
        repos
    }
}
