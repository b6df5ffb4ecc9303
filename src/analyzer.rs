use crate::error::{AwesomeStarsError, Result};
use crate::github::RepoSource;
use crate::staleness::{assess, assess_failure, StalenessAssessment, StalenessCategory};
use crate::types::GitHubRepo;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Pacing of repository lookups
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Repositories looked up before pausing
    pub batch_size: usize,
    /// Lookups in flight at once within a batch
    pub concurrency: usize,
    /// Delay after each lookup
    pub request_delay: Duration,
    /// Pause between two batches
    pub batch_pause: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            concurrency: 1,
            request_delay: Duration::from_millis(50),
            batch_pause: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoAnalysis {
    pub repo: String,
    pub url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub staleness: StalenessAssessment,
}

impl RepoAnalysis {
    fn analyzed(full_name: &str, info: &GitHubRepo, now: DateTime<Utc>) -> Self {
        Self {
            repo: full_name.to_string(),
            url: info.html_url.clone(),
            description: info.description.clone(),
            language: info.language.clone(),
            created_at: info.created_at,
            staleness: assess(info, now),
        }
    }

    fn failed(full_name: &str, reason: impl Into<String>) -> Self {
        Self {
            repo: full_name.to_string(),
            url: format!("https://github.com/{}", full_name),
            description: None,
            language: None,
            created_at: None,
            staleness: assess_failure(reason),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_date: DateTime<Utc>,
    pub total_found: usize,
    pub total_analyzed: usize,
    pub archived_repos: Vec<RepoAnalysis>,
    pub stale_repos: Vec<RepoAnalysis>,
    pub possibly_stale_repos: Vec<RepoAnalysis>,
    pub active_repos: Vec<RepoAnalysis>,
    pub missing_repos: Vec<RepoAnalysis>,
    pub error_repos: Vec<RepoAnalysis>,
    /// Set when the rate limit stopped the run before every repository was seen.
    pub halted: Option<String>,
}

impl AnalysisReport {
    pub fn new(total_found: usize) -> Self {
        Self {
            analysis_date: Utc::now(),
            total_found,
            total_analyzed: 0,
            archived_repos: Vec::new(),
            stale_repos: Vec::new(),
            possibly_stale_repos: Vec::new(),
            active_repos: Vec::new(),
            missing_repos: Vec::new(),
            error_repos: Vec::new(),
            halted: None,
        }
    }

    /// Files one lookup outcome into its bucket.
    pub fn record(&mut self, full_name: &str, outcome: Result<GitHubRepo>, now: DateTime<Utc>) {
        let info = match outcome {
            Ok(info) => info,
            Err(AwesomeStarsError::NotFound(_)) => {
                self.missing_repos
                    .push(RepoAnalysis::failed(full_name, "Repository not found (deleted/moved)"));
                return;
            }
            Err(e) => {
                warn!(repo = full_name, error = %e, "Repository lookup failed");
                self.error_repos.push(RepoAnalysis::failed(full_name, e.to_string()));
                return;
            }
        };

        self.total_analyzed += 1;
        let analysis = RepoAnalysis::analyzed(full_name, &info, now);
        if analysis.staleness.archived {
            self.archived_repos.push(analysis);
            return;
        }
        match analysis.staleness.category {
            StalenessCategory::VeryStale | StalenessCategory::Stale => self.stale_repos.push(analysis),
            StalenessCategory::PossiblyStale => self.possibly_stale_repos.push(analysis),
            StalenessCategory::Active | StalenessCategory::Error => self.active_repos.push(analysis),
        }
    }

    /// Orders every bucket for reading: worst first, archived by popularity.
    pub fn sort(&mut self) {
        self.stale_repos
            .sort_by(|a, b| b.staleness.score.cmp(&a.staleness.score));
        self.possibly_stale_repos
            .sort_by(|a, b| b.staleness.score.cmp(&a.staleness.score));
        self.archived_repos
            .sort_by(|a, b| b.staleness.stars.cmp(&a.staleness.stars));
        self.missing_repos.sort_by(|a, b| a.repo.cmp(&b.repo));
    }

    pub fn error_count(&self) -> usize {
        self.error_repos.len()
    }

    /// Repositories that likely need removal or review.
    pub fn problematic_count(&self) -> usize {
        self.stale_repos.len() + self.archived_repos.len() + self.missing_repos.len()
    }

    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

pub struct Analyzer<S> {
    source: S,
    config: AnalyzerConfig,
}

impl<S: RepoSource> Analyzer<S> {
    pub fn new(source: S, config: AnalyzerConfig) -> Self {
        Self { source, config }
    }

    pub async fn analyze(&self, repos: &[String]) -> AnalysisReport {
        let mut report = AnalysisReport::new(repos.len());
        let batch_size = self.config.batch_size.max(1);
        let concurrency = self.config.concurrency.max(1);
        let batch_count = repos.len().div_ceil(batch_size);
        let source = &self.source;
        let delay = self.config.request_delay;

        for (batch_index, batch) in repos.chunks(batch_size).enumerate() {
            let first = batch_index * batch_size + 1;
            info!(
                batch = batch_index + 1,
                batches = batch_count,
                from = first,
                to = first + batch.len() - 1,
                "Processing batch"
            );

            let outcomes: Vec<(&String, Result<GitHubRepo>)> = stream::iter(batch)
                .map(move |repo| async move {
                    let outcome = source.repo_info(repo).await;
                    if !delay.is_zero() {
                        sleep(delay).await;
                    }
                    (repo, outcome)
                })
                .buffered(concurrency)
                .collect()
                .await;

            let now = Utc::now();
            for (repo, outcome) in outcomes {
                if let Err(AwesomeStarsError::RateLimitExceeded(message)) = &outcome {
                    report.halted.get_or_insert_with(|| message.clone());
                }
                report.record(repo, outcome, now);
            }

            if let Some(reason) = &report.halted {
                warn!(%reason, "Stopping analysis, rate limit exhausted");
                break;
            }

            if batch_index + 1 < batch_count && !self.config.batch_pause.is_zero() {
                info!(
                    pause_ms = self.config.batch_pause.as_millis() as u64,
                    "Pausing between batches"
                );
                sleep(self.config.batch_pause).await;
            }
        }

        report.sort();
        info!(
            found = report.total_found,
            analyzed = report.total_analyzed,
            stale = report.stale_repos.len(),
            archived = report.archived_repos.len(),
            missing = report.missing_repos.len(),
            errors = report.error_count(),
            "Analysis complete"
        );
        report
    }
}
