mod common;

use awesome_stars::analyzer::{AnalysisReport, Analyzer, AnalyzerConfig};
use awesome_stars::summary::render_analysis_summary;
use common::{repo_info, MockSource};
use std::time::Duration;

fn fast_config(batch_size: usize, concurrency: usize) -> AnalyzerConfig {
    AnalyzerConfig {
        batch_size,
        concurrency,
        request_delay: Duration::ZERO,
        batch_pause: Duration::ZERO,
    }
}

fn names(repos: &[&str]) -> Vec<String> {
    repos.iter().map(|r| r.to_string()).collect()
}

fn report_names(bucket: &[awesome_stars::analyzer::RepoAnalysis]) -> Vec<&str> {
    bucket.iter().map(|r| r.repo.as_str()).collect()
}

fn sample_source() -> MockSource {
    let mut archived = repo_info("old/archived", 500, 2000);
    archived.archived = true;
    let mut archived_popular = repo_info("old/famous", 9000, 100);
    archived_popular.archived = true;
    let mut forked = repo_info("some/fork", 50, 400);
    forked.fork = true;

    MockSource::with(vec![
        repo_info("fresh/active", 1000, 3),
        repo_info("idle/three-years", 100, 1200),
        repo_info("idle/tiny", 2, 1500),
        archived,
        archived_popular,
        forked,
    ])
}

#[tokio::test]
async fn test_repositories_are_bucketed() {
    let analyzer = Analyzer::new(sample_source(), fast_config(50, 1));
    let repos = names(&[
        "fresh/active",
        "idle/three-years",
        "idle/tiny",
        "old/archived",
        "old/famous",
        "some/fork",
        "gone/deleted",
        "broken/repo",
    ]);

    let report = analyzer.analyze(&repos).await;

    assert_eq!(report.total_found, 8);
    assert_eq!(report.total_analyzed, 6);
    assert_eq!(report_names(&report.active_repos), vec!["fresh/active"]);
    // idle/tiny: 40 + 5, idle/three-years: 40, some/fork: 10 + 20
    assert_eq!(
        report_names(&report.possibly_stale_repos),
        vec!["idle/tiny", "idle/three-years", "some/fork"]
    );
    assert!(report.stale_repos.is_empty());
    assert_eq!(report_names(&report.archived_repos), vec!["old/famous", "old/archived"]);
    assert_eq!(report_names(&report.missing_repos), vec!["gone/deleted"]);
    assert_eq!(report.error_count(), 1);
    assert!(report.halted.is_none());
}

#[tokio::test]
async fn test_stale_repositories_sorted_by_score() {
    let mut recent_fork = repo_info("a/first", 100, 10);
    recent_fork.fork = true;
    let mut very_idle_fork = repo_info("b/second", 3, 1500);
    very_idle_fork.fork = true;
    let mut idle_fork = repo_info("c/third", 100, 800);
    idle_fork.fork = true;
    let source = MockSource::with(vec![recent_fork, idle_fork, very_idle_fork]);

    let analyzer = Analyzer::new(source, fast_config(50, 1));
    let report = analyzer.analyze(&names(&["a/first", "c/third", "b/second"])).await;

    // b/second: 10 + 40 + 5, c/third: 10 + 30
    assert_eq!(report_names(&report.stale_repos), vec!["b/second"]);
    assert_eq!(report_names(&report.possibly_stale_repos), vec!["c/third"]);
    assert_eq!(report_names(&report.active_repos), vec!["a/first"]);
    assert_eq!(report.stale_repos[0].staleness.score, 55);
}

#[tokio::test]
async fn test_missing_repositories_sorted_by_name() {
    let analyzer = Analyzer::new(MockSource::default(), fast_config(2, 1));
    let report = analyzer.analyze(&names(&["gone/zeta", "gone/alpha", "gone/mid"])).await;

    assert_eq!(report_names(&report.missing_repos), vec!["gone/alpha", "gone/mid", "gone/zeta"]);
    assert_eq!(
        report.missing_repos[0].staleness.reasons,
        vec!["Repository not found (deleted/moved)".to_string()]
    );
}

#[tokio::test]
async fn test_rate_limit_halts_remaining_batches() {
    let source = MockSource::with(vec![repo_info("a/one", 100, 1), repo_info("a/two", 100, 1)]);
    let analyzer = Analyzer::new(&source, fast_config(2, 1));

    let report = analyzer.analyze(&names(&["a/one", "limited/repo", "a/two"])).await;

    assert_eq!(source.calls(), vec!["a/one", "limited/repo"]);

    assert_eq!(report.halted.as_deref(), Some("reset in 1 hour"));
    assert_eq!(report.total_found, 3);
    assert_eq!(report.total_analyzed, 1);
    assert_eq!(report.error_count(), 1);
}

#[tokio::test]
async fn test_every_repository_is_looked_up_once_in_order() {
    let source = MockSource::with(vec![
        repo_info("a/one", 100, 1),
        repo_info("a/two", 100, 1),
        repo_info("a/three", 100, 1),
    ]);
    let analyzer = Analyzer::new(&source, fast_config(2, 3));
    let repos = names(&["a/one", "a/two", "a/three"]);

    let report = analyzer.analyze(&repos).await;

    assert_eq!(report_names(&report.active_repos), vec!["a/one", "a/two", "a/three"]);
    let mut calls = source.calls();
    calls.sort();
    assert_eq!(calls, vec!["a/one", "a/three", "a/two"]);
}

#[test]
fn test_analysis_runs_on_blocking_runtime() {
    let analyzer = Analyzer::new(MockSource::with(vec![repo_info("a/one", 100, 1)]), fast_config(1, 1));
    let report = tokio_test::block_on(analyzer.analyze(&names(&["a/one"])));
    assert_eq!(report.total_analyzed, 1);
}

#[tokio::test]
async fn test_empty_input_produces_empty_report() {
    let analyzer = Analyzer::new(MockSource::default(), AnalyzerConfig::default());
    let report = analyzer.analyze(&[]).await;
    assert_eq!(report.total_found, 0);
    assert_eq!(report.problematic_count(), 0);
}

#[test]
fn test_report_serializes_buckets() {
    let report = AnalysisReport::new(0);
    let json = serde_json::to_value(&report).unwrap();
    for key in [
        "analysis_date",
        "total_found",
        "archived_repos",
        "stale_repos",
        "possibly_stale_repos",
        "active_repos",
        "missing_repos",
        "error_repos",
    ] {
        assert!(json.get(key).is_some(), "missing key {}", key);
    }
}

#[tokio::test]
async fn test_summary_lists_counts_and_recommendations() {
    colored::control::set_override(false);
    let analyzer = Analyzer::new(sample_source(), fast_config(50, 1));
    let report = analyzer
        .analyze(&names(&["fresh/active", "old/archived", "gone/deleted"]))
        .await;

    let summary = render_analysis_summary(&report);

    assert!(summary.contains("Total repositories found: 3"));
    assert!(summary.contains("Archived repositories: 1"));
    assert!(summary.contains("Missing/deleted repositories: 1"));
    assert!(summary.contains("2 repositories (66.7%) may need attention"));
    assert!(summary.contains("• gone/deleted"));
}
