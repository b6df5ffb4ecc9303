use crate::analyzer::{AnalysisReport, RepoAnalysis};
use crate::lint::LintReport;
use colored::*;
use std::fmt::Write;

const TOP_N: usize = 10;
const DESCRIPTION_PREVIEW: usize = 80;

fn preview(description: &str) -> String {
    if description.chars().count() <= DESCRIPTION_PREVIEW {
        return description.to_string();
    }
    let cut: String = description.chars().take(DESCRIPTION_PREVIEW).collect();
    format!("{}...", cut)
}

fn write_repo(out: &mut String, repo: &RepoAnalysis, with_reasons: bool) {
    let _ = writeln!(out, "• {} ⭐{}", repo.repo.bold(), repo.staleness.stars);
    if with_reasons {
        let _ = writeln!(
            out,
            "  Score: {} | {}",
            repo.staleness.score,
            repo.staleness.reasons.join(", ")
        );
    }
    if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "  📝 {}", preview(description).dimmed());
    }
}

/// Human-readable summary of a staleness analysis.
pub fn render_analysis_summary(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);

    let _ = writeln!(out, "\n{}", rule.dimmed());
    let _ = writeln!(out, "{}", "📈 ANALYSIS SUMMARY".bold().green());
    let _ = writeln!(out, "{}", rule.dimmed());
    let _ = writeln!(out, "Total repositories found: {}", report.total_found);
    let _ = writeln!(out, "Successfully analyzed: {}", report.total_analyzed);
    let _ = writeln!(out, "Archived repositories: {}", report.archived_repos.len());
    let _ = writeln!(out, "Stale repositories: {}", report.stale_repos.len());
    let _ = writeln!(out, "Possibly stale repositories: {}", report.possibly_stale_repos.len());
    let _ = writeln!(out, "Active repositories: {}", report.active_repos.len());
    let _ = writeln!(out, "Missing/deleted repositories: {}", report.missing_repos.len());
    let _ = writeln!(out, "Errors encountered: {}", report.error_count());

    if let Some(reason) = &report.halted {
        let _ = writeln!(out, "\n{} {}", "⚠️  Analysis stopped early:".yellow(), reason);
    }

    if !report.stale_repos.is_empty() {
        let _ = writeln!(out, "\n{}", "🔴 TOP 10 STALE REPOSITORIES:".red().bold());
        let _ = writeln!(out, "{}", "-".repeat(60));
        for repo in report.stale_repos.iter().take(TOP_N) {
            write_repo(&mut out, repo, true);
        }
    }

    if !report.possibly_stale_repos.is_empty() {
        let _ = writeln!(out, "\n{}", "🟡 TOP 10 POSSIBLY STALE REPOSITORIES:".yellow().bold());
        let _ = writeln!(out, "{}", "-".repeat(60));
        for repo in report.possibly_stale_repos.iter().take(TOP_N) {
            write_repo(&mut out, repo, true);
        }
    }

    if !report.archived_repos.is_empty() {
        let _ = writeln!(
            out,
            "\n{}",
            format!("🗄️  ARCHIVED REPOSITORIES ({}):", report.archived_repos.len()).bold()
        );
        let _ = writeln!(out, "{}", "-".repeat(60));
        for repo in report.archived_repos.iter().take(TOP_N) {
            write_repo(&mut out, repo, false);
        }
        if report.archived_repos.len() > TOP_N {
            let _ = writeln!(out, "  ... and {} more", report.archived_repos.len() - TOP_N);
        }
    }

    if !report.missing_repos.is_empty() {
        let _ = writeln!(
            out,
            "\n{}",
            format!("❌ MISSING/DELETED REPOSITORIES ({}):", report.missing_repos.len()).red().bold()
        );
        let _ = writeln!(out, "{}", "-".repeat(60));
        for repo in &report.missing_repos {
            let _ = writeln!(out, "• {}", repo.repo);
        }
    }

    if !report.error_repos.is_empty() {
        let _ = writeln!(out, "\n{}", "💥 REPOSITORIES WITH ERRORS:".red());
        let _ = writeln!(out, "{}", "-".repeat(60));
        for repo in &report.error_repos {
            let _ = writeln!(out, "• {}: {}", repo.repo, repo.staleness.reasons.join(", "));
        }
    }

    let problematic = report.problematic_count();
    if problematic > 0 && report.total_found > 0 {
        let percentage = problematic as f64 / report.total_found as f64 * 100.0;
        let _ = writeln!(out, "\n{}", "💡 RECOMMENDATIONS:".bold());
        let _ = writeln!(
            out,
            "   {} repositories ({:.1}%) may need attention:",
            problematic, percentage
        );
        let _ = writeln!(out, "   - Consider removing {} missing repositories", report.missing_repos.len());
        let _ = writeln!(out, "   - Review {} archived repositories", report.archived_repos.len());
        let _ = writeln!(out, "   - Evaluate {} stale repositories", report.stale_repos.len());
        let _ = writeln!(
            out,
            "   - Monitor {} possibly stale repositories",
            report.possibly_stale_repos.len()
        );
    }

    out
}

/// Human-readable lint result.
pub fn render_lint_summary(report: &LintReport) -> String {
    let mut out = String::new();
    for issue in &report.issues {
        let _ = writeln!(out, "{} {}", "✗".red(), issue);
    }
    if report.is_clean() {
        let _ = writeln!(
            out,
            "{} {} sections, {} entries, no issues",
            "✓".green(),
            report.sections,
            report.entries
        );
    } else {
        let _ = writeln!(
            out,
            "{} {} issue(s) in {} sections, {} entries",
            "✗".red().bold(),
            report.issues.len(),
            report.sections,
            report.entries
        );
    }
    out
}
