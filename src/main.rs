use anyhow::{bail, Context};
use awesome_stars::analyzer::Analyzer;
use awesome_stars::cli::{AnalyzeArgs, Cli, Command, ExportArgs, LintArgs, RenderArgs};
use awesome_stars::document::AwesomeDocument;
use awesome_stars::github::GitHubClient;
use awesome_stars::lint::lint_document;
use awesome_stars::models::StarSnapshot;
use awesome_stars::readme::{entry_repos, extract_github_repos, parse_document};
use awesome_stars::summary::{render_analysis_summary, render_lint_summary};
use clap::Parser;
use colored::*;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("awesome_stars=info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render(args) => render(args),
        Command::Lint(args) => lint(args),
        Command::Export(args) => export(args),
        Command::Analyze(args) => analyze(args).await,
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("README file not found: {}", path.display()))
}

fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote output");
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn render(args: RenderArgs) -> anyhow::Result<()> {
    let snapshot = StarSnapshot::load(&args.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?;
    let document = AwesomeDocument::from_snapshot(&snapshot, &args.document_options());
    info!(
        user = %snapshot.username,
        sections = document.sections.len(),
        entries = document.entry_count(),
        "Rendering document"
    );
    write_output(args.output.as_deref(), &document.render())
}

fn lint(args: LintArgs) -> anyhow::Result<()> {
    let content = read_file(&args.readme)?;
    let report = lint_document(&content);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_lint_summary(&report));
    }

    if !report.is_clean() {
        bail!("{} has {} lint issue(s)", args.readme.display(), report.issues.len());
    }
    Ok(())
}

fn export(args: ExportArgs) -> anyhow::Result<()> {
    let content = read_file(&args.readme)?;
    let document = parse_document(&content)
        .with_context(|| format!("Failed to parse {}", args.readme.display()))?;
    let mut json = serde_json::to_string_pretty(&document.to_snapshot())?;
    json.push('\n');
    write_output(args.output.as_deref(), &json)
}

async fn analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let content = read_file(&args.readme)?;

    println!("{}", "🔍 AWESOME STARS STALENESS ANALYSIS".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    let repos = match parse_document(&content) {
        Ok(document) => entry_repos(&document),
        Err(e) => {
            warn!(error = %e, "README is not in the rendered layout, scanning every GitHub link");
            extract_github_repos(&content)
        }
    };
    println!("📊 Found {} unique repositories", repos.len());
    let repos = args.select(repos);
    if let Some(limit) = args.limit {
        println!("🔬 Analyzing a sample of the first {} repositories", limit.min(repos.len()));
    }

    let client = GitHubClient::new(args.token.clone())?.with_base_url(args.api_url.clone());
    if !client.has_token() {
        warn!("No GitHub token provided. Rate limits will be very restrictive. Set GITHUB_TOKEN or use --token");
    }

    let analyzer = Analyzer::new(client, args.analyzer_config());

    tokio::select! {
        report = analyzer.analyze(&repos) => {
            let output = args.output_path(report.analysis_date);
            report.save(&output)
                .with_context(|| format!("Failed to save results to {}", output.display()))?;
            println!("\n💾 Results saved to: {}", output.display());
            print!("{}", render_analysis_summary(&report));
            println!("\n{}", "✅ Analysis complete!".green());
        }
        _ = tokio::signal::ctrl_c() => {
            bail!("Analysis interrupted by user");
        }
    }

    Ok(())
}
