use awesome_stars::cli::{Cli, Command};
use awesome_stars::document::DEFAULT_TITLE;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_render_arguments() {
    let cli = Cli::try_parse_from([
        "awesome-stars",
        "render",
        "--snapshot",
        "my-stars.json",
        "--output",
        "README.md",
        "--tagline",
        "Things I starred",
    ])
    .expect("parse render");

    match cli.command {
        Command::Render(args) => {
            assert_eq!(args.snapshot, PathBuf::from("my-stars.json"));
            assert_eq!(args.output, Some(PathBuf::from("README.md")));
            let options = args.document_options();
            assert_eq!(options.title, DEFAULT_TITLE);
            assert_eq!(options.tagline, "Things I starred");
        }
        _ => panic!("Expected render command"),
    }
}

#[test]
fn test_analyze_pacing_arguments() {
    let cli = Cli::try_parse_from([
        "awesome-stars",
        "analyze",
        "--readme",
        "stars.md",
        "--batch-size",
        "10",
        "--concurrency",
        "4",
        "--request-delay-ms",
        "0",
        "--batch-pause-ms",
        "500",
    ])
    .expect("parse analyze");

    match cli.command {
        Command::Analyze(args) => {
            assert_eq!(args.readme, PathBuf::from("stars.md"));
            let config = args.analyzer_config();
            assert_eq!(config.batch_size, 10);
            assert_eq!(config.concurrency, 4);
            assert_eq!(config.request_delay, Duration::ZERO);
            assert_eq!(config.batch_pause, Duration::from_millis(500));
        }
        _ => panic!("Expected analyze command"),
    }
}

#[test]
fn test_lint_json_flag() {
    let cli = Cli::try_parse_from(["awesome-stars", "lint", "--readme", "README.md", "--json"])
        .expect("parse lint");
    assert!(matches!(cli.command, Command::Lint(args) if args.json));
}

#[test]
fn test_subcommand_is_required() {
    assert!(Cli::try_parse_from(["awesome-stars"]).is_err());
}

#[test]
fn test_analyze_output_defaults_to_timestamped_file() {
    let cli = Cli::try_parse_from(["awesome-stars", "analyze"]).expect("parse analyze");
    let now = chrono::DateTime::parse_from_rfc3339("2025-03-04T05:06:07Z")
        .expect("valid timestamp")
        .with_timezone(&chrono::Utc);

    match cli.command {
        Command::Analyze(args) => {
            assert_eq!(args.output_path(now), PathBuf::from("staleness_analysis_20250304_050607.json"));
        }
        _ => panic!("Expected analyze command"),
    }
}

#[test]
fn test_analyze_explicit_output_wins() {
    let cli = Cli::try_parse_from(["awesome-stars", "analyze", "-o", "report.json"]).expect("parse analyze");
    match cli.command {
        Command::Analyze(args) => {
            assert_eq!(args.output_path(chrono::Utc::now()), PathBuf::from("report.json"));
        }
        _ => panic!("Expected analyze command"),
    }
}

#[test]
fn test_analyze_limit_keeps_leading_repositories() {
    let repos: Vec<String> = ["a/one", "a/two", "a/three"].iter().map(|r| r.to_string()).collect();

    let cli = Cli::try_parse_from(["awesome-stars", "analyze", "--limit", "2"]).expect("parse analyze");
    match cli.command {
        Command::Analyze(args) => {
            assert_eq!(args.limit, Some(2));
            assert_eq!(args.select(repos.clone()), vec!["a/one", "a/two"]);
        }
        _ => panic!("Expected analyze command"),
    }

    let cli = Cli::try_parse_from(["awesome-stars", "analyze"]).expect("parse analyze");
    match cli.command {
        Command::Analyze(args) => assert_eq!(args.select(repos.clone()), repos),
        _ => panic!("Expected analyze command"),
    }
}
