use super::*;
use crate::commands::merge_subreddits;

#[test]
fn parses_discover_with_limit() {
    let cli = Cli::try_parse_from(["trendforge", "discover", "--niche", "sourdough", "--limit", "5"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Discover { ref niche, limit: Some(5) } if niche == "sourdough"
    ));
}

#[test]
fn parses_repeated_subreddits_for_trends() {
    let cli = Cli::try_parse_from([
        "trendforge",
        "trends",
        "--niche",
        "sourdough",
        "--subreddit",
        "Breadit",
        "--subreddit",
        "Sourdough",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Trends {
            subreddits, json, ..
        } => {
            assert_eq!(subreddits, vec!["Breadit", "Sourdough"]);
            assert!(!json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_run_with_all_flags() {
    let cli = Cli::try_parse_from([
        "trendforge",
        "run",
        "--niche",
        "warhammer painting",
        "--discover",
        "--channel-url",
        "https://www.youtube.com/@Ninjon",
        "--json",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Run {
            niche,
            subreddits,
            discover,
            channel_url,
            channel_description,
            json,
        } => {
            assert_eq!(niche, "warhammer painting");
            assert!(subreddits.is_empty());
            assert!(discover);
            assert_eq!(channel_url.as_deref(), Some("https://www.youtube.com/@Ninjon"));
            assert!(channel_description.is_none());
            assert!(json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn channel_url_and_description_conflict() {
    let result = Cli::try_parse_from([
        "trendforge",
        "run",
        "--niche",
        "x",
        "--channel-url",
        "https://www.youtube.com/@a",
        "--channel-description",
        "b",
    ]);
    assert!(result.is_err());
}

#[test]
fn run_requires_niche() {
    assert!(Cli::try_parse_from(["trendforge", "run"]).is_err());
}

#[test]
fn merge_subreddits_skips_case_insensitive_duplicates() {
    let mut subs = vec!["Breadit".to_string()];
    merge_subreddits(
        &mut subs,
        vec!["breadit".to_string(), "Sourdough".to_string()],
    );
    assert_eq!(subs, vec!["Breadit", "Sourdough"]);
}
