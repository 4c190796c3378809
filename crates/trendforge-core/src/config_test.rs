use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn reddit_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("REDDIT_CLIENT_ID", "client-id");
    m.insert("REDDIT_CLIENT_SECRET", "client-secret");
    m.insert("REDDIT_USER_AGENT", "trendforge-test/1.0");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("producton").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "TRENDFORGE_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("empty env is valid");

    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.llm_api_key.is_none());
    assert_eq!(cfg.llm_base_url, "https://api.openai.com/v1");
    assert_eq!(cfg.llm_model, "gpt-4o");
    assert!((cfg.llm_temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(cfg.llm_timeout_secs, 120);
    assert!(cfg.reddit.is_none());
    assert!(cfg.youtube_api_key.is_none());
    assert_eq!(cfg.http_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "trendforge/0.1 (content-ideation)");
    assert_eq!(cfg.reddit_post_limit, 10);
    assert_eq!(cfg.subreddit_discovery_limit, 15);
    assert_eq!(cfg.idea_count, 5);
    assert_eq!(cfg.titles_per_idea, 1);
    assert!(cfg.prompts_dir.is_none());
}

#[test]
fn build_app_config_reads_reddit_credentials() {
    let map = reddit_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let reddit = cfg.reddit.expect("credentials should be present");
    assert_eq!(reddit.client_id, "client-id");
    assert_eq!(reddit.user_agent, "trendforge-test/1.0");
}

#[test]
fn build_app_config_rejects_partial_reddit_credentials() {
    let mut map = reddit_env();
    map.remove("REDDIT_CLIENT_SECRET");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "REDDIT_CLIENT_SECRET"),
        "expected MissingEnvVar(REDDIT_CLIENT_SECRET), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_values_as_unset() {
    let mut map = HashMap::new();
    map.insert("OPENAI_API_KEY", "  ");
    map.insert("TRENDFORGE_LLM_MODEL", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.llm_api_key.is_none());
    assert_eq!(cfg.llm_model, "gpt-4o");
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("TRENDFORGE_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDFORGE_BIND_ADDR"),
        "expected InvalidEnvVar(TRENDFORGE_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_out_of_range_temperature() {
    let mut map = HashMap::new();
    map.insert("TRENDFORGE_LLM_TEMPERATURE", "3.5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDFORGE_LLM_TEMPERATURE"),
        "expected InvalidEnvVar(TRENDFORGE_LLM_TEMPERATURE), got: {result:?}"
    );
}

#[test]
fn build_app_config_idea_count_override() {
    let mut map = HashMap::new();
    map.insert("TRENDFORGE_IDEA_COUNT", "3");
    map.insert("TRENDFORGE_TITLES_PER_IDEA", "2");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.idea_count, 3);
    assert_eq!(cfg.titles_per_idea, 2);
}

#[test]
fn build_app_config_rejects_zero_idea_count() {
    let mut map = HashMap::new();
    map.insert("TRENDFORGE_IDEA_COUNT", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDFORGE_IDEA_COUNT"),
        "expected InvalidEnvVar(TRENDFORGE_IDEA_COUNT), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_oversized_list_counts() {
    let mut map = HashMap::new();
    map.insert("TRENDFORGE_TITLES_PER_IDEA", "18446744073709551615");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDFORGE_TITLES_PER_IDEA"),
        "expected InvalidEnvVar(TRENDFORGE_TITLES_PER_IDEA), got: {result:?}"
    );

    let mut map = HashMap::new();
    map.insert("TRENDFORGE_IDEA_COUNT", "51");
    assert!(build_app_config(lookup_from_map(&map)).is_err());

    let mut map = HashMap::new();
    map.insert("TRENDFORGE_IDEA_COUNT", "50");
    map.insert("TRENDFORGE_TITLES_PER_IDEA", "10");
    let cfg = build_app_config(lookup_from_map(&map)).expect("limits are inclusive");
    assert_eq!(cfg.idea_count * cfg.titles_per_idea, 500);
}

#[test]
fn build_app_config_rejects_non_numeric_post_limit() {
    let mut map = HashMap::new();
    map.insert("TRENDFORGE_REDDIT_POST_LIMIT", "ten");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDFORGE_REDDIT_POST_LIMIT"),
        "expected InvalidEnvVar(TRENDFORGE_REDDIT_POST_LIMIT), got: {result:?}"
    );
}

#[test]
fn build_app_config_reads_prompts_dir() {
    let mut map = HashMap::new();
    map.insert("TRENDFORGE_PROMPTS_DIR", "./prompts");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.prompts_dir, Some(std::path::PathBuf::from("./prompts")));
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = reddit_env();
    map.insert("OPENAI_API_KEY", "sk-super-secret");
    map.insert("YOUTUBE_API_KEY", "yt-super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("sk-super-secret"));
    assert!(!rendered.contains("yt-super-secret"));
    assert!(!rendered.contains("client-secret"));
    assert!(rendered.contains("[redacted]"));
}
