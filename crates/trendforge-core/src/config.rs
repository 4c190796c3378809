use crate::app_config::{AppConfig, Environment, RedditCredentials};
use crate::ConfigError;

const MAX_IDEA_COUNT: usize = 50;
const MAX_TITLES_PER_IDEA: usize = 10;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but invalid, or if the
/// Reddit credentials are only partially configured.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = parse_usize(var, default)?;
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let parse_bounded = |var: &str, default: &str, max: usize| -> Result<usize, ConfigError> {
        let value = parse_positive(var, default)?;
        if value > max {
            return Err(invalid(var, format!("{value} exceeds the maximum of {max}")));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("TRENDFORGE_ENV", "development"))?;

    let bind_addr = or_default("TRENDFORGE_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("TRENDFORGE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("TRENDFORGE_LOG_LEVEL", "info");

    let llm_api_key = optional("OPENAI_API_KEY");
    let llm_base_url = or_default("TRENDFORGE_LLM_BASE_URL", "https://api.openai.com/v1");
    let llm_model = or_default("TRENDFORGE_LLM_MODEL", "gpt-4o");
    let llm_temperature = or_default("TRENDFORGE_LLM_TEMPERATURE", "0.7")
        .parse::<f32>()
        .map_err(|e| invalid("TRENDFORGE_LLM_TEMPERATURE", e.to_string()))?;
    if !(0.0..=2.0).contains(&llm_temperature) {
        return Err(invalid(
            "TRENDFORGE_LLM_TEMPERATURE",
            format!("{llm_temperature} is outside 0.0..=2.0"),
        ));
    }
    let llm_timeout_secs = parse_u64("TRENDFORGE_LLM_TIMEOUT_SECS", "120")?;

    let reddit = parse_reddit_credentials(
        optional("REDDIT_CLIENT_ID"),
        optional("REDDIT_CLIENT_SECRET"),
        optional("REDDIT_USER_AGENT"),
    )?;
    let youtube_api_key = optional("YOUTUBE_API_KEY");

    let http_timeout_secs = parse_u64("TRENDFORGE_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TRENDFORGE_USER_AGENT", "trendforge/0.1 (content-ideation)");
    let reddit_post_limit = parse_positive("TRENDFORGE_REDDIT_POST_LIMIT", "10")?;
    let subreddit_discovery_limit = parse_positive("TRENDFORGE_SUBREDDIT_DISCOVERY_LIMIT", "15")?;

    let idea_count = parse_bounded("TRENDFORGE_IDEA_COUNT", "5", MAX_IDEA_COUNT)?;
    let titles_per_idea =
        parse_bounded("TRENDFORGE_TITLES_PER_IDEA", "1", MAX_TITLES_PER_IDEA)?;
    let prompts_dir = optional("TRENDFORGE_PROMPTS_DIR").map(PathBuf::from);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        llm_api_key,
        llm_base_url,
        llm_model,
        llm_temperature,
        llm_timeout_secs,
        reddit,
        youtube_api_key,
        http_timeout_secs,
        user_agent,
        reddit_post_limit,
        subreddit_discovery_limit,
        idea_count,
        titles_per_idea,
        prompts_dir,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TRENDFORGE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// All three Reddit variables or none. A partial set is an error naming the
/// missing variables.
fn parse_reddit_credentials(
    client_id: Option<String>,
    client_secret: Option<String>,
    user_agent: Option<String>,
) -> Result<Option<RedditCredentials>, ConfigError> {
    match (client_id, client_secret, user_agent) {
        (Some(client_id), Some(client_secret), Some(user_agent)) => Ok(Some(RedditCredentials {
            client_id,
            client_secret,
            user_agent,
        })),
        (None, None, None) => Ok(None),
        (id, secret, agent) => {
            let missing: Vec<&str> = [
                ("REDDIT_CLIENT_ID", id.is_none()),
                ("REDDIT_CLIENT_SECRET", secret.is_none()),
                ("REDDIT_USER_AGENT", agent.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            Err(ConfigError::MissingEnvVar(missing.join(", ")))
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
