use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
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

    let database_url = optional("DATABASE_URL");
    let env = parse_environment(&or_default("PARTNEROS_ENV", "development"));
    let log_level = or_default("PARTNEROS_LOG_LEVEL", "info");

    let openai_api_key = optional("OPENAI_API_KEY");
    let openai_base_url = or_default("PARTNEROS_OPENAI_BASE_URL", "https://api.openai.com/v1");
    let classify_model = or_default("PARTNEROS_CLASSIFY_MODEL", "gpt-4o-mini");
    let summarize_model = or_default("PARTNEROS_SUMMARIZE_MODEL", "gpt-4o-mini");
    let insight_model = or_default("PARTNEROS_INSIGHT_MODEL", "gpt-4o");

    let llm_timeout_secs = parse_u64("PARTNEROS_LLM_TIMEOUT_SECS", "30")?;
    if llm_timeout_secs == 0 {
        return Err(invalid(
            "PARTNEROS_LLM_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let llm_max_retries = parse_u32("PARTNEROS_LLM_MAX_RETRIES", "2")?;
    let llm_retry_backoff_base_ms = parse_u64("PARTNEROS_LLM_RETRY_BACKOFF_BASE_MS", "500")?;

    let llm_adjustment_bound = or_default("PARTNEROS_LLM_ADJUSTMENT_BOUND", "20")
        .parse::<f64>()
        .map_err(|e| invalid("PARTNEROS_LLM_ADJUSTMENT_BOUND", e.to_string()))?;
    if !llm_adjustment_bound.is_finite() || llm_adjustment_bound < 0.0 {
        return Err(invalid(
            "PARTNEROS_LLM_ADJUSTMENT_BOUND",
            "must be a finite, non-negative number".to_string(),
        ));
    }

    let db_max_connections = parse_u32("PARTNEROS_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("PARTNEROS_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("PARTNEROS_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let feed_request_timeout_secs = parse_u64("PARTNEROS_FEED_REQUEST_TIMEOUT_SECS", "30")?;
    let feed_user_agent = or_default(
        "PARTNEROS_FEED_USER_AGENT",
        "Mozilla/5.0 (compatible; PartnerOS/1.0)",
    );
    let ingest_max_partners = parse_usize("PARTNEROS_INGEST_MAX_PARTNERS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        openai_api_key,
        openai_base_url,
        classify_model,
        summarize_model,
        insight_model,
        llm_timeout_secs,
        llm_max_retries,
        llm_retry_backoff_base_ms,
        llm_adjustment_bound,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        feed_request_timeout_secs,
        feed_user_agent,
        ingest_max_partners,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
