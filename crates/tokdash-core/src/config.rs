use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false/1/0, got \"{other}\""),
            }),
        }
    };

    let apify_api_token = require("APIFY_API_TOKEN")?;

    let env = parse_environment(&or_default("TOKDASH_ENV", "development"));

    let log_level = or_default("TOKDASH_LOG_LEVEL", "info");
    let profiles_path = PathBuf::from(or_default("TOKDASH_PROFILES_PATH", "./config/profiles.yaml"));
    let output_path = PathBuf::from(or_default(
        "TOKDASH_OUTPUT_PATH",
        "./dashboard/public/data.json",
    ));

    let actor_id = or_default("TOKDASH_ACTOR_ID", "GdWCkxBtKWOsKjdch");
    let oldest_post_days = parse_u32("TOKDASH_OLDEST_POST_DAYS", "60")?;
    let results_per_page = parse_u32("TOKDASH_RESULTS_PER_PAGE", "100")?;
    let download_avatars = parse_bool("TOKDASH_DOWNLOAD_AVATARS", "true")?;
    let download_covers = parse_bool("TOKDASH_DOWNLOAD_COVERS", "true")?;

    let max_concurrent_profiles = parse_usize("TOKDASH_MAX_CONCURRENT_PROFILES", "8")?;
    let request_timeout_secs = parse_u64("TOKDASH_REQUEST_TIMEOUT_SECS", "30")?;
    let run_wait_secs = parse_u64("TOKDASH_RUN_WAIT_SECS", "60")?;
    let run_timeout_secs = parse_u64("TOKDASH_RUN_TIMEOUT_SECS", "600")?;
    let max_retries = parse_u32("TOKDASH_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("TOKDASH_RETRY_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        apify_api_token,
        env,
        log_level,
        profiles_path,
        output_path,
        actor_id,
        oldest_post_days,
        results_per_page,
        download_avatars,
        download_covers,
        max_concurrent_profiles,
        request_timeout_secs,
        run_wait_secs,
        run_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
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
mod tests {
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

    /// Returns a map with all required env vars populated with valid values.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("APIFY_API_TOKEN", "apify_api_test_token");
        m
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("unknown"), Environment::Development);
    }

    #[test]
    fn ansi_logs_disabled_only_in_production() {
        assert!(Environment::Development.ansi_logs());
        assert!(Environment::Test.ansi_logs());
        assert!(!Environment::Production.ansi_logs());
    }

    #[test]
    fn build_app_config_fails_without_apify_token() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "APIFY_API_TOKEN"),
            "expected MissingEnvVar(APIFY_API_TOKEN), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_all_required_vars() {
        let map = full_env();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.actor_id, "GdWCkxBtKWOsKjdch");
        assert_eq!(cfg.oldest_post_days, 60);
        assert_eq!(cfg.results_per_page, 100);
        assert!(cfg.download_avatars);
        assert!(cfg.download_covers);
        assert_eq!(cfg.max_concurrent_profiles, 8);
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.run_wait_secs, 60);
        assert_eq!(cfg.run_timeout_secs, 600);
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.retry_backoff_base_ms, 1000);
    }

    #[test]
    fn build_app_config_default_paths() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.profiles_path.to_string_lossy(),
            "./config/profiles.yaml"
        );
        assert_eq!(
            cfg.output_path.to_string_lossy(),
            "./dashboard/public/data.json"
        );
    }

    #[test]
    fn build_app_config_max_concurrent_profiles_override() {
        let mut map = full_env();
        map.insert("TOKDASH_MAX_CONCURRENT_PROFILES", "2");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.max_concurrent_profiles, 2);
    }

    #[test]
    fn build_app_config_max_concurrent_profiles_invalid() {
        let mut map = full_env();
        map.insert("TOKDASH_MAX_CONCURRENT_PROFILES", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TOKDASH_MAX_CONCURRENT_PROFILES"),
            "expected InvalidEnvVar(TOKDASH_MAX_CONCURRENT_PROFILES), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_oldest_post_days_override() {
        let mut map = full_env();
        map.insert("TOKDASH_OLDEST_POST_DAYS", "30");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.oldest_post_days, 30);
    }

    #[test]
    fn build_app_config_download_avatars_accepts_numeric_bool() {
        let mut map = full_env();
        map.insert("TOKDASH_DOWNLOAD_AVATARS", "0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(!cfg.download_avatars);
    }

    #[test]
    fn build_app_config_download_covers_invalid_bool() {
        let mut map = full_env();
        map.insert("TOKDASH_DOWNLOAD_COVERS", "yes");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TOKDASH_DOWNLOAD_COVERS"),
            "expected InvalidEnvVar(TOKDASH_DOWNLOAD_COVERS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_run_timeout_secs_override() {
        let mut map = full_env();
        map.insert("TOKDASH_RUN_TIMEOUT_SECS", "120");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.run_timeout_secs, 120);
    }

    #[test]
    fn build_app_config_retry_backoff_base_ms_invalid() {
        let mut map = full_env();
        map.insert("TOKDASH_RETRY_BACKOFF_BASE_MS", "fast");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TOKDASH_RETRY_BACKOFF_BASE_MS"),
            "expected InvalidEnvVar(TOKDASH_RETRY_BACKOFF_BASE_MS), got: {result:?}"
        );
    }

    #[test]
    fn debug_redacts_api_token() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("apify_api_test_token"));
        assert!(rendered.contains("[redacted]"));
    }
}
