use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Production logs go to collectors that choke on ANSI escapes, so the
    /// CLI turns styled output off there.
    #[must_use]
    pub fn ansi_logs(&self) -> bool {
        !matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub apify_api_token: String,
    pub env: Environment,
    pub log_level: String,
    pub profiles_path: PathBuf,
    pub output_path: PathBuf,
    /// Apify actor ID of the TikTok profile scraper.
    pub actor_id: String,
    /// Fetch window: only posts newer than this many days are requested.
    pub oldest_post_days: u32,
    pub results_per_page: u32,
    pub download_avatars: bool,
    pub download_covers: bool,
    pub max_concurrent_profiles: usize,
    pub request_timeout_secs: u64,
    /// `waitForFinish` window per Apify API call (the API caps this at 300).
    pub run_wait_secs: u64,
    /// Hard deadline for a single actor run, across all polls.
    pub run_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("apify_api_token", &"[redacted]")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("profiles_path", &self.profiles_path)
            .field("output_path", &self.output_path)
            .field("actor_id", &self.actor_id)
            .field("oldest_post_days", &self.oldest_post_days)
            .field("results_per_page", &self.results_per_page)
            .field("download_avatars", &self.download_avatars)
            .field("download_covers", &self.download_covers)
            .field("max_concurrent_profiles", &self.max_concurrent_profiles)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("run_wait_secs", &self.run_wait_secs)
            .field("run_timeout_secs", &self.run_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
