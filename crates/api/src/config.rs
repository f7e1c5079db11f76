use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// MongoDB connection string.
    pub mongo_url: String,
    /// MongoDB database name.
    pub db_name: String,
    /// Gemini API key. Absent means AI classification is disabled and every
    /// issue gets the safe default category/priority -- not an error.
    pub google_api_key: Option<String>,
    /// Allowed CORS origins from comma-separated `CORS_ORIGINS`.
    /// The single entry `*` (the default) allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Escalation loop tuning.
    pub escalation: EscalationConfig,
}

/// Timing knobs for the escalation loop, injectable so tests can run at
/// compressed timescales.
#[derive(Debug, Clone)]
pub struct EscalationConfig {
    /// Sleep between scan cycles while the store is healthy.
    pub scan_interval: Duration,
    /// Shorter sleep before retrying after a failed health check.
    pub backoff_interval: Duration,
    /// Age beyond which a Medium/Open issue is promoted to High.
    pub stale_after: Duration,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        EscalationConfig {
            scan_interval: Duration::from_secs(60),
            backoff_interval: Duration::from_secs(30),
            stale_after: Duration::from_secs(600),
        }
    }
}

impl EscalationConfig {
    /// Load escalation tuning from environment variables with defaults.
    ///
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `ESCALATION_SCAN_SECS`    | `60`    |
    /// | `ESCALATION_BACKOFF_SECS` | `30`    |
    /// | `ESCALATION_STALE_SECS`   | `600`   |
    pub fn from_env() -> Self {
        let defaults = EscalationConfig::default();
        EscalationConfig {
            scan_interval: env_secs("ESCALATION_SCAN_SECS", defaults.scan_interval),
            backoff_interval: env_secs("ESCALATION_BACKOFF_SECS", defaults.backoff_interval),
            stale_after: env_secs("ESCALATION_STALE_SECS", defaults.stale_after),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                     |
    /// |------------------------|-----------------------------|
    /// | `HOST`                 | `0.0.0.0`                   |
    /// | `PORT`                 | `3000`                      |
    /// | `MONGO_URL`            | `mongodb://localhost:27017` |
    /// | `DB_NAME`              | `campus_issues`             |
    /// | `GOOGLE_API_KEY`       | unset (classifier disabled) |
    /// | `CORS_ORIGINS`         | `*`                         |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let mongo_url =
            std::env::var("MONGO_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());

        let db_name = std::env::var("DB_NAME").unwrap_or_else(|_| "campus_issues".into());

        let google_api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            mongo_url,
            db_name,
            google_api_key,
            cors_origins,
            request_timeout_secs,
            escalation: EscalationConfig::from_env(),
        }
    }

    /// True when CORS should allow any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn env_secs(var: &str, default: Duration) -> Duration {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
