use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub feature_flags: FeatureFlagConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Verification settings for tokens issued by the hosted identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Expected `aud` claim; skipped when unset.
    #[serde(default)]
    pub audience: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), session_cookie: default_session_cookie(), audience: None }
    }
}

fn default_session_cookie() -> String { "sb-access-token".into() }

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

/// A single limit: at most `max_requests` per `window_secs`.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct RateLimitRule {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl RateLimitRule {
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        Self { max_requests, window_secs }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
    #[serde(default = "default_api_rule")]
    pub api: RateLimitRule,
    #[serde(default = "default_public_rule")]
    pub public: RateLimitRule,
    #[serde(default = "default_assessment_rule")]
    pub assessment: RateLimitRule,
    #[serde(default = "default_bulk_rule")]
    pub bulk: RateLimitRule,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cleanup_interval_secs: default_cleanup_interval(),
            api: default_api_rule(),
            public: default_public_rule(),
            assessment: default_assessment_rule(),
            bulk: default_bulk_rule(),
        }
    }
}

fn default_true() -> bool { true }
fn default_cleanup_interval() -> u64 { 300 }
fn default_api_rule() -> RateLimitRule { RateLimitRule::new(100, 15 * 60) }
fn default_public_rule() -> RateLimitRule { RateLimitRule::new(1000, 60 * 60) }
fn default_assessment_rule() -> RateLimitRule { RateLimitRule::new(3, 60 * 60) }
fn default_bulk_rule() -> RateLimitRule { RateLimitRule::new(10, 60 * 60) }

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_max_metrics")]
    pub max_metrics: usize,
    #[serde(default = "default_slow_request_ms")]
    pub slow_request_ms: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self { max_metrics: default_max_metrics(), slow_request_ms: default_slow_request_ms() }
    }
}

fn default_max_metrics() -> usize { 10_000 }
fn default_slow_request_ms() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlagConfig {
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_flag_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for FeatureFlagConfig {
    fn default() -> Self {
        Self { environment: default_environment(), cache_ttl_secs: default_flag_ttl() }
    }
}

fn default_environment() -> String { "production".into() }
fn default_flag_ttl() -> u64 { 60 }

/// Load from `CONFIG_PATH` (default `config.toml`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !std::path::Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env_overrides();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Environment variables win over file values, except `DATABASE_URL`
    /// which only fills an empty `database.url`.
    pub fn apply_env_overrides(&mut self) {
        self.database.normalize_from_env();
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            if !secret.trim().is_empty() {
                self.auth.jwt_secret = secret;
            }
        }
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Ok(env) = std::env::var("APP_ENV") {
            self.feature_flags.environment = env;
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.rate_limit.validate()?;
        self.monitoring.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or JWT_SECRET"));
        }
        if self.session_cookie.trim().is_empty() {
            return Err(anyhow!("auth.session_cookie must not be empty"));
        }
        Ok(())
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, rule) in [
            ("api", self.api),
            ("public", self.public),
            ("assessment", self.assessment),
            ("bulk", self.bulk),
        ] {
            if rule.max_requests == 0 || rule.window_secs == 0 {
                return Err(anyhow!("rate_limit.{name} needs max_requests > 0 and window_secs > 0"));
            }
        }
        if self.cleanup_interval_secs == 0 {
            return Err(anyhow!("rate_limit.cleanup_interval_secs must be > 0"));
        }
        Ok(())
    }
}

impl MonitoringConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_metrics == 0 {
            return Err(anyhow!("monitoring.max_metrics must be >= 1"));
        }
        Ok(())
    }
}
