/*
 * Responsibility
 * - 環境変数や設定の読み込み (CORS 許可、token 有効期限、HTTP 制限など)
 * - 設定値のバリデーション (不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // None => in-memory realm
    pub database_url: Option<String>,
    // in-memory realm + development only: fixed token for the dev principal
    pub dev_token: Option<String>,

    pub token_ttl: Duration,
    pub token_purge_interval: Duration,

    pub request_body_limit: usize,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            app_env: AppEnv::Development,
            cors_allowed_origins: Vec::new(),
            database_url: None,
            dev_token: None,
            token_ttl: Duration::from_secs(12 * 60 * 60),
            token_purge_interval: Duration::from_secs(10 * 60),
            request_body_limit: 1024 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Optional numeric variable: unset → `None`, unparsable → `ConfigError::Invalid`.
fn parse_var<T: FromStr>(key: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key)),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (env in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port: u16 = parse_var("PORT", lookup("PORT"))?.unwrap_or(3000);
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(defaults.app_env);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|v| split_origins(&v))
            .unwrap_or_default();

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let dev_token = lookup("DEV_TOKEN").filter(|v| !v.trim().is_empty());

        let token_ttl = parse_var::<u64>("TOKEN_TTL_SECONDS", lookup("TOKEN_TTL_SECONDS"))?
            .map(Duration::from_secs)
            .unwrap_or(defaults.token_ttl);

        let token_purge_interval = parse_var::<u64>(
            "TOKEN_PURGE_INTERVAL_SECONDS",
            lookup("TOKEN_PURGE_INTERVAL_SECONDS"),
        )?
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(defaults.token_purge_interval);

        let request_body_limit =
            parse_var::<usize>("REQUEST_BODY_LIMIT_BYTES", lookup("REQUEST_BODY_LIMIT_BYTES"))?
                .unwrap_or(defaults.request_body_limit);

        let request_timeout =
            parse_var::<u64>("REQUEST_TIMEOUT_SECONDS", lookup("REQUEST_TIMEOUT_SECONDS"))?
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout);

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            database_url,
            dev_token,
            token_ttl,
            token_purge_interval,
            request_body_limit,
            request_timeout,
        })
    }
}
