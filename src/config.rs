/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, JWT_SECRET, DATABASE_URL, CORS 許可など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::services::auth::token::DEFAULT_TTL_SECONDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
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
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // HMAC secret shared by token issuance and verification.
    // Fixed for the lifetime of the process (no rotation).
    pub jwt_secret: Vec<u8>,
    pub token_ttl_seconds: u64,

    pub database_url: Option<String>,
    pub access_log_path: Option<PathBuf>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print secrets
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("access_log_path", &self.access_log_path)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process env in production).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match get("PORT") {
            Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = get("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let jwt_secret = get("JWT_SECRET")
            .ok_or(ConfigError::Missing("JWT_SECRET"))?
            .into_bytes();
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let token_ttl_seconds = match get("TOKEN_TTL_SECONDS") {
            Some(s) => s
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ttl| *ttl > 0)
                .ok_or(ConfigError::Invalid("TOKEN_TTL_SECONDS"))?,
            None => DEFAULT_TTL_SECONDS,
        };

        let database_url = get("DATABASE_URL").filter(|s| !s.trim().is_empty());
        let access_log_path = get("ACCESS_LOG_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            jwt_secret,
            token_ttl_seconds,
            database_url,
            access_log_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.token_ttl_seconds, 86_400);
        assert_eq!(config.jwt_secret, b"s3cret");
        assert!(config.database_url.is_none());
        assert!(config.access_log_path.is_none());
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn missing_or_empty_secret_fails() {
        assert!(matches!(
            Config::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("JWT_SECRET"))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("JWT_SECRET", "")])),
            Err(ConfigError::Invalid("JWT_SECRET"))
        ));
    }

    #[test]
    fn explicit_values_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "9000"),
            ("APP_ENV", "PROD"),
            ("TOKEN_TTL_SECONDS", "60"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
            ("ACCESS_LOG_PATH", "/tmp/access.log"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 9000);
        assert!(config.app_env.is_production());
        assert_eq!(config.token_ttl_seconds, 60);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.access_log_path, Some(PathBuf::from("/tmp/access.log")));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("JWT_SECRET", "x"), ("PORT", "http")])),
            Err(ConfigError::Invalid("PORT"))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("JWT_SECRET", "x"), ("TOKEN_TTL_SECONDS", "0")])),
            Err(ConfigError::Invalid("TOKEN_TTL_SECONDS"))
        ));
    }
}
