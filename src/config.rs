/*
 * Responsibility
 * - 環境変数の読み込み (DATABASE_URL, JWT 鍵, CORS, HTTP 制限など)
 * - token 発行は INTERNAL_ADDR (既定 127.0.0.1:4000) の内部 listener のみ
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use std::{env, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
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
    // Token issuance listener; keep it off the public interface
    pub internal_addr: SocketAddr,
    pub app_env: AppEnv,
    pub database_url: String,
    pub cors_allowed_origins: Vec<String>,

    pub auth_issuer: String,
    pub auth_audience: String,
    // Signs access tokens (Ed25519 PKCS#8 PEM)
    pub access_jwt_private_key_pem: String,
    // Verifies access tokens on protected routes
    pub access_jwt_public_key_pem: String,
    pub access_token_ttl_seconds: u64,
    pub access_token_leeway_seconds: u64,

    pub http_timeout: Duration,
    pub http_body_limit_bytes: usize,
}

// Key material and the database URL stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("internal_addr", &self.internal_addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("auth_issuer", &self.auth_issuer)
            .field("auth_audience", &self.auth_audience)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("access_token_leeway_seconds", &self.access_token_leeway_seconds)
            .field("http_timeout", &self.http_timeout)
            .field("http_body_limit_bytes", &self.http_body_limit_bytes)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parse_or("PORT", 3000)?;
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;
        let internal_addr = parse_or("INTERNAL_ADDR", SocketAddr::from(([127, 0, 0, 1], 4000)))?;
        if internal_addr == addr {
            return Err(ConfigError::Invalid("INTERNAL_ADDR"));
        }

        let app_env = AppEnv::from_env();

        let database_url = required("DATABASE_URL")?;

        let cors_allowed_origins =
            split_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let auth_issuer = required("AUTH_ISSUER")?;
        let auth_audience = required("AUTH_AUDIENCE")?;
        let access_jwt_private_key_pem = unescape_pem(&required("ACCESS_JWT_PRIVATE_KEY_PEM")?);
        let access_jwt_public_key_pem = unescape_pem(&required("ACCESS_JWT_PUBLIC_KEY_PEM")?);

        let access_token_ttl_seconds = fits_timestamp(
            "ACCESS_TOKEN_TTL_SECONDS",
            parse_or("ACCESS_TOKEN_TTL_SECONDS", 600)?, // 10 min
        )?;
        let access_token_leeway_seconds = parse_or("ACCESS_TOKEN_LEEWAY_SECONDS", 60)?;

        let http_timeout = Duration::from_secs(parse_or("HTTP_TIMEOUT_SECONDS", 30)?);
        let http_body_limit_bytes = parse_or("HTTP_BODY_LIMIT_BYTES", 1024 * 1024)?;

        Ok(Self {
            addr,
            internal_addr,
            app_env,
            database_url,
            cors_allowed_origins,
            auth_issuer,
            auth_audience,
            access_jwt_private_key_pem,
            access_jwt_public_key_pem,
            access_token_ttl_seconds,
            access_token_leeway_seconds,
            http_timeout,
            http_body_limit_bytes,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

// Unset -> default, set but unparsable -> Invalid.
fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

// JWT NumericDate is i64 seconds.
fn fits_timestamp(key: &'static str, seconds: u64) -> Result<u64, ConfigError> {
    i64::try_from(seconds)
        .map(|_| seconds)
        .map_err(|_| ConfigError::Invalid(key))
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// .env files usually carry PEMs on one line with literal "\n".
fn unescape_pem(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_env_accepts_short_and_long_production_names() {
        assert_eq!(AppEnv::parse("prod"), AppEnv::Production);
        assert_eq!(AppEnv::parse(" PRODUCTION "), AppEnv::Production);
        assert_eq!(AppEnv::parse("staging"), AppEnv::Development);
        assert!(!AppEnv::parse("").is_production());
    }

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            split_origins(" https://a.example , ,https://b.example,"),
            vec!["https://a.example", "https://b.example"]
        );
        assert!(split_origins("").is_empty());
    }

    #[test]
    fn pem_escapes_become_newlines() {
        assert_eq!(
            unescape_pem("-----BEGIN-----\\nAAA\\n-----END-----"),
            "-----BEGIN-----\nAAA\n-----END-----"
        );
    }

    #[test]
    fn ttl_must_fit_a_jwt_timestamp() {
        assert_eq!(fits_timestamp("ACCESS_TOKEN_TTL_SECONDS", 600).unwrap(), 600);
        assert_eq!(
            fits_timestamp("ACCESS_TOKEN_TTL_SECONDS", i64::MAX as u64).unwrap(),
            i64::MAX as u64
        );
        assert!(matches!(
            fits_timestamp("ACCESS_TOKEN_TTL_SECONDS", i64::MAX as u64 + 1),
            Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))
        ));
        assert!(matches!(
            fits_timestamp("ACCESS_TOKEN_TTL_SECONDS", u64::MAX),
            Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))
        ));
    }

    #[test]
    fn config_error_names_the_key() {
        assert_eq!(
            ConfigError::Missing("AUTH_ISSUER").to_string(),
            "missing configuration: AUTH_ISSUER"
        );
        assert_eq!(
            ConfigError::Invalid("PORT").to_string(),
            "invalid configuration: PORT"
        );
    }
}
