use std::{net::SocketAddr, str::FromStr, time::Duration};

use crate::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("unknown LOG_FORMAT `{other}`"))),
        }
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection string for the store. Carries credentials, so it only ever
    /// comes from the environment.
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
    pub session_idle: time::Duration,
    pub secure_cookies: bool,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> AppResult<Config> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Config> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or(AppError::Config("DATABASE_URL must be set".to_owned()))?;

        let request_timeout = match parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 5)? {
            0 => return Err(AppError::Config("REQUEST_TIMEOUT_SECS must be at least 1".to_owned())),
            secs => Duration::from_secs(secs),
        };

        Ok(Config {
            database_url,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 16)?,
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 8000)))?,
            request_timeout,
            session_idle: time::Duration::minutes(parse_or(&lookup, "SESSION_IDLE_MINUTES", 5)?),
            secure_cookies: parse_or(&lookup, "SECURE_COOKIES", false)?,
            log_format: match lookup("LOG_FORMAT") {
                Some(format) => format.parse()?,
                None => LogFormat::Pretty,
            },
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key}={raw}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "sqlite://events.db")])).unwrap();
        assert_eq!(config.database_url, "sqlite://events.db");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.max_connections, 16);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.secure_cookies);
    }

    #[test]
    fn database_url_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BIND_ADDR", "0.0.0.0:9000"),
            ("REQUEST_TIMEOUT_SECS", "2"),
            ("SECURE_COOKIES", "true"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert!(config.secure_cookies);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_garbage() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("REQUEST_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(ref msg) if msg.contains("REQUEST_TIMEOUT_SECS")));
    }
}
