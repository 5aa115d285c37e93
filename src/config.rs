//! Process configuration read from the environment (after `.env` is loaded).

use std::{env, str::FromStr};

use thiserror::Error;

/// Accepted `SESSION_TTL_DAYS` values.
pub const SESSION_TTL_DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=3650;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "https://open-desk-tan.vercel.app",
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// PostgreSQL URL. `None` runs the server on in-memory backends.
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// CORS allow-list.
    pub allowed_origins: Vec<String>,
    pub session_ttl_days: i64,
    pub min_password_length: usize,
    /// In-memory backend only: emails granted admin on signup.
    pub admin_emails: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 5,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.map(str::to_string).to_vec(),
            session_ttl_days: 30,
            min_password_length: 6,
            admin_emails: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let session_ttl_days = parse(&value, "SESSION_TTL_DAYS", defaults.session_ttl_days)?;
        if !SESSION_TTL_DAYS_RANGE.contains(&session_ttl_days) {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_DAYS",
                value: session_ttl_days.to_string(),
            });
        }

        Ok(Self {
            database_url: value("DATABASE_URL"),
            max_connections: parse(&value, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            allowed_origins: value("ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.allowed_origins),
            session_ttl_days,
            min_password_length: parse(
                &value,
                "MIN_PASSWORD_LENGTH",
                defaults.min_password_length,
            )?,
            admin_emails: value("ADMIN_EMAILS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
        })
    }
}

fn parse<T, F>(value: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match value(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config(&[]).unwrap(), AppConfig::default());
        assert_eq!(config(&[]).unwrap().allowed_origins.len(), 3);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("DATABASE_URL", "postgresql://localhost/opendesk"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("SESSION_TTL_DAYS", "7"),
            ("ADMIN_EMAILS", "root@example.com"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgresql://localhost/opendesk")
        );
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.session_ttl_days, 7);
        assert_eq!(config.admin_emails, vec!["root@example.com"]);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config(&[("DATABASE_URL", "  "), ("MIN_PASSWORD_LENGTH", "")]).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.min_password_length, 6);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert_eq!(
            config(&[("SESSION_TTL_DAYS", "a month")]),
            Err(ConfigError::Invalid {
                key: "SESSION_TTL_DAYS",
                value: "a month".to_string()
            })
        );
    }

    #[test]
    fn rejects_session_lifetimes_out_of_range() {
        for days in ["0", "-3", "3651", "9223372036854775807"] {
            assert_eq!(
                config(&[("SESSION_TTL_DAYS", days)]),
                Err(ConfigError::Invalid {
                    key: "SESSION_TTL_DAYS",
                    value: days.to_string()
                })
            );
        }
        assert_eq!(
            config(&[("SESSION_TTL_DAYS", "3650")]).unwrap().session_ttl_days,
            3650
        );
    }
}
