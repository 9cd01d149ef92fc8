//! Application configuration loaded from environment variables.

use std::collections::HashSet;
use std::env;
use std::num::NonZeroU64;
use std::time::Duration;

use yatube_core::Paginator;
use yatube_infra::{DatabaseConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Page size for every post listing (`POSTS_PER_PAGE`).
    pub pagination: Paginator,
    pub jwt: JwtConfig,
    /// Accounts granted the `admin` role when they log in.
    pub admin_usernames: HashSet<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(20),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(2),
            connect_timeout: Duration::from_secs(parse_var("DB_CONNECT_TIMEOUT_SECS").unwrap_or(10)),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            pagination: paginator_from(env::var("POSTS_PER_PAGE").ok().as_deref()),
            jwt: JwtConfig::from_env(),
            admin_usernames: admin_usernames_from(env::var("ADMIN_USERNAMES").ok().as_deref()),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

/// Zero or unparsable sizes fall back to the default page size.
fn paginator_from(raw: Option<&str>) -> Paginator {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .and_then(NonZeroU64::new)
        .map(Paginator::new)
        .unwrap_or_default()
}

/// Comma-separated list, blanks ignored.
fn admin_usernames_from(raw: Option<&str>) -> HashSet<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}
