use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::models::AccessConfig;
use crate::services::MalformedDatePolicy;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::SecurityHeaders;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Preconfigures the access service at startup when `EVENTS_API_URL` is set.
    pub events_api: Option<AccessConfig>,
    pub request_timeout: Duration,
    pub date_policy: MalformedDatePolicy,
    pub cors_allowed_origins: String,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let events_api = lookup("EVENTS_API_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| {
                let mut config = AccessConfig::new(url.trim());
                if let Some(host) = lookup("DB_HOST") {
                    config.host = host;
                }
                if let Some(port) = parse_var(&lookup, "DB_PORT") {
                    config.port = port;
                }
                if let Some(database) = lookup("DB_NAME") {
                    config.database = database;
                }
                if let Some(user) = lookup("DB_USER") {
                    config.user = user;
                }
                if let Some(password) = lookup("DB_PASSWORD") {
                    config.password = password;
                }
                config
            });

        let date_policy = match lookup("DATE_FALLBACK") {
            Some(name) => MalformedDatePolicy::from_name(&name).unwrap_or_else(|| {
                tracing::warn!("Unknown DATE_FALLBACK '{}', falling back to current time", name);
                MalformedDatePolicy::default()
            }),
            None => MalformedDatePolicy::default(),
        };

        Self {
            bind_addr: parse_var(&lookup, "BIND_ADDR")
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: parse_var(&lookup, "PORT").unwrap_or(DEFAULT_PORT),
            events_api,
            request_timeout: Duration::from_secs(
                parse_var(&lookup, "EVENTS_API_TIMEOUT_SECS").unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            date_policy,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|| cors::DEFAULT_ALLOWED_ORIGINS.to_string()),
            production: lookup("RUST_ENV")
                .map(|v| v.to_lowercase() == "production")
                .unwrap_or(false),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|value| value.trim().parse().ok())
}
