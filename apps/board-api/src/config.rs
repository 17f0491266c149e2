use crate::application::ApplicationError;
use std::net::SocketAddr;
use std::str::FromStr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_HOST_DOMAIN: &str = "test.example.com";
const DEFAULT_LOCALE: &str = "en";
const DEFAULT_SESSION_TTL_SECONDS: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Development,
    Test,
}

impl FromStr for Environment {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "development" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            other => Err(ApplicationError::Configuration(format!(
                "APP_ENV must be production, development or test, got '{other}'"
            ))),
        }
    }
}

/// Runtime settings read from the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Without a database URL the service runs on in-memory adapters.
    pub database_url: Option<String>,
    pub environment: Environment,
    /// Tenants are served from `<subdomain>.<host_domain>` or their CNAME.
    pub host_domain: String,
    pub auth_endpoint: String,
    pub default_locale: String,
    pub session_ttl_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database_url: None,
            environment: Environment::default(),
            host_domain: DEFAULT_HOST_DOMAIN.to_string(),
            auth_endpoint: format!("http://login.{DEFAULT_HOST_DOMAIN}"),
            default_locale: DEFAULT_LOCALE.to_string(),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApplicationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ApplicationError::Configuration(format!("BIND_ADDR: {e}")))?;

        let environment = match get("APP_ENV") {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };

        let host_domain = get("HOST_DOMAIN").unwrap_or_else(|| DEFAULT_HOST_DOMAIN.to_string());
        let auth_endpoint =
            get("AUTH_ENDPOINT").unwrap_or_else(|| format!("http://login.{host_domain}"));

        let session_ttl_seconds = match get("SESSION_TTL_SECONDS") {
            Some(value) => value.parse::<u64>().map_err(|e| {
                ApplicationError::Configuration(format!("SESSION_TTL_SECONDS: {e}"))
            })?,
            None => DEFAULT_SESSION_TTL_SECONDS,
        };

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL"),
            environment,
            host_domain,
            auth_endpoint,
            default_locale: get("DEFAULT_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            session_ttl_seconds,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}
