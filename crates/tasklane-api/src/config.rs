//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use tasklane_mediator::behaviours::DEFAULT_LONG_RUNNING_THRESHOLD;

use crate::error::StartupError;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// PostgreSQL connection string. `None` runs against the in-memory store.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Requests slower than this are logged at `warn`.
    pub long_running_threshold: Duration,
    /// Apply `migrations/` on startup.
    pub run_migrations: bool,
    /// Create the default administrator role and user.
    pub seed_identity: bool,
    /// OTLP collector endpoint; span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `StartupError::Config` when a variable is present but cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable or `None` when it is unset.
    ///
    /// # Errors
    ///
    /// Returns `StartupError::Config` when a value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StartupError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = non_empty("PORT")
            .map(|raw| parse::<u16>(&raw, "PORT"))
            .transpose()?
            .unwrap_or(3000);
        let long_running_threshold = non_empty("LONG_RUNNING_REQUEST_MS")
            .map(|raw| parse::<u64>(&raw, "LONG_RUNNING_REQUEST_MS"))
            .transpose()?
            .map_or(DEFAULT_LONG_RUNNING_THRESHOLD, Duration::from_millis);

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port,
            long_running_threshold,
            run_migrations: parse_flag(non_empty("RUN_MIGRATIONS"), "RUN_MIGRATIONS", false)?,
            seed_identity: parse_flag(non_empty("SEED_IDENTITY"), "SEED_IDENTITY", true)?,
            otlp_endpoint: non_empty("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `StartupError::Config` when `host:port` is not a valid address.
    pub fn listen_addr(&self) -> Result<SocketAddr, StartupError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| StartupError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse<T>(raw: &str, key: &str) -> Result<T, StartupError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| StartupError::Config(format!("{key} must be valid: {e}")))
}

fn parse_flag(value: Option<String>, key: &str, default: bool) -> Result<bool, StartupError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(StartupError::Config(format!(
            "{key} must be a boolean, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, StartupError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.database_url, None);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.long_running_threshold, Duration::from_millis(500));
        assert!(!config.run_migrations);
        assert!(config.seed_identity);
        assert_eq!(config.otlp_endpoint, None);
    }

    #[test]
    fn test_values_are_read_from_the_environment() {
        // Arrange
        let vars = [
            ("DATABASE_URL", "postgres://localhost/tasklane"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("LONG_RUNNING_REQUEST_MS", "250"),
            ("RUN_MIGRATIONS", "true"),
            ("SEED_IDENTITY", "off"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
        ];

        // Act
        let config = config_from(&vars).unwrap();

        // Assert
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/tasklane"));
        assert_eq!(config.listen_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.long_running_threshold, Duration::from_millis(250));
        assert!(config.run_migrations);
        assert!(!config.seed_identity);
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://collector:4317"));
    }

    #[test]
    fn test_blank_database_url_means_in_memory() {
        let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();

        assert_eq!(config.database_url, None);
    }

    #[test]
    fn test_invalid_port_is_a_config_error() {
        let result = config_from(&[("PORT", "not-a-port")]);

        assert!(matches!(result, Err(StartupError::Config(message)) if message.contains("PORT")));
    }

    #[test]
    fn test_invalid_flag_is_a_config_error() {
        let result = config_from(&[("RUN_MIGRATIONS", "sometimes")]);

        assert!(matches!(result, Err(StartupError::Config(_))));
    }
}
