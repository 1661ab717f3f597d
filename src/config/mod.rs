//! Configuration module for the MAXbuddy backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;
const DATA_FILE_NAME: &str = "requests.json";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,
    /// Host address to bind
    pub host: IpAddr,
    /// Path to the JSON data file
    pub data_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Values that were rejected in favor of a default.
    ///
    /// Loading happens before logging is set up, so the caller logs these.
    pub fallbacks: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut fallbacks = Vec::new();

        let port = match env::var("PORT") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
                fallbacks.push(format!(
                    "Invalid PORT value {:?} ({}), using {}",
                    raw, e, DEFAULT_PORT
                ));
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let host = match env::var("MAXBUDDY_HOST") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
                fallbacks.push(format!(
                    "Invalid MAXBUDDY_HOST value {:?} ({}), using 0.0.0.0",
                    raw, e
                ));
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            }),
            Err(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let data_path = env::var("MAXBUDDY_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_path());

        let log_level = env::var("MAXBUDDY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("MAXBUDDY_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("text") | Err(_) => LogFormat::Text,
            Ok(other) => {
                fallbacks.push(format!(
                    "Unknown MAXBUDDY_LOG_FORMAT {:?}, using text",
                    other
                ));
                LogFormat::Text
            }
        };

        Self {
            port,
            host,
            data_path,
            log_level,
            log_format,
            fallbacks,
        }
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// `requests.json` next to the executable, or in the working directory if that is unknown.
pub fn default_data_path() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DATA_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(DATA_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases share process-wide environment variables, so they run in one test.
    #[test]
    fn test_config_from_env() {
        env::remove_var("PORT");
        env::remove_var("MAXBUDDY_HOST");
        env::remove_var("MAXBUDDY_DATA_PATH");
        env::remove_var("MAXBUDDY_LOG_LEVEL");
        env::remove_var("MAXBUDDY_LOG_FORMAT");

        let config = Config::from_env();

        assert_eq!(config.port, 3000);
        assert_eq!(config.data_path, default_data_path());
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.fallbacks.is_empty());

        env::set_var("PORT", "8081");
        env::set_var("MAXBUDDY_HOST", "127.0.0.1");
        env::set_var("MAXBUDDY_LOG_FORMAT", "json");
        env::set_var("MAXBUDDY_DATA_PATH", "/tmp/board/requests.json");
        let config = Config::from_env();
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8081");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.data_path, PathBuf::from("/tmp/board/requests.json"));
        assert!(config.fallbacks.is_empty());

        env::set_var("PORT", "not-a-port");
        env::set_var("MAXBUDDY_HOST", "nowhere");
        let config = Config::from_env();
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.fallbacks.len(), 2);
        assert!(config.fallbacks[0].starts_with("Invalid PORT value \"not-a-port\""));
        assert!(config.fallbacks[1].starts_with("Invalid MAXBUDDY_HOST value"));

        env::remove_var("PORT");
        env::remove_var("MAXBUDDY_HOST");
        env::remove_var("MAXBUDDY_DATA_PATH");
        env::remove_var("MAXBUDDY_LOG_FORMAT");
    }

    #[test]
    fn test_default_data_path_sits_beside_executable() {
        let exe_dir = env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(default_data_path(), exe_dir.join("requests.json"));
    }
}
