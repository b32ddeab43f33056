/// Configuration management for the Stepway service
///
/// Handles server bind settings and the SQLite database location.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// SQLite database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Directory holding the database file (default: "data")
    pub data_dir: String,
    /// Database file name inside `data_dir` (default: "stepway.db")
    pub file_name: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Full path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.file_name)
    }
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("STEPWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("STEPWAY_PORT")
                    .unwrap_or_else(|_| "3005".to_string())
                    .parse()
                    .unwrap_or(3005),
            },
            database: DatabaseConfig {
                data_dir: std::env::var("STEPWAY_DATA_DIR")
                    .unwrap_or_else(|_| "data".to_string()),
                file_name: std::env::var("STEPWAY_DB_FILE")
                    .unwrap_or_else(|_| "stepway.db".to_string()),
                max_connections: std::env::var("STEPWAY_DB_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_joins_dir_and_file() {
        let database = DatabaseConfig {
            data_dir: "var/lib".to_string(),
            file_name: "flows.db".to_string(),
            max_connections: 1,
        };
        assert_eq!(database.database_path(), PathBuf::from("var/lib").join("flows.db"));
    }
}
