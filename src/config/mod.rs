use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub uploads: UploadConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen port. `ESTATE_API_PORT` wins over `PORT`; defaults to 3000.
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. When absent the in-memory store backs the
    /// process instead (development and test runs).
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory where uploaded files are written.
    pub dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Username seeded at startup when `password` is configured and the user
    /// does not exist yet.
    pub username: String,
    pub password: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides. ESTATE_API_PORT takes precedence over the generic
        // PORT that most deployment platforms inject.
        if let Some(port) = env::var("ESTATE_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|v| v.parse().ok())
        {
            self.server.port = port;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }

        // Upload overrides
        if let Ok(v) = env::var("ESTATE_UPLOAD_DIR") {
            if !v.trim().is_empty() {
                self.uploads.dir = v;
            }
        }

        // Seed admin overrides
        if let Ok(v) = env::var("ESTATE_ADMIN_USERNAME") {
            if !v.trim().is_empty() {
                self.admin.username = v;
            }
        }
        if let Ok(v) = env::var("ESTATE_ADMIN_PASSWORD") {
            if !v.is_empty() {
                self.admin.password = Some(v);
            }
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
            },
            uploads: UploadConfig {
                dir: "uploads".to_string(),
            },
            admin: AdminConfig {
                username: "admin".to_string(),
                password: None,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
            },
            uploads: UploadConfig {
                dir: "uploads".to_string(),
            },
            admin: AdminConfig {
                username: "admin".to_string(),
                password: None,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
            },
            uploads: UploadConfig {
                dir: "uploads".to_string(),
            },
            admin: AdminConfig {
                username: "admin".to_string(),
                password: None,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 10);
        assert!(config.database.url.is_none());
        assert_eq!(config.uploads.dir, "uploads");
        assert!(config.admin.password.is_none());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 50);
    }
}
