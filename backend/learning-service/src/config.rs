/// Configuration management for Learning Service
///
/// Everything is read from environment variables (a `.env` file is loaded
/// first by `main`). Pool knobs live in `db_pool::DbConfig`.
use db_pool::env_utils::{parse_env_bool, parse_env_with_default};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub log: LogConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
    /// Apply pending sqlx migrations at startup
    pub run_migrations: bool,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Mark the `token` cookie `Secure`
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub format: LogFormat,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl CorsConfig {
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
            Ok(value) => value,
            Err(_) if production => {
                return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
            }
            Err(_) => "http://localhost:3000".to_string(),
        };

        if production && allowed_origins.trim() == "*" {
            return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
        }

        let format = match std::env::var("LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("LEARNING_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_with_default("LEARNING_SERVICE_PORT", 8080),
                run_migrations: parse_env_bool("RUN_MIGRATIONS", true),
            },
            cors: CorsConfig { allowed_origins },
            auth: AuthConfig {
                cookie_secure: parse_env_bool("AUTH_COOKIE_SECURE", production),
            },
            log: LogConfig { format },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "APP_ENV",
            "CORS_ALLOWED_ORIGINS",
            "LEARNING_SERVICE_HOST",
            "LEARNING_SERVICE_PORT",
            "RUN_MIGRATIONS",
            "AUTH_COOKIE_SECURE",
            "LOG_FORMAT",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_for_development() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.app.bind_address(), "0.0.0.0:8080");
        assert!(config.app.run_migrations);
        assert!(!config.auth.cookie_secure);
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(
            config.cors.origins().collect::<Vec<_>>(),
            vec!["http://localhost:3000"]
        );
    }

    #[test]
    #[serial]
    fn production_requires_cors_origins() {
        clear_env();
        std::env::set_var("APP_ENV", "production");

        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://learn.example.com, https://admin.example.com");
        let config = Config::from_env().unwrap();
        assert!(config.auth.cookie_secure);
        assert_eq!(config.cors.origins().count(), 2);

        clear_env();
    }

    #[test]
    #[serial]
    fn overrides_are_applied() {
        clear_env();
        std::env::set_var("LEARNING_SERVICE_PORT", "9090");
        std::env::set_var("RUN_MIGRATIONS", "false");
        std::env::set_var("LOG_FORMAT", "JSON");

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 9090);
        assert!(!config.app.run_migrations);
        assert_eq!(config.log.format, LogFormat::Json);

        clear_env();
    }
}
