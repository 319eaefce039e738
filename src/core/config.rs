use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub storage: StorageConfig,
    pub openapi: OpenApiConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Signed session token settings
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// HMAC secret used to sign session tokens
    pub secret: String,
    /// Lifetime of an issued session
    pub ttl: Duration,
    /// Name of the cookie carrying the session token
    pub cookie_name: String,
    /// Whether the session cookie gets the `Secure` attribute
    pub cookie_secure: bool,
}

/// Upload limits and per-user quota
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Largest single upload in bytes
    pub max_upload_size: usize,
    /// Storage ceiling per user in bytes
    pub quota_bytes: i64,
}

#[derive(Debug, Clone)]
pub struct OpenApiConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            session: SessionConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            openapi: OpenApiConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = match env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()) {
            Some(url) => url,
            None => Self::url_from_parts(
                &env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                &env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string()),
                &env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string()),
                &env::var("DB_PASSWORD").unwrap_or_default(),
                &env::var("DB_NAME").unwrap_or_else(|_| "zipflow".to_string()),
            )?,
        };

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }

    /// Build a connection URL from the individual `DB_*` variables
    fn url_from_parts(
        host: &str,
        port: &str,
        user: &str,
        password: &str,
        database: &str,
    ) -> Result<String, String> {
        let port = port
            .parse::<u16>()
            .map_err(|_| "DB_PORT must be a valid port number".to_string())?;

        let credentials = if password.is_empty() {
            user.to_string()
        } else {
            format!("{}:{}", user, password)
        };

        Ok(format!(
            "postgres://{}@{}:{}/{}",
            credentials, host, port, database
        ))
    }

    /// Connection URL with the password masked, for logging
    pub fn redacted_url(&self) -> String {
        match self.url.rsplit_once('@') {
            Some((_, host_part)) => format!("postgres://***@{}", host_part),
            None => self.url.clone(),
        }
    }
}

impl SessionConfig {
    const DEFAULT_TTL_SECS: u64 = 30 * 24 * 60 * 60; // 30 days
    const DEFAULT_COOKIE_NAME: &'static str = "zipflow_session";
    const MIN_SECRET_LEN: usize = 32;
    const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60; // 10 years

    pub fn from_env() -> Result<Self, String> {
        let secret = env::var("SESSION_SECRET")
            .map_err(|_| "SESSION_SECRET environment variable is required".to_string())?;

        if secret.len() < Self::MIN_SECRET_LEN {
            return Err(format!(
                "SESSION_SECRET must be at least {} characters",
                Self::MIN_SECRET_LEN
            ));
        }

        let ttl_secs = Self::parse_ttl_secs(
            &env::var("SESSION_TTL_SECS").unwrap_or_else(|_| Self::DEFAULT_TTL_SECS.to_string()),
        )?;

        let cookie_name = env::var("SESSION_COOKIE_NAME")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_COOKIE_NAME.to_string());

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            secret,
            ttl: Duration::from_secs(ttl_secs),
            cookie_name,
            cookie_secure,
        })
    }

    fn parse_ttl_secs(raw: &str) -> Result<u64, String> {
        let ttl_secs = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| "SESSION_TTL_SECS must be a valid number".to_string())?;

        if ttl_secs == 0 || ttl_secs > Self::MAX_TTL_SECS {
            return Err(format!(
                "SESSION_TTL_SECS must be between 1 and {}",
                Self::MAX_TTL_SECS
            ));
        }

        Ok(ttl_secs)
    }
}

impl StorageConfig {
    pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 100 * 1024 * 1024; // 100MB
    pub const DEFAULT_QUOTA_BYTES: i64 = 5 * 1024 * 1024 * 1024; // 5GB

    pub fn from_env() -> Result<Self, String> {
        let max_upload_size = env::var("MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_UPLOAD_SIZE must be a valid number".to_string())?;

        let quota_bytes = env::var("STORAGE_QUOTA_BYTES")
            .unwrap_or_else(|_| Self::DEFAULT_QUOTA_BYTES.to_string())
            .parse::<i64>()
            .map_err(|_| "STORAGE_QUOTA_BYTES must be a valid number".to_string())?;

        if quota_bytes <= 0 {
            return Err("STORAGE_QUOTA_BYTES must be positive".to_string());
        }

        Ok(Self {
            max_upload_size,
            quota_bytes,
        })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_upload_size: Self::DEFAULT_MAX_UPLOAD_SIZE,
            quota_bytes: Self::DEFAULT_QUOTA_BYTES,
        }
    }
}

impl OpenApiConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("OPENAPI_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("OPENAPI_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("OPENAPI_TITLE").unwrap_or_else(|_| "ZipFlow API".to_string());
        let version = env::var("OPENAPI_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("OPENAPI_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for ZipFlow personal cloud storage".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ttl_bounds() {
        assert_eq!(SessionConfig::parse_ttl_secs("3600"), Ok(3600));
        assert!(SessionConfig::parse_ttl_secs("0").is_err());
        assert!(SessionConfig::parse_ttl_secs("forever").is_err());
        assert!(SessionConfig::parse_ttl_secs("9300000000000000").is_err());
        assert!(SessionConfig::parse_ttl_secs(&u64::MAX.to_string()).is_err());
    }

    #[test]
    fn test_url_from_parts_with_password() {
        let url = DatabaseConfig::url_from_parts("db", "5432", "zip", "secret", "zipflow").unwrap();
        assert_eq!(url, "postgres://zip:secret@db:5432/zipflow");
    }

    #[test]
    fn test_url_from_parts_without_password() {
        let url = DatabaseConfig::url_from_parts("localhost", "5433", "postgres", "", "files")
            .unwrap();
        assert_eq!(url, "postgres://postgres@localhost:5433/files");
    }

    #[test]
    fn test_url_from_parts_rejects_bad_port() {
        assert!(DatabaseConfig::url_from_parts("localhost", "abc", "u", "p", "d").is_err());
    }

    #[test]
    fn test_redacted_url_hides_credentials() {
        let config = DatabaseConfig {
            url: "postgres://zip:secret@db:5432/zipflow".to_string(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 1,
            idle_timeout_secs: 1,
            max_lifetime_secs: 1,
        };
        assert_eq!(config.redacted_url(), "postgres://***@db:5432/zipflow");
    }

    #[test]
    fn test_openapi_credentials_require_both_parts() {
        let mut config = OpenApiConfig {
            username: Some("admin".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert!(config.credentials().is_none());

        config.password = Some("pw".to_string());
        assert_eq!(config.credentials().as_deref(), Some("admin:pw"));
    }
}
