/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_mail")]
    pub mail: MailSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: u64,

    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: u64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    #[serde(default = "default_verify_token_hours")]
    pub verify_token_hours: u64,

    #[serde(default = "default_reset_token_minutes")]
    pub reset_token_minutes: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailSettings {
    /// When false, notifications are logged instead of sent
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: Option<String>,

    #[serde(default)]
    pub smtp_password: Option<String>,

    #[serde(default = "default_starttls")]
    pub starttls: bool,

    #[serde(default)]
    pub from_address: String,

    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Base URL used to build the links in verification and reset emails
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

impl ServerConfig {
    /// Load configuration from `config.toml` (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from(PathBuf::from("config.toml"))
    }

    /// Load configuration from `path` (if present) and environment
    ///
    /// Environment variables use the `CADENCE` prefix and `__` as the section
    /// separator, e.g. `CADENCE__AUTH__JWT_SECRET`.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.cors_origins"),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set CADENCE__AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if self.auth.access_token_minutes == 0
            || self.auth.refresh_token_days == 0
            || self.auth.verify_token_hours == 0
            || self.auth.reset_token_minutes == 0
        {
            return Err(ServerError::Config(
                "Token lifetimes must be greater than zero".to_string(),
            ));
        }

        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(ServerError::Config(format!(
                "bcrypt cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }

        if self.mail.enabled {
            if self.mail.smtp_host.is_empty() {
                return Err(ServerError::Config(
                    "mail.smtp_host is required when mail is enabled".to_string(),
                ));
            }
            if self.mail.from_address.is_empty() {
                return Err(ServerError::Config(
                    "mail.from_address is required when mail is enabled".to_string(),
                ));
            }
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
        cors_origins: Vec::new(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/cadence.db".to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        access_token_minutes: default_access_token_minutes(),
        refresh_token_days: default_refresh_token_days(),
        bcrypt_cost: default_bcrypt_cost(),
        verify_token_hours: default_verify_token_hours(),
        reset_token_minutes: default_reset_token_minutes(),
    }
}

fn default_access_token_minutes() -> u64 {
    60
}

fn default_refresh_token_days() -> u64 {
    7
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_verify_token_hours() -> u64 {
    24
}

fn default_reset_token_minutes() -> u64 {
    60
}

fn default_mail() -> MailSettings {
    MailSettings {
        enabled: false,
        smtp_host: String::new(),
        smtp_port: default_smtp_port(),
        smtp_username: None,
        smtp_password: None,
        starttls: default_starttls(),
        from_address: String::new(),
        app_name: default_app_name(),
        frontend_url: default_frontend_url(),
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_starttls() -> bool {
    true
}

fn default_app_name() -> String {
    "Cadence".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:4200".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            mail: default_mail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.auth.jwt_secret = "secret".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.access_token_minutes, 60);
        assert_eq!(config.auth.refresh_token_days, 7);
        assert_eq!(config.auth.verify_token_hours, 24);
        assert_eq!(config.auth.reset_token_minutes, 60);
        assert!(!config.mail.enabled);
    }

    #[test]
    fn test_validate_requires_secret() {
        assert!(ServerConfig::default().validate().is_err());
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = valid();
        config.auth.reset_token_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_mail_requires_host_and_sender() {
        let mut config = valid();
        config.mail.enabled = true;
        assert!(config.validate().is_err());

        config.mail.smtp_host = "smtp.example.com".to_string();
        assert!(config.validate().is_err());

        config.mail.from_address = "noreply@example.com".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9000\n\n[auth]\njwt_secret = \"from-file\"\nbcrypt_cost = 4\n",
        )
        .unwrap();

        let config = ServerConfig::load_from(path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.jwt_secret, "from-file");
        assert_eq!(config.auth.bcrypt_cost, 4);
        assert_eq!(config.storage.database_url, "sqlite://./data/cadence.db");
    }
}
