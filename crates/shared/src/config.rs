//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Public-holiday provider configuration.
    #[serde(default)]
    pub holidays: HolidayProviderConfig,
    /// Email (notification) configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Background job configuration.
    #[serde(default)]
    pub jobs: JobsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Public-holiday provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayProviderConfig {
    /// Base URL of the provider (Nager.Date compatible API).
    #[serde(default = "default_holiday_base_url")]
    pub base_url: String,
    /// Cache time-to-live in seconds for a (country, year) calendar.
    #[serde(default = "default_holiday_cache_ttl")]
    pub cache_ttl_secs: u64,
}

fn default_holiday_base_url() -> String {
    "https://date.nager.at".to_string()
}

fn default_holiday_cache_ttl() -> u64 {
    86_400 // 24 hours; public holidays change rarely
}

impl Default for HolidayProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_holiday_base_url(),
            cache_ttl_secs: default_holiday_cache_ttl(),
        }
    }
}

/// Email configuration for approval notifications.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP server host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP server port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// From address for outgoing mail.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// From display name for outgoing mail.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "no-reply@feriado.dev".to_string()
}

fn default_from_name() -> String {
    "Feriado".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

/// Background job configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    /// Interval in seconds between runs of the approved/taken sweep.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    /// Interval in seconds between balance recalculation runs.
    #[serde(default = "default_recalculation_interval")]
    pub recalculation_interval_secs: u64,
}

fn default_sweep_interval() -> u64 {
    3_600 // hourly
}

fn default_recalculation_interval() -> u64 {
    21_600 // every 6 hours
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval(),
            recalculation_interval_secs: default_recalculation_interval(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FERIADO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
