use std::env;

use auth::HashingParams;
use auth::TokenLifetimes;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub private_key_path: String,
    pub public_key_path: String,
    pub access_token_expires_in_minutes: i64,
    pub refresh_token_expires_in_minutes: i64,
    #[serde(default)]
    pub cookie_secure: bool,
}

impl AuthConfig {
    /// Token lifetimes; both must be positive and representable.
    pub fn token_lifetimes(&self) -> Result<TokenLifetimes, ConfigError> {
        Ok(TokenLifetimes {
            access: lifetime(
                "auth.access_token_expires_in_minutes",
                self.access_token_expires_in_minutes,
            )?,
            refresh: lifetime(
                "auth.refresh_token_expires_in_minutes",
                self.refresh_token_expires_in_minutes,
            )?,
        })
    }
}

fn lifetime(key: &str, minutes: i64) -> Result<chrono::Duration, ConfigError> {
    if minutes <= 0 {
        return Err(ConfigError::Message(format!(
            "{key} must be greater than 0, got {minutes}"
        )));
    }
    chrono::Duration::try_minutes(minutes)
        .ok_or_else(|| ConfigError::Message(format!("{key} is out of range: {minutes}")))
}

/// Argon2 work factor; unset fields fall back to the Argon2 defaults.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PasswordConfig {
    pub memory_cost_kib: Option<u32>,
    pub iterations: Option<u32>,
    pub parallelism: Option<u32>,
}

impl PasswordConfig {
    pub fn hashing_params(&self) -> HashingParams {
        let defaults = HashingParams::default();
        HashingParams {
            memory_cost_kib: self.memory_cost_kib.unwrap_or(defaults.memory_cost_kib),
            iterations: self.iterations.unwrap_or(defaults.iterations),
            parallelism: self.parallelism.unwrap_or(defaults.parallelism),
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, AUTH__PRIVATE_KEY_PATH, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__ACCESS_TOKEN_EXPIRES_IN_MINUTES=5 overrides auth.access_token_expires_in_minutes
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.auth.token_lifetimes()?;

        Ok(config)
    }
}
