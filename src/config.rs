use config::{Config, ConfigError, File};
use secrecy::Secret;
use serde_aux::field_attributes::{
    deserialize_number_from_string, deserialize_option_number_from_string,
};
use std::time;

use crate::error::LyrisResult;
use crate::lyris_client::LyrisClient;

#[derive(Debug)]
pub enum Environment {
    Development,
    Production,
}

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub lyris: LyrisSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub log_level: String,
    /// List used by the CLI when `--list-id` is not given.
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub default_list_id: Option<u32>,
}

#[derive(serde::Deserialize, Clone)]
pub struct LyrisSettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub site_id: u32,
    // secrecy protects secret information and prevents them to be exposed (eg: via logs)
    pub password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Settings {
    pub fn get_log_level(&self) -> String {
        self.application.log_level.clone()
    }

    pub fn get_default_list_id(&self) -> Option<u32> {
        self.application.default_list_id
    }

    pub fn get_lyris_client(&self) -> LyrisResult<LyrisClient> {
        self.lyris.get_client()
    }
}

impl LyrisSettings {
    pub fn get_timeout(&self) -> time::Duration {
        time::Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn get_client(&self) -> LyrisResult<LyrisClient> {
        LyrisClient::new(
            self.base_url.clone(),
            self.site_id,
            self.password.clone(),
            Some(self.get_timeout()),
            self.accept_invalid_certs,
        )
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            unknown_env => Err(format!(
                "{} is not supported environment. Use either 'development' or 'production'.",
                unknown_env
            )),
        }
    }
}

/// Environment selected through `APP_ENVIRONMENT`, development by default.
pub fn get_environment() -> Result<Environment, ConfigError> {
    std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "development".into())
        .try_into()
        .map_err(ConfigError::Message)
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let root_path = std::env::current_dir().map_err(|err| {
        ConfigError::Message(format!("Failed to determine the current directory: {}", err))
    })?;
    let config_directory = root_path.join("config");
    let environment = get_environment()?;
    let config_base_filepath = config_directory.join("base");
    let config_env_filepath = config_directory.join(environment.as_str());

    // It merges the base configuration file with the one from the specific environment (development or production)
    let settings = Config::builder()
        .add_source(File::from(config_base_filepath).required(true))
        .add_source(File::from(config_env_filepath).required(true))
        // Merge settings from environment variables with a prefix of APP and "__" separator
        // E.g APP_LYRIS__PASSWORD would set Settings.lyris.password
        .add_source(config::Environment::with_prefix("app").separator("__"))
        .build()?;

    // Try to convert the value from the configuration file into a Settings type
    settings.try_deserialize()
}
