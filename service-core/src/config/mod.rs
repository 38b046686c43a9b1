use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Settings shared by every binary in the workspace.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_service_name() -> String {
    "billing-period".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

/// Load settings of type `T` from an optional file followed by `APP__` environment overrides.
///
/// `file` may be a bare name (`configuration` picks up `configuration.toml`,
/// `configuration.yaml`, ...) or a path with an extension. A missing file is not
/// an error; every key can come from the environment instead, e.g.
/// `APP__CONTEXT__ANCHOR_DATE=2020-02-02`.
pub fn load_settings<T: DeserializeOwned>(file: &str) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let config = Cfg::builder()
        .add_source(File::with_name(file).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    Ok(config.try_deserialize()?)
}
