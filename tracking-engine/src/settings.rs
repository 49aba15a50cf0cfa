use config::{Config, File};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tracking_core::Route;

use crate::error::{Result, SettingsSnafu};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display, strum::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Environment {
    Local,
    Development,
    Production,
    Test,
}

/// Geographic area the fleet operates in, reported in stats only and never
/// enforced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

fn default_tick_interval() -> std::time::Duration {
    std::time::Duration::from_secs(30)
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub environment: Environment,
    #[serde(with = "humantime_serde", default = "default_tick_interval")]
    pub tick_interval: std::time::Duration,
    #[serde(with = "humantime_serde")]
    pub status_report_interval: std::time::Duration,
    pub bounding_box: Option<BoundingBox>,
    pub routes: Vec<Route>,
}

impl Settings {
    pub fn new() -> Result<Self> {
        let environment = std::env::var("APP_ENVIRONMENT")
            .map(|v| {
                v.parse::<Environment>()
                    .expect("failed to parse APP_ENVIRONMENT")
            })
            .unwrap_or(Environment::Local);

        Config::builder()
            .add_source(
                File::with_name(&format!("config/{}", environment.to_string().to_lowercase()))
                    .required(true),
            )
            .add_source(config::Environment::with_prefix("TRACKING_ENGINE").separator("__"))
            .set_override("environment", environment.to_string())
            .context(SettingsSnafu)?
            .build()
            .context(SettingsSnafu)?
            .try_deserialize()
            .context(SettingsSnafu)
    }
}
