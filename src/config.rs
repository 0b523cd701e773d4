use {
    crate::Calendar,
    chrono_tz::Tz,
    serde::{Deserialize, Serialize},
    std::time::Duration,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub aggregation: AggregationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AggregationConfig {
    // Day buckets are cut at midnight in this zone
    pub timezone: Tz,

    // Trailing slice used for the "current" series
    #[serde(with = "humantime_serde")]
    pub recent_window: Duration,

    // Drop every probe whose insurance class is not PUBLIC
    pub public_only: bool,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Berlin,
            recent_window: Duration::from_secs(60 * 60),
            public_only: true,
        }
    }
}

impl AggregationConfig {
    pub const fn calendar(&self) -> Calendar {
        Calendar::new(self.timezone)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
