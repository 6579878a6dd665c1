use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::predictor::{SvrParams, TrainingConfig, DEFAULT_TEST_RATIO};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub csv_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("data/bitcoin_price_data.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub c: f64,
    pub gamma: f64,
    pub epsilon: f64,
    pub test_ratio: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let svr = SvrParams::default();
        Self {
            c: svr.c,
            gamma: svr.gamma,
            epsilon: svr.epsilon,
            test_ratio: DEFAULT_TEST_RATIO,
        }
    }
}

impl ModelConfig {
    pub fn training(&self) -> TrainingConfig {
        TrainingConfig {
            svr: SvrParams {
                c: self.c,
                gamma: self.gamma,
                epsilon: self.epsilon,
            },
            test_ratio: self.test_ratio,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub max_horizon_days: i64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            max_horizon_days: 365,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Load `config/default.toml` (or `PF_CONFIG_PATH`), falling back to
    /// defaults when the file is absent. `PF_DATA_PATH` overrides the CSV path.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var("PF_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        if let Ok(path) = std::env::var("PF_DATA_PATH") {
            config.data.csv_path = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&config_str).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        let m = &self.model;
        if !(m.c.is_finite() && m.c > 0.0) {
            bail!("model.c must be > 0 (got {})", m.c);
        }
        if !(m.gamma.is_finite() && m.gamma > 0.0) {
            bail!("model.gamma must be > 0 (got {})", m.gamma);
        }
        if !(m.epsilon.is_finite() && m.epsilon >= 0.0) {
            bail!("model.epsilon must be >= 0 (got {})", m.epsilon);
        }
        if !(m.test_ratio > 0.0 && m.test_ratio < 1.0) {
            bail!("model.test_ratio must be in (0, 1) (got {})", m.test_ratio);
        }
        if self.forecast.max_horizon_days < 1 {
            bail!(
                "forecast.max_horizon_days must be >= 1 (got {})",
                self.forecast.max_horizon_days
            );
        }
        Ok(())
    }
}
