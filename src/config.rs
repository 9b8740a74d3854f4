//! Engine settings for the surrounding tooling.
//!
//! The library functions take their parameters explicitly; this struct only
//! gathers them for binaries, with defaults and `MEDWIRE_*` overrides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::clustering::{validate_eps, validate_min_samples, DistanceMetric, DEFAULT_EPS, DEFAULT_MIN_SAMPLES};
use crate::environment::{get_env_var, parse_env_var};
use crate::error::ConfigError;
use crate::grouping::{StrategyKind, DEFAULT_SUMMARY_THRESHOLD, DEFAULT_TITLE_THRESHOLD};

/// Fails unless `value` lies within `[0, 1]`.
pub fn validate_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub strategy: StrategyKind,
    pub title_threshold: f64,
    pub summary_threshold: f64,
    pub eps: f64,
    pub min_samples: usize,
    pub metric: DistanceMetric,
    /// Keep only records with at least one disease, symptom or indicator.
    pub require_medical_info: bool,
    /// Drop records older than this many days before the reference date.
    pub max_age_days: Option<i64>,
    /// Retry with the pairwise grouper when vector clustering fails.
    pub fallback_to_pairwise: bool,
    pub companies_path: Option<PathBuf>,
    pub drugs_path: Option<PathBuf>,
    pub indications_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            strategy: StrategyKind::Pairwise,
            title_threshold: DEFAULT_TITLE_THRESHOLD,
            summary_threshold: DEFAULT_SUMMARY_THRESHOLD,
            eps: DEFAULT_EPS,
            min_samples: DEFAULT_MIN_SAMPLES,
            metric: DistanceMetric::Euclidean,
            require_medical_info: true,
            max_age_days: None,
            fallback_to_pairwise: true,
            companies_path: None,
            drugs_path: None,
            indications_path: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(get_env_var)
    }

    /// Defaults overridden by whatever `lookup` returns for the `MEDWIRE_*` variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EngineConfig::default();

        if let Some(strategy) = parse_env_var(&lookup, "MEDWIRE_STRATEGY")? {
            config.strategy = strategy;
        }
        if let Some(value) = parse_env_var(&lookup, "MEDWIRE_TITLE_THRESHOLD")? {
            config.title_threshold = value;
        }
        if let Some(value) = parse_env_var(&lookup, "MEDWIRE_SUMMARY_THRESHOLD")? {
            config.summary_threshold = value;
        }
        if let Some(value) = parse_env_var(&lookup, "MEDWIRE_EPS")? {
            config.eps = value;
        }
        if let Some(value) = parse_env_var(&lookup, "MEDWIRE_MIN_SAMPLES")? {
            config.min_samples = value;
        }
        if let Some(metric) = parse_env_var(&lookup, "MEDWIRE_METRIC")? {
            config.metric = metric;
        }
        if let Some(value) = parse_env_var(&lookup, "MEDWIRE_REQUIRE_MEDICAL_INFO")? {
            config.require_medical_info = value;
        }
        if let Some(days) = parse_env_var(&lookup, "MEDWIRE_MAX_AGE_DAYS")? {
            config.max_age_days = Some(days);
        }
        if let Some(value) = parse_env_var(&lookup, "MEDWIRE_FALLBACK_TO_PAIRWISE")? {
            config.fallback_to_pairwise = value;
        }
        config.companies_path = lookup("MEDWIRE_KB_COMPANIES").map(PathBuf::from);
        config.drugs_path = lookup("MEDWIRE_KB_DRUGS").map(PathBuf::from);
        config.indications_path = lookup("MEDWIRE_KB_INDICATIONS").map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_threshold("title_threshold", self.title_threshold)?;
        validate_threshold("summary_threshold", self.summary_threshold)?;
        validate_eps(self.eps)?;
        validate_min_samples(self.min_samples)?;
        if let Some(days) = self.max_age_days {
            if days < 0 {
                return Err(ConfigError::InvalidEnv {
                    var: "MEDWIRE_MAX_AGE_DAYS".to_string(),
                    value: days.to_string(),
                });
            }
        }
        Ok(())
    }
}
