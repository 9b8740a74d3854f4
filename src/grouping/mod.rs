//! Grouping strategies over annotated news records.
//!
//! Two interchangeable algorithms assign records to groups: the greedy pairwise
//! grouper in this module and the TF-IDF/DBSCAN clusterer in `crate::clustering`.
//! Both produce a `Clustering` that feeds the same aggregator.

pub mod pairwise;
pub mod similarity;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::clustering::{Clustering, VectorClusterer};
use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::news::NewsRecord;

pub use pairwise::{
    group, group_by_title, PairwiseGrouper, SimilarityGroup, DEFAULT_SUMMARY_THRESHOLD,
    DEFAULT_TITLE_THRESHOLD,
};
pub use similarity::similarity;

/// A way of assigning records to labelled groups.
pub trait GroupingStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Label -> ascending member indices into `records`. Label `-1` marks noise.
    fn assign(&self, records: &[NewsRecord]) -> Result<Clustering, EngineError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Pairwise,
    Vector,
}

impl StrategyKind {
    pub fn build(self, config: &EngineConfig) -> Result<Box<dyn GroupingStrategy>, ConfigError> {
        Ok(match self {
            StrategyKind::Pairwise => Box::new(PairwiseGrouper::new(
                config.title_threshold,
                config.summary_threshold,
            )?),
            StrategyKind::Vector => Box::new(
                VectorClusterer::new(config.eps, config.min_samples)?.with_metric(config.metric),
            ),
        })
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Pairwise => write!(f, "pairwise"),
            StrategyKind::Vector => write!(f, "vector"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pairwise" => Ok(StrategyKind::Pairwise),
            "vector" | "dbscan" => Ok(StrategyKind::Vector),
            other => Err(ConfigError::UnknownValue {
                name: "strategy",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_kind_parses() {
        assert_eq!("Pairwise".parse::<StrategyKind>().unwrap(), StrategyKind::Pairwise);
        assert_eq!("dbscan".parse::<StrategyKind>().unwrap(), StrategyKind::Vector);
        assert!("kmeans".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn builds_both_strategies() {
        let config = EngineConfig::default();
        assert_eq!(StrategyKind::Pairwise.build(&config).unwrap().name(), "pairwise");
        assert_eq!(StrategyKind::Vector.build(&config).unwrap().name(), "vector");

        let bad = EngineConfig {
            eps: -1.0,
            ..EngineConfig::default()
        };
        assert!(StrategyKind::Vector.build(&bad).is_err());
    }
}
