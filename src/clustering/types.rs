use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::entity::EntityAnnotation;
use crate::error::{ClusterError, ConfigError};
use crate::news::NewsRecord;

/// Label given to records that belong to no cluster.
pub const NOISE_LABEL: i32 = -1;

/// Cluster label -> ascending record indices.
pub type Clustering = BTreeMap<i32, Vec<usize>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Cosine,
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Euclidean => write!(f, "euclidean"),
            DistanceMetric::Cosine => write!(f, "cosine"),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "cosine" => Ok(DistanceMetric::Cosine),
            other => Err(ConfigError::UnknownValue {
                name: "metric",
                value: other.to_string(),
            }),
        }
    }
}

/// An L2-normalised TF-IDF row: sorted `(term index, weight)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Entries are sorted by term index; duplicates are summed.
    pub fn new(dim: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|&(i, _)| i);
        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (i, w) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == i => *acc += w,
                _ => merged.push((i, w)),
            }
        }
        merged.retain(|&(_, w)| w != 0.0);
        SparseVector { dim, entries: merged }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm_squared(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum()
    }

    pub fn dot(&self, other: &SparseVector) -> Result<f64, ClusterError> {
        if self.dim != other.dim {
            return Err(ClusterError::DimensionMismatch {
                left: self.dim,
                right: other.dim,
            });
        }

        let (mut a, mut b) = (self.entries.iter().peekable(), other.entries.iter().peekable());
        let mut sum = 0.0;
        while let (Some(&&(i, x)), Some(&&(j, y))) = (a.peek(), b.peek()) {
            if i == j {
                sum += x * y;
                a.next();
                b.next();
            } else if i < j {
                a.next();
            } else {
                b.next();
            }
        }
        Ok(sum)
    }

    pub fn distance(&self, other: &SparseVector, metric: DistanceMetric) -> Result<f64, ClusterError> {
        let dot = self.dot(other)?;
        Ok(match metric {
            DistanceMetric::Euclidean => {
                (self.norm_squared() + other.norm_squared() - 2.0 * dot).max(0.0).sqrt()
            }
            DistanceMetric::Cosine => 1.0 - dot,
        })
    }
}

/// Union of the medical entities seen across a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterIndications {
    pub diseases: BTreeSet<String>,
    pub symptoms: BTreeSet<String>,
    pub indicators: BTreeSet<String>,
}

/// One deduplicated story: a representative record plus the reports it absorbed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    pub label: i32,
    pub main_title: String,
    pub main_summary: String,
    pub main_link: String,
    pub main_source: String,
    pub main_indications: EntityAnnotation,
    pub similar_items: Vec<NewsRecord>,
    pub cluster_indications: ClusterIndications,
}

impl ClusterResult {
    /// Representative plus similar items.
    pub fn size(&self) -> usize {
        self.similar_items.len() + 1
    }

    pub fn sources(&self) -> Vec<&str> {
        std::iter::once(self.main_source.as_str())
            .chain(self.similar_items.iter().map(|r| r.source.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_vector_merges_and_dots() {
        let a = SparseVector::new(4, vec![(2, 0.5), (0, 0.5), (2, 0.1), (3, 0.0)]);
        assert_eq!(a.entries(), &[(0, 0.5), (2, 0.6)]);
        let b = SparseVector::new(4, vec![(2, 1.0)]);
        assert!((a.dot(&b).unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn dimension_mismatch_is_reported() {
        let a = SparseVector::new(3, vec![(0, 1.0)]);
        let b = SparseVector::new(5, vec![(0, 1.0)]);
        assert_eq!(a.dot(&b), Err(ClusterError::DimensionMismatch { left: 3, right: 5 }));
    }

    #[test]
    fn distances() {
        let a = SparseVector::new(2, vec![(0, 1.0)]);
        let b = SparseVector::new(2, vec![(1, 1.0)]);
        assert!((a.distance(&b, DistanceMetric::Euclidean).unwrap() - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(a.distance(&b, DistanceMetric::Cosine).unwrap(), 1.0);
        assert_eq!(a.distance(&a, DistanceMetric::Euclidean).unwrap(), 0.0);
    }

    #[test]
    fn metric_parses() {
        assert_eq!("Cosine".parse::<DistanceMetric>().unwrap(), DistanceMetric::Cosine);
        assert!("manhattan".parse::<DistanceMetric>().is_err());
    }
}
