use rayon::prelude::*;
use tracing::debug;

use super::types::{Clustering, DistanceMetric, SparseVector, NOISE_LABEL};
use crate::error::{ClusterError, ConfigError};
use crate::TARGET_CLUSTER;

pub const DEFAULT_EPS: f64 = 0.3;
pub const DEFAULT_MIN_SAMPLES: usize = 2;

pub fn validate_eps(eps: f64) -> Result<(), ConfigError> {
    if eps.is_finite() && eps > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidEps(eps))
    }
}

pub fn validate_min_samples(min_samples: usize) -> Result<(), ConfigError> {
    if min_samples == 0 {
        Err(ConfigError::InvalidMinSamples)
    } else {
        Ok(())
    }
}

/// Density-based clustering over sparse vectors.
///
/// A point is core when at least `min_samples` other points lie within `eps`.
/// Under the cosine metric zero vectors have no direction, so they have no neighbours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dbscan {
    eps: f64,
    min_samples: usize,
    metric: DistanceMetric,
}

impl Default for Dbscan {
    fn default() -> Self {
        Dbscan {
            eps: DEFAULT_EPS,
            min_samples: DEFAULT_MIN_SAMPLES,
            metric: DistanceMetric::Euclidean,
        }
    }
}

impl Dbscan {
    pub fn new(eps: f64, min_samples: usize, metric: DistanceMetric) -> Result<Self, ConfigError> {
        validate_eps(eps)?;
        validate_min_samples(min_samples)?;
        Ok(Dbscan {
            eps,
            min_samples,
            metric,
        })
    }

    pub fn with_metric(self, metric: DistanceMetric) -> Self {
        Dbscan { metric, ..self }
    }

    /// Indices within `eps` of each point, excluding the point itself.
    fn neighbourhoods(&self, points: &[SparseVector]) -> Result<Vec<Vec<usize>>, ClusterError> {
        points
            .par_iter()
            .enumerate()
            .map(|(i, p)| {
                let mut neighbours = Vec::new();
                let cosine = self.metric == DistanceMetric::Cosine;
                if cosine && p.is_zero() {
                    return Ok(neighbours);
                }
                for (j, q) in points.iter().enumerate() {
                    if i == j || (cosine && q.is_zero()) {
                        continue;
                    }
                    if p.distance(q, self.metric)? <= self.eps {
                        neighbours.push(j);
                    }
                }
                Ok(neighbours)
            })
            .collect()
    }

    /// One label per point; `-1` is noise. Labels are numbered in scan order.
    pub fn labels(&self, points: &[SparseVector]) -> Result<Vec<i32>, ClusterError> {
        let neighbourhoods = self.neighbourhoods(points)?;
        let core: Vec<bool> = neighbourhoods
            .iter()
            .map(|n| n.len() >= self.min_samples)
            .collect();

        let mut labels = vec![NOISE_LABEL; points.len()];
        let mut visited = vec![false; points.len()];
        let mut next_label = 0;

        for i in 0..points.len() {
            if visited[i] || !core[i] {
                continue;
            }
            visited[i] = true;
            labels[i] = next_label;

            let mut stack: Vec<usize> = neighbourhoods[i].clone();
            while let Some(j) = stack.pop() {
                if visited[j] {
                    continue;
                }
                visited[j] = true;
                labels[j] = next_label;
                if core[j] {
                    stack.extend(neighbourhoods[j].iter().copied().filter(|&k| !visited[k]));
                }
            }
            next_label += 1;
        }

        debug!(
            target: TARGET_CLUSTER,
            "DBSCAN found {} clusters among {} points (eps={}, min_samples={}, metric={})",
            next_label, points.len(), self.eps, self.min_samples, self.metric
        );

        Ok(labels)
    }

    pub fn fit(&self, points: &[SparseVector]) -> Result<Clustering, ClusterError> {
        Ok(labels_to_clustering(&self.labels(points)?))
    }
}

/// Groups per-point labels into label -> ascending indices.
pub fn labels_to_clustering(labels: &[i32]) -> Clustering {
    let mut clustering = Clustering::new();
    for (index, &label) in labels.iter().enumerate() {
        clustering.entry(label).or_default().push(index);
    }
    clustering
}
