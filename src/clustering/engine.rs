use tracing::{info, warn};

use super::dbscan::Dbscan;
use super::tfidf::TfIdf;
use super::types::{Clustering, DistanceMetric, NOISE_LABEL};
use crate::error::{ClusterError, ConfigError, EngineError};
use crate::grouping::GroupingStrategy;
use crate::news::NewsRecord;
use crate::TARGET_CLUSTER;

/// TF-IDF vectorisation of `title + summary` followed by DBSCAN.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VectorClusterer {
    dbscan: Dbscan,
}

impl VectorClusterer {
    pub fn new(eps: f64, min_samples: usize) -> Result<Self, ConfigError> {
        Ok(VectorClusterer {
            dbscan: Dbscan::new(eps, min_samples, DistanceMetric::Euclidean)?,
        })
    }

    pub fn with_metric(self, metric: DistanceMetric) -> Self {
        VectorClusterer {
            dbscan: self.dbscan.with_metric(metric),
        }
    }

    pub fn cluster(&self, records: &[NewsRecord]) -> Result<Clustering, ClusterError> {
        if records.is_empty() {
            return Ok(Clustering::new());
        }

        let documents: Vec<String> = records.iter().map(NewsRecord::document).collect();
        let (model, vectors) = TfIdf::fit_transform(&documents);

        if model.vocabulary_len() == 0 {
            warn!(
                target: TARGET_CLUSTER,
                "Empty vocabulary for {} documents, labelling every record as noise", records.len()
            );
            return Ok(Clustering::from([(NOISE_LABEL, (0..records.len()).collect())]));
        }

        let clustering = self.dbscan.fit(&vectors)?;
        info!(
            target: TARGET_CLUSTER,
            "Vector clustering - records={}, clusters={}, noise={}",
            records.len(),
            clustering.keys().filter(|&&l| l != NOISE_LABEL).count(),
            clustering.get(&NOISE_LABEL).map_or(0, Vec::len)
        );
        Ok(clustering)
    }
}

impl GroupingStrategy for VectorClusterer {
    fn name(&self) -> &'static str {
        "vector"
    }

    fn assign(&self, records: &[NewsRecord]) -> Result<Clustering, EngineError> {
        Ok(self.cluster(records)?)
    }
}

/// Cluster `records` with TF-IDF and Euclidean DBSCAN. See [`VectorClusterer`].
pub fn cluster(records: &[NewsRecord], eps: f64, min_samples: usize) -> Result<Clustering, ClusterError> {
    VectorClusterer::new(eps, min_samples)?.cluster(records)
}
