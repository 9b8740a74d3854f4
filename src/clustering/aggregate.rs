use tracing::debug;

use super::types::{ClusterIndications, ClusterResult, Clustering, NOISE_LABEL};
use crate::entity::EntityAnnotation;
use crate::error::AggregateError;
use crate::news::NewsRecord;
use crate::TARGET_CLUSTER;

/// Turn a clustering into ordered, annotated results.
///
/// `annotations[i]` must describe `records[i]`. Noise and empty clusters are dropped.
/// The representative is the earliest member; results are ordered by its confidence,
/// then by cluster size, ties keeping label order.
pub fn aggregate(
    clustering: &Clustering,
    records: &[NewsRecord],
    annotations: &[EntityAnnotation],
) -> Result<Vec<ClusterResult>, AggregateError> {
    if records.len() != annotations.len() {
        return Err(AggregateError::LengthMismatch {
            records: records.len(),
            annotations: annotations.len(),
        });
    }

    let mut results = Vec::new();
    for (&label, members) in clustering {
        if label == NOISE_LABEL {
            continue;
        }

        let mut members = members.clone();
        members.sort_unstable();
        members.dedup();

        let Some(&representative) = members.first() else {
            continue;
        };
        if let Some(&index) = members.iter().find(|&&i| i >= records.len()) {
            return Err(AggregateError::IndexOutOfRange {
                label,
                index,
                len: records.len(),
            });
        }

        let mut cluster_indications = ClusterIndications::default();
        for &i in &members {
            let annotation = &annotations[i];
            cluster_indications
                .diseases
                .extend(annotation.disease_names().map(str::to_string));
            cluster_indications.symptoms.extend(annotation.symptoms.iter().cloned());
            cluster_indications.indicators.extend(annotation.indicators.iter().cloned());
        }

        let main = &records[representative];
        results.push(ClusterResult {
            label,
            main_title: main.title.clone(),
            main_summary: main.summary.clone(),
            main_link: main.link.clone(),
            main_source: main.source.clone(),
            main_indications: annotations[representative].clone(),
            similar_items: members[1..].iter().map(|&i| records[i].clone()).collect(),
            cluster_indications,
        });
    }

    // sort_by is stable
    results.sort_by(|a, b| {
        b.main_indications
            .confidence
            .total_cmp(&a.main_indications.confidence)
            .then_with(|| b.size().cmp(&a.size()))
    });

    debug!(target: TARGET_CLUSTER, "Aggregated {} clusters from {} labels", results.len(), clustering.len());

    Ok(results)
}
