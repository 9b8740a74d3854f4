use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::similarity::similarity;
use super::GroupingStrategy;
use crate::clustering::Clustering;
use crate::config::validate_threshold;
use crate::error::{ConfigError, EngineError};
use crate::news::NewsRecord;
use crate::TARGET_CLUSTER;

pub const DEFAULT_TITLE_THRESHOLD: f64 = 0.6;
pub const DEFAULT_SUMMARY_THRESHOLD: f64 = 0.4;

/// Records reporting the same headline, possibly from several sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityGroup {
    pub representative_title: String,
    pub representative_summary: String,
    /// Indices into the grouped input, seed record first.
    pub member_indices: Vec<usize>,
    pub member_records: Vec<NewsRecord>,
    pub member_sources: Vec<String>,
    pub member_links: Vec<String>,
    pub member_dates: Vec<Option<NaiveDate>>,
}

impl SimilarityGroup {
    fn from_indices(indices: Vec<usize>, records: &[NewsRecord]) -> Self {
        let seed = &records[indices[0]];
        let member_records: Vec<NewsRecord> = indices.iter().map(|&i| records[i].clone()).collect();

        SimilarityGroup {
            representative_title: seed.title.clone(),
            representative_summary: seed.summary.clone(),
            member_sources: member_records.iter().map(|r| r.source.clone()).collect(),
            member_links: member_records.iter().map(|r| r.link.clone()).collect(),
            member_dates: member_records.iter().map(|r| r.date).collect(),
            member_indices: indices,
            member_records,
        }
    }

    pub fn len(&self) -> usize {
        self.member_records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_records.is_empty()
    }
}

/// Greedy single-pass grouping by title or summary similarity.
///
/// Records are visited in input order; each unassigned record seeds a group and
/// absorbs every later unassigned record similar to it. First match wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairwiseGrouper {
    title_threshold: f64,
    summary_threshold: f64,
}

impl Default for PairwiseGrouper {
    fn default() -> Self {
        PairwiseGrouper {
            title_threshold: DEFAULT_TITLE_THRESHOLD,
            summary_threshold: DEFAULT_SUMMARY_THRESHOLD,
        }
    }
}

impl PairwiseGrouper {
    pub fn new(title_threshold: f64, summary_threshold: f64) -> Result<Self, ConfigError> {
        validate_threshold("title_threshold", title_threshold)?;
        validate_threshold("summary_threshold", summary_threshold)?;
        Ok(PairwiseGrouper {
            title_threshold,
            summary_threshold,
        })
    }

    /// Either similar titles or similar summaries are enough to merge.
    ///
    /// Two empty summaries are identical, so they match.
    pub fn is_similar(&self, a: &NewsRecord, b: &NewsRecord) -> bool {
        similarity(&a.title, &b.title) >= self.title_threshold
            || similarity(&a.summary, &b.summary) >= self.summary_threshold
    }

    /// Member indices per group, largest group first (ties keep discovery order).
    pub fn group_indices(&self, records: &[NewsRecord]) -> Vec<Vec<usize>> {
        let total = records.len();
        let mut assigned = vec![false; total];
        let mut groups: Vec<Vec<usize>> = Vec::new();

        for i in 0..total {
            if i % 50 == 0 && i > 0 {
                info!(
                    target: TARGET_CLUSTER,
                    "Grouping progress - processed={}/{}, groups={}", i, total, groups.len()
                );
            }
            if assigned[i] {
                continue;
            }
            assigned[i] = true;

            let mut members = vec![i];
            for j in (i + 1)..total {
                if !assigned[j] && self.is_similar(&records[i], &records[j]) {
                    assigned[j] = true;
                    members.push(j);
                }
            }
            groups.push(members);
        }

        // sort_by is stable
        groups.sort_by(|a, b| b.len().cmp(&a.len()));

        debug!(
            target: TARGET_CLUSTER,
            "Grouped {} records into {} groups (title>={}, summary>={})",
            total, groups.len(), self.title_threshold, self.summary_threshold
        );

        groups
    }

    pub fn group(&self, records: &[NewsRecord]) -> Vec<SimilarityGroup> {
        self.group_indices(records)
            .into_iter()
            .map(|indices| SimilarityGroup::from_indices(indices, records))
            .collect()
    }
}

impl GroupingStrategy for PairwiseGrouper {
    fn name(&self) -> &'static str {
        "pairwise"
    }

    fn assign(&self, records: &[NewsRecord]) -> Result<Clustering, EngineError> {
        let mut clustering = BTreeMap::new();
        for (label, mut indices) in self.group_indices(records).into_iter().enumerate() {
            indices.sort_unstable();
            clustering.insert(label as i32, indices);
        }
        Ok(clustering)
    }
}

/// Group `records` by title or summary similarity. See [`PairwiseGrouper`].
pub fn group(
    records: &[NewsRecord],
    title_threshold: f64,
    summary_threshold: f64,
) -> Result<Vec<SimilarityGroup>, ConfigError> {
    Ok(PairwiseGrouper::new(title_threshold, summary_threshold)?.group(records))
}

/// Title-only grouping over records pre-sorted by title, so similar headlines sit together.
///
/// Groups come out in title order rather than by size.
pub fn group_by_title(
    records: &[NewsRecord],
    threshold: f64,
) -> Result<Vec<SimilarityGroup>, ConfigError> {
    validate_threshold("title_threshold", threshold)?;

    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| records[a].title.cmp(&records[b].title));

    let mut assigned = vec![false; records.len()];
    let mut groups = Vec::new();

    for (pos, &i) in order.iter().enumerate() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;

        let mut members = vec![i];
        for &j in &order[pos + 1..] {
            if !assigned[j] && similarity(&records[i].title, &records[j].title) >= threshold {
                assigned[j] = true;
                members.push(j);
            }
        }
        groups.push(SimilarityGroup::from_indices(members, records));
    }

    Ok(groups)
}
