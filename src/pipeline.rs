//! Batch run over one materialised set of records: filter, annotate, group, aggregate.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clustering::{aggregate, ClusterResult, NOISE_LABEL};
use crate::config::EngineConfig;
use crate::entity::{annotate_all, EntityAnnotation};
use crate::error::EngineError;
use crate::grouping::{GroupingStrategy, PairwiseGrouper};
use crate::knowledge::KnowledgeBase;
use crate::news::NewsRecord;
use crate::TARGET_PIPELINE;

const PAIRWISE: &str = "pairwise";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub config: EngineConfig,
    /// "Today" for the age filter. Defaults to the local date at run time.
    pub reference_date: Option<NaiveDate>,
}

impl From<EngineConfig> for PipelineOptions {
    fn from(config: EngineConfig) -> Self {
        PipelineOptions {
            config,
            reference_date: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub input: usize,
    /// Complete and recent enough.
    pub kept: usize,
    pub with_medical_info: usize,
    pub clusters: usize,
    pub noise: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub clusters: Vec<ClusterResult>,
    pub stats: PipelineStats,
}

pub struct Pipeline {
    kb: KnowledgeBase,
    options: PipelineOptions,
    strategy: Option<Box<dyn GroupingStrategy>>,
}

impl Pipeline {
    pub fn new(kb: KnowledgeBase, options: PipelineOptions) -> Self {
        Pipeline {
            kb,
            options,
            strategy: None,
        }
    }

    /// Group with `strategy` instead of the one named by the config.
    pub fn with_strategy(mut self, strategy: Box<dyn GroupingStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn run(&self, records: &[NewsRecord]) -> Result<PipelineOutput, EngineError> {
        let config = &self.options.config;
        config.validate()?;

        let mut stats = PipelineStats {
            input: records.len(),
            ..PipelineStats::default()
        };

        let reference = self
            .options
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());

        let kept: Vec<NewsRecord> = records
            .iter()
            .filter(|record| {
                if !record.is_complete() {
                    debug!(target: TARGET_PIPELINE, "Skipping incomplete record '{}'", record.title);
                    return false;
                }
                match (config.max_age_days, record.date) {
                    (Some(days), Some(date)) if (reference - date).num_days() > days => {
                        debug!(target: TARGET_PIPELINE, "Skipping stale record '{}' from {}", record.title, date);
                        false
                    }
                    _ => true,
                }
            })
            .cloned()
            .collect();
        stats.kept = kept.len();

        let annotations = annotate_all(&kept, &self.kb);
        stats.with_medical_info = annotations.iter().filter(|a| a.has_medical_info).count();

        let (records, annotations): (Vec<NewsRecord>, Vec<EntityAnnotation>) = if config.require_medical_info {
            kept.into_iter()
                .zip(annotations)
                .filter(|(_, annotation)| annotation.has_medical_info)
                .unzip()
        } else {
            (kept, annotations)
        };

        if records.is_empty() {
            info!(target: TARGET_PIPELINE, "No records left to group ({} received)", stats.input);
            return Ok(PipelineOutput {
                clusters: Vec::new(),
                stats,
            });
        }

        let built: Box<dyn GroupingStrategy>;
        let strategy: &dyn GroupingStrategy = match &self.strategy {
            Some(strategy) => strategy.as_ref(),
            None => {
                built = config.strategy.build(config)?;
                built.as_ref()
            }
        };
        let clustering = match strategy.assign(&records) {
            Ok(clustering) => clustering,
            Err(e) if config.fallback_to_pairwise && strategy.name() != PAIRWISE => {
                warn!(
                    target: TARGET_PIPELINE,
                    "{} grouping failed, falling back to pairwise: {}", strategy.name(), e
                );
                PairwiseGrouper::new(config.title_threshold, config.summary_threshold)?.assign(&records)?
            }
            Err(e) => return Err(e),
        };

        stats.noise = clustering.get(&NOISE_LABEL).map_or(0, Vec::len);
        let clusters = aggregate(&clustering, &records, &annotations)?;
        stats.clusters = clusters.len();

        info!(
            target: TARGET_PIPELINE,
            "Pipeline finished - input={}, kept={}, medical={}, clusters={}, noise={}",
            stats.input, stats.kept, stats.with_medical_info, stats.clusters, stats.noise
        );

        Ok(PipelineOutput { clusters, stats })
    }
}
