pub mod clustering;
pub mod config;
pub mod entity;
pub mod environment;
pub mod error;
pub mod grouping;
pub mod knowledge;
pub mod logging;
pub mod news;
pub mod pipeline;

pub use clustering::{aggregate, cluster, ClusterResult, Clustering, NOISE_LABEL};
pub use entity::{assess, extract, EntityAnnotation, Severity};
pub use error::{
    AggregateError, ClusterError, ConfigError, EngineError, ExtractionError, KnowledgeBaseError,
};
pub use grouping::{group, similarity, GroupingStrategy, SimilarityGroup};
pub use knowledge::KnowledgeBase;
pub use news::{NewsRecord, RawNewsRecord};
pub use pipeline::{Pipeline, PipelineOptions, PipelineOutput};

pub const TARGET_ENTITY: &str = "entity";
pub const TARGET_CLUSTER: &str = "cluster";
pub const TARGET_KNOWLEDGE: &str = "knowledge";
pub const TARGET_PIPELINE: &str = "pipeline";
pub const TARGET_NEWS: &str = "news";
