//! Typed errors for the medwire engine.
//!
//! The library returns these `thiserror` enums; the binaries wrap them in
//! `anyhow::Result`.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid thresholds or clustering parameters. Raised at call time, never clamped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("threshold `{name}` must be within [0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("eps must be a finite positive number, got {0}")]
    InvalidEps(f64),

    #[error("min_samples must be at least 1")]
    InvalidMinSamples,

    #[error("reliability for disease `{disease}` must be within [0, 1], got {value}")]
    InvalidReliability { disease: String, value: f64 },

    #[error("unknown {name} `{value}`")]
    UnknownValue { name: &'static str, value: String },

    #[error("environment variable {var} has invalid value `{value}`")]
    InvalidEnv { var: String, value: String },
}

/// Per-record extraction failures. The pipeline degrades these to an empty annotation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("text of {len} bytes exceeds the extraction limit")]
    TextTooLarge { len: usize },

    #[error("text contains NUL bytes")]
    InvalidText,
}

#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Corpus-level failures of the vector clustering engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("vector dimensions don't match: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    #[error("{records} records but {annotations} annotations")]
    LengthMismatch { records: usize, annotations: usize },

    #[error("cluster {label} references record {index}, but only {len} records exist")]
    IndexOutOfRange { label: i32, index: usize, len: usize },
}

/// Umbrella error returned by grouping strategies and the pipeline.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    KnowledgeBase(#[from] KnowledgeBaseError),
}
