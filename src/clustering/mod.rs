//! Vector-space clustering of news records and aggregation of any clustering
//! into ordered, annotated results.

pub mod aggregate;
pub mod dbscan;
pub mod engine;
pub mod stop_words;
#[cfg(test)]
mod tests;
pub mod tfidf;
pub mod types;

pub use aggregate::aggregate;
pub use dbscan::{
    labels_to_clustering, validate_eps, validate_min_samples, Dbscan, DEFAULT_EPS,
    DEFAULT_MIN_SAMPLES,
};
pub use engine::{cluster, VectorClusterer};
pub use tfidf::TfIdf;
pub use types::*;
