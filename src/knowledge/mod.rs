//! Read-only medical knowledge base.
//!
//! Built once (from the built-in taxonomy, keyword files, or both) and passed by
//! reference into every extraction call. Nothing here is global.

pub mod builtin;
pub mod loader;
pub mod types;

pub use loader::{parse_indications, parse_keyword_list};
pub use types::*;

/// Reliability assigned to diseases loaded from a list that gives none.
pub const DEFAULT_RELIABILITY: f64 = 0.8;
