pub mod extraction;
pub mod severity;
pub mod types;

pub use extraction::{annotate, annotate_all, extract, try_extract, MAX_TEXT_BYTES};
pub use severity::assess;
pub use types::*;
