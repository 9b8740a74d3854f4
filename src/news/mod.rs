//! News records as handed over by the ingestion side.

pub mod date;
pub mod types;

pub use date::parse_date;
pub use types::{NewsRecord, RawNewsRecord};
