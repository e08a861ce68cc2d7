// src/extract/mod.rs

pub mod fields;
pub mod normalize;
pub mod split;

pub use fields::{extract_record, EmployeeRecord, Field, FIELD_COUNT, FIELD_SPECS};
pub use normalize::normalize;
pub use split::split_blocks;

use tracing::debug;

/// Normalize raw salary-list text, split it into blocks and extract one record per block.
///
/// Degenerate blocks are not filtered here; they come back as all-absent records.
#[tracing::instrument(level = "debug", skip(raw), fields(bytes = raw.len()))]
pub fn parse_document(raw: &str) -> Vec<EmployeeRecord> {
    let text = normalize(raw);
    let blocks = split_blocks(&text);
    debug!(blocks = blocks.len(), "split document");
    blocks.into_iter().map(extract_record).collect()
}
