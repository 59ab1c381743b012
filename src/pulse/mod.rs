//! Pulse capture normalization, matching and translation
//!
//! Pipeline for one capture:
//! 1. Normalize the raw compressed record (sorted lengths, rewritten ordinals)
//! 2. Match the fingerprint against protocol definitions
//! 3. Translate the pulse sequence into bits with the protocol's code table

mod compressed;
mod error;
mod mapper;
mod matcher;
mod sort;

use serde::{Deserialize, Serialize};

pub use compressed::{prepare_compressed, CompressedFormat, DEFAULT_HEADER_SLOTS};
pub use error::{CaptureDefect, PulseError};
pub use mapper::{code_symbols, map_pulses, CodeSymbols};
pub use matcher::{protocol_matches, Tolerance};
pub use sort::sort_indices;

/// Pulse fingerprint of one capture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseInfo {
    /// Distinct pulse lengths, ascending
    pub lengths: Vec<u32>,

    /// One ordinal character per pulse event, indexing `lengths`
    pub sequence: String,
}

impl PulseInfo {
    /// Number of pulse events in the sequence
    pub fn event_count(&self) -> usize {
        self.sequence.chars().count()
    }
}
