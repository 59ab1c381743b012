//! Protocol definitions and the protocol catalog

mod catalog;
mod code_table;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::Catalog;
pub use code_table::CodeTable;

/// Errors raised while building or loading protocol definitions
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("code width must be at least 1")]
    ZeroCodeWidth,

    #[error("code {code:?} is not {width} characters wide")]
    CodeWidthMismatch { code: String, width: usize },

    #[error("duplicate code {0:?}")]
    DuplicateCode(String),

    #[error("code table is empty")]
    EmptyCodeTable,

    #[error("protocol {0:?} has no pulse lengths")]
    NoLengths(String),

    #[error("protocol {0:?} pulse lengths must be non-zero and strictly ascending")]
    LengthsNotAscending(String),

    #[error("protocol {0:?} accepts no sequence length")]
    NoSequenceLengths(String),

    #[error("duplicate protocol {0:?}")]
    DuplicateProtocol(String),
}

/// A known radio protocol, identified by its pulse timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProtocolSpec", into = "ProtocolSpec")]
pub struct Protocol {
    name: String,
    lengths: Vec<u32>,
    seq_lengths: Vec<usize>,
    codes: CodeTable,
}

impl Protocol {
    pub fn new(
        name: impl Into<String>,
        lengths: Vec<u32>,
        seq_lengths: Vec<usize>,
        codes: CodeTable,
    ) -> Result<Self, CatalogError> {
        let name = name.into();

        if lengths.is_empty() {
            return Err(CatalogError::NoLengths(name));
        }
        if lengths[0] == 0 || lengths.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CatalogError::LengthsNotAscending(name));
        }
        if seq_lengths.is_empty() {
            return Err(CatalogError::NoSequenceLengths(name));
        }

        Ok(Self {
            name,
            lengths,
            seq_lengths,
            codes,
        })
    }

    /// Build a definition without validation, for malformed-definition tests
    #[cfg(test)]
    pub(crate) fn unchecked(
        name: &str,
        lengths: Vec<u32>,
        seq_lengths: Vec<usize>,
        codes: CodeTable,
    ) -> Self {
        Self {
            name: name.to_string(),
            lengths,
            seq_lengths,
            codes,
        }
    }

    /// Catalog name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nominal pulse lengths, ascending
    pub fn lengths(&self) -> &[u32] {
        &self.lengths
    }

    /// Accepted pulse event counts per capture
    pub fn seq_lengths(&self) -> &[usize] {
        &self.seq_lengths
    }

    /// Pulse code to bit mapping
    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }
}

/// On-disk shape of a protocol definition
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProtocolSpec {
    name: String,
    lengths: Vec<u32>,
    seq_lengths: Vec<usize>,
    #[serde(default = "default_code_width")]
    code_width: usize,
    codes: BTreeMap<String, String>,
}

fn default_code_width() -> usize {
    2
}

impl TryFrom<ProtocolSpec> for Protocol {
    type Error = CatalogError;

    fn try_from(spec: ProtocolSpec) -> Result<Self, Self::Error> {
        let codes = CodeTable::new(spec.code_width, spec.codes)?;
        Protocol::new(spec.name, spec.lengths, spec.seq_lengths, codes)
    }
}

impl From<Protocol> for ProtocolSpec {
    fn from(protocol: Protocol) -> Self {
        Self {
            code_width: protocol.codes.width().get(),
            codes: protocol
                .codes
                .iter()
                .map(|(c, f)| (c.to_string(), f.to_string()))
                .collect(),
            name: protocol.name,
            lengths: protocol.lengths,
            seq_lengths: protocol.seq_lengths,
        }
    }
}
