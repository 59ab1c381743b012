//! Protocol catalog

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use super::{CatalogError, CodeTable, Protocol};
use crate::pulse::{protocol_matches, PulseInfo, Tolerance};

/// Ordered set of protocol definitions.
///
/// Matching reports every protocol that fits, in catalog order; picking one
/// is up to the caller.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    protocols: Vec<Protocol>,
}

impl Catalog {
    pub fn new(protocols: Vec<Protocol>) -> Result<Self, CatalogError> {
        {
            let mut names = HashSet::new();
            for protocol in &protocols {
                if !names.insert(protocol.name()) {
                    return Err(CatalogError::DuplicateProtocol(protocol.name().to_string()));
                }
            }
        }
        Ok(Self { protocols })
    }

    /// Protocols compiled into the decoder
    pub fn builtin() -> Self {
        Self {
            protocols: vec![gt_wt_01()],
        }
    }

    /// Parse a JSON array of protocol definitions
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let protocols: Vec<Protocol> = serde_json::from_str(json)?;
        Self::new(protocols)
    }

    /// Load a JSON catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        debug!("Loaded {} protocols from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Protocol> {
        self.protocols.iter()
    }

    /// Every protocol whose fingerprint fits `pulse`
    pub fn matching<'a>(
        &'a self,
        pulse: &'a PulseInfo,
        tolerance: Tolerance,
    ) -> impl Iterator<Item = &'a Protocol> + 'a {
        self.protocols
            .iter()
            .filter(move |protocol| protocol_matches(pulse, protocol, tolerance))
    }
}

/// GT-WT-01 temperature/humidity sensor: 36 data bits and a sync footer
fn gt_wt_01() -> Protocol {
    Protocol {
        name: "gt-wt-01".to_string(),
        lengths: vec![496, 2048, 4068, 8960],
        seq_lengths: vec![76],
        codes: CodeTable::from_static(2, &[("01", "0"), ("02", "1"), ("03", "")]),
    }
}
