//! Capture decoding pipeline
//!
//! raw record -> normalized fingerprint -> matching protocols -> bits

mod stats;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, trace};

use crate::protocol::Catalog;
use crate::pulse::{map_pulses, CompressedFormat, PulseError, PulseInfo, Tolerance};

pub use stats::{DecoderStats, StatsSnapshot};

/// Payload decoded from one capture by one protocol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedFrame {
    /// Name of the matching protocol
    pub protocol: String,

    /// Translated bit string
    pub bits: String,

    /// Bits packed MSB first, zero padded, upper-case hex
    pub payload_hex: String,

    pub received_at: DateTime<Utc>,
}

impl DecodedFrame {
    pub fn bit_count(&self) -> usize {
        self.bits.len()
    }
}

/// Decodes raw capture records against a protocol catalog
pub struct PulseDecoder {
    catalog: Catalog,
    format: CompressedFormat,
    tolerance: Tolerance,
    stats: DecoderStats,
}

impl PulseDecoder {
    pub fn new(catalog: Catalog, format: CompressedFormat, tolerance: Tolerance) -> Self {
        Self {
            catalog,
            format,
            tolerance,
            stats: DecoderStats::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn stats(&self) -> &DecoderStats {
        &self.stats
    }

    /// Decode one raw capture record.
    ///
    /// Returns one frame per matching protocol that can translate the
    /// sequence. A malformed record is an error; no match is an empty list.
    pub fn decode_record(&self, raw: &[u8]) -> Result<Vec<DecodedFrame>, PulseError> {
        self.stats.record_capture();

        let pulse = match self.format.parse(raw) {
            Ok(p) => p,
            Err(e) => {
                self.stats.record_malformed();
                return Err(e);
            }
        };

        let frames = self.decode_pulse(&pulse);
        if frames.is_empty() {
            self.stats.record_unmatched();
        }
        Ok(frames)
    }

    /// Match and translate an already normalized fingerprint
    pub fn decode_pulse(&self, pulse: &PulseInfo) -> Vec<DecodedFrame> {
        let received_at = Utc::now();
        let mut frames = Vec::new();

        for protocol in self.catalog.matching(pulse, self.tolerance) {
            match map_pulses(&pulse.sequence, protocol.codes()) {
                Ok(bits) => {
                    trace!("{} matched: {} bits", protocol.name(), bits.len());
                    self.stats.record_frame();
                    frames.push(DecodedFrame {
                        protocol: protocol.name().to_string(),
                        payload_hex: bits_to_hex(&bits),
                        bits,
                        received_at,
                    });
                }
                Err(e) => {
                    // Fingerprint fits but the sequence does not; try the next one
                    debug!("{} matched but could not translate: {}", protocol.name(), e);
                    self.stats.record_translate_error();
                }
            }
        }

        frames
    }
}

/// Pack a '0'/'1' string into bytes, MSB first, and hex-encode it.
/// Any character other than '1' counts as a zero bit.
pub fn bits_to_hex(bits: &str) -> String {
    let bytes: Vec<u8> = bits
        .as_bytes()
        .chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &b)| acc | (((b == b'1') as u8) << (7 - i)))
        })
        .collect();
    hex::encode_upper(bytes)
}
