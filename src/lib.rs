//! RF pulse decoder - sub-GHz OOK capture fingerprinting and decoding
//!
//! Normalizes compressed pulse captures from a 433/868 MHz receiver, matches
//! their pulse length fingerprint against known protocols and translates the
//! pulse sequence of a matching capture into payload bits.
//!
//! ```
//! use rf_pulse_decoder::protocol::Catalog;
//! use rf_pulse_decoder::pulse::{map_pulses, prepare_compressed, Tolerance};
//!
//! let raw = "516 2116 4152 9112 0 0 0 0 \
//!            0102020101020201020101020102010202020202020202010201010202010202020202020103";
//! let pulse = prepare_compressed(raw).unwrap();
//!
//! let catalog = Catalog::builtin();
//! let protocol = catalog.matching(&pulse, Tolerance::default()).next().unwrap();
//! let bits = map_pulses(&pulse.sequence, protocol.codes()).unwrap();
//! assert_eq!(bits.len(), 37);
//! ```

pub mod capture;
pub mod config;
pub mod decoder;
pub mod protocol;
pub mod pulse;
