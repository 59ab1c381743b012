//! Decoder statistics

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between the decode loop and the stats reporter
#[derive(Debug, Default)]
pub struct DecoderStats {
    pub captures_seen: AtomicU64,
    pub malformed: AtomicU64,
    pub unmatched: AtomicU64,
    pub frames_decoded: AtomicU64,
    pub translate_errors: AtomicU64,
}

impl DecoderStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_capture(&self) {
        self.captures_seen.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unmatched(&self) {
        self.unmatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_frame(&self) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translate_error(&self) {
        self.translate_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            captures_seen: self.captures_seen.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            unmatched: self.unmatched.load(Ordering::Relaxed),
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            translate_errors: self.translate_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`DecoderStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub captures_seen: u64,
    pub malformed: u64,
    pub unmatched: u64,
    pub frames_decoded: u64,
    pub translate_errors: u64,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Captures: {} | Frames: {} | Malformed: {} | Unmatched: {} | Untranslatable: {}",
            self.captures_seen,
            self.frames_decoded,
            self.malformed,
            self.unmatched,
            self.translate_errors
        )
    }
}
