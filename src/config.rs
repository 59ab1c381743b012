//! Configuration loaded from environment variables

use std::path::PathBuf;

use crate::capture::CaptureSource;
use crate::pulse::{Tolerance, DEFAULT_HEADER_SLOTS};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Receiver program printing capture records (stdin when unset)
    pub capture_command: Option<String>,

    /// Arguments for the receiver program
    pub capture_args: Vec<String>,

    /// JSON protocol catalog (built-in catalog when unset)
    pub protocols_path: Option<PathBuf>,

    /// Relative pulse length tolerance for fingerprint matching
    pub tolerance: Tolerance,

    /// Number of pulse length fields in a capture record header
    pub header_slots: usize,

    /// Statistics reporting interval in milliseconds
    pub stats_interval_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            capture_command: var("CAPTURE_COMMAND").filter(|s| !s.trim().is_empty()),

            capture_args: var("CAPTURE_ARGS")
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),

            protocols_path: var("PROTOCOLS_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),

            tolerance: var("PULSE_TOLERANCE")
                .and_then(|s| s.parse().ok())
                .and_then(Tolerance::new)
                .unwrap_or_default(),

            header_slots: var("HEADER_SLOTS")
                .and_then(|s| s.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_HEADER_SLOTS),

            stats_interval_ms: var("STATS_INTERVAL_MS")
                .and_then(|s| s.parse().ok())
                .filter(|&ms| ms > 0)
                .unwrap_or(10_000),
        }
    }

    /// Capture source described by this configuration
    pub fn capture_source(&self) -> CaptureSource {
        match &self.capture_command {
            Some(program) => CaptureSource::Command {
                program: program.clone(),
                args: self.capture_args.clone(),
            },
            None => CaptureSource::Stdin,
        }
    }
}
