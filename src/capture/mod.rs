//! Raw capture acquisition
//!
//! The receiver (an RF sniffer on a serial link, a replay script, ...) is an
//! external program. We only read its newline-delimited capture records.

mod runner;

pub use runner::{CaptureRunner, CaptureSource};
