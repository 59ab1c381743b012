//! Pulse fingerprint matching against protocol definitions

use crate::protocol::Protocol;

use super::PulseInfo;

/// Relative deviation allowed between a measured and a nominal pulse length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance(f64);

impl Tolerance {
    /// Default deviation (5%) absorbs receiver clock jitter
    pub const DEFAULT: Tolerance = Tolerance(0.05);

    /// Create a tolerance from a ratio in `(0, 1)`
    pub fn new(ratio: f64) -> Option<Self> {
        if ratio > 0.0 && ratio < 1.0 {
            Some(Self(ratio))
        } else {
            None
        }
    }

    pub fn ratio(&self) -> f64 {
        self.0
    }

    /// Check whether `measured` lies within tolerance of `expected`
    #[inline]
    pub fn accepts(&self, measured: u32, expected: u32) -> bool {
        let deviation = (measured as f64 - expected as f64).abs();
        deviation <= expected as f64 * self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Check whether a pulse fingerprint could have been produced by `protocol`.
///
/// Checks, in order: number of distinct lengths, sequence length, and
/// per-position length deviation. Both length lists are ascending.
pub fn protocol_matches(pulse: &PulseInfo, protocol: &Protocol, tolerance: Tolerance) -> bool {
    if pulse.lengths.len() != protocol.lengths().len() {
        return false;
    }

    if !protocol.seq_lengths().contains(&pulse.event_count()) {
        return false;
    }

    pulse
        .lengths
        .iter()
        .zip(protocol.lengths())
        .all(|(&measured, &expected)| tolerance.accepts(measured, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::CodeTable;

    const SEQ: &str = "0102020101020201020101020102010202020202020202010201010202010202020202020103";

    fn pulse(seq: &str) -> PulseInfo {
        PulseInfo {
            lengths: vec![516, 2116, 4152, 9112],
            sequence: seq.to_string(),
        }
    }

    fn codes() -> CodeTable {
        CodeTable::new(2, [("01", "0"), ("02", "1"), ("03", "")]).unwrap()
    }

    fn protocol(lengths: Vec<u32>) -> Protocol {
        Protocol::new("test", lengths, vec![76], codes()).unwrap()
    }

    #[test]
    fn test_protocol_matches() {
        let p = pulse(SEQ);
        let pc = protocol(vec![496, 2048, 4068, 8960]);
        assert!(protocol_matches(&p, &pc, Tolerance::default()));
    }

    #[test]
    fn test_pulse_seq_too_short() {
        let p = pulse("010202010102020102");
        let pc = protocol(vec![496, 2048, 4068, 8960]);
        assert!(!protocol_matches(&p, &pc, Tolerance::default()));
    }

    #[test]
    fn test_pulse_length_deviation_too_high() {
        let p = pulse(SEQ);
        // Not ascending, so Protocol::new would refuse it
        let pc = Protocol::unchecked("test", vec![496, 2048, 2000, 8960], vec![76], codes());
        assert!(!protocol_matches(&p, &pc, Tolerance::default()));
    }

    #[test]
    fn test_number_of_pulse_lengths_differ() {
        let p = pulse(SEQ);
        let pc = protocol(vec![496, 2048, 4068]);
        assert!(!protocol_matches(&p, &pc, Tolerance::default()));

        // Cardinality wins even with an otherwise perfect fit
        let pc = Protocol::new("exact", vec![516, 2116, 4152], vec![SEQ.len()], codes()).unwrap();
        assert!(!protocol_matches(&p, &pc, Tolerance::default()));
    }

    #[test]
    fn test_sequence_length_gate_with_exact_lengths() {
        let p = PulseInfo {
            lengths: vec![496, 2048, 4068, 8960],
            sequence: SEQ[..74].to_string(),
        };
        let pc = protocol(vec![496, 2048, 4068, 8960]);
        assert!(!protocol_matches(&p, &pc, Tolerance::default()));
    }

    #[test]
    fn test_tolerance_boundary() {
        let pc = protocol(vec![1000, 2000, 4000, 8000]);
        let inside = PulseInfo {
            lengths: vec![1040, 1950, 4100, 8200],
            sequence: SEQ.to_string(),
        };
        assert!(protocol_matches(&inside, &pc, Tolerance::default()));

        let past_edge = PulseInfo {
            lengths: vec![1060, 1950, 4100, 8200],
            sequence: SEQ.to_string(),
        };
        assert!(!protocol_matches(&past_edge, &pc, Tolerance::default()));

        // A looser tolerance accepts it again
        let loose = Tolerance::new(0.10).unwrap();
        assert!(protocol_matches(&past_edge, &pc, loose));
    }

    #[test]
    fn test_tolerance_monotonic() {
        let pc = protocol(vec![496, 2048, 4068, 8960]);
        let mut p = pulse(SEQ);
        let mut matched = protocol_matches(&p, &pc, Tolerance::default());
        assert!(matched);

        // Drifting further away never turns a miss back into a match
        for _ in 0..200 {
            p.lengths[2] += 10;
            let now = protocol_matches(&p, &pc, Tolerance::default());
            assert!(matched || !now);
            matched = now;
        }
        assert!(!matched);
    }

    #[test]
    fn test_tolerance_new() {
        assert!(Tolerance::new(0.0).is_none());
        assert!(Tolerance::new(1.0).is_none());
        assert!(Tolerance::new(f64::NAN).is_none());
        assert_eq!(Tolerance::new(0.2).unwrap().ratio(), 0.2);
    }
}
