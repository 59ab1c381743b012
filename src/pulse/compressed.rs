//! Compressed capture normalization
//!
//! A raw capture record looks like:
//!
//! ```text
//! 255 2904 1388 771 11346 0 0 0 0100020002...0034
//! ```
//!
//! A fixed number of pulse length slots (zero = unused), followed by one
//! token of ordinal digits. Each digit names the pulse length of one event by
//! its position among the non-zero slots, in header order. Normalizing sorts
//! the lengths ascending and rewrites every digit to the sorted rank.

use super::error::{CaptureDefect, PulseError};
use super::sort::sort_indices;
use super::PulseInfo;

/// Header slot count emitted by the receiver firmware
pub const DEFAULT_HEADER_SLOTS: usize = 8;

/// Single decimal digits can address at most this many pulse lengths
const MAX_ORDINALS: usize = 10;

/// Shape of a compressed capture record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedFormat {
    /// Number of whitespace-separated length fields before the sequence
    pub header_slots: usize,
}

impl Default for CompressedFormat {
    fn default() -> Self {
        Self {
            header_slots: DEFAULT_HEADER_SLOTS,
        }
    }
}

impl CompressedFormat {
    pub fn new(header_slots: usize) -> Self {
        Self { header_slots }
    }

    /// Parse and normalize a raw capture record.
    ///
    /// The whole record is validated before anything is rewritten, so an
    /// error never comes with a partial result.
    pub fn parse(&self, raw: &[u8]) -> Result<PulseInfo, PulseError> {
        let tokens = fields(raw);

        if tokens.len() < self.header_slots {
            return Err(CaptureDefect::HeaderTooShort {
                expected: self.header_slots,
                found: tokens.len(),
            }
            .into());
        }

        // Non-zero slots, header order
        let mut original = Vec::with_capacity(self.header_slots);
        for (index, &(_, field)) in tokens[..self.header_slots].iter().enumerate() {
            let length = parse_length(field).ok_or_else(|| CaptureDefect::InvalidHeaderField {
                index,
                field: String::from_utf8_lossy(field).into_owned(),
            })?;
            if length != 0 {
                original.push(length);
            }
        }

        if original.len() > MAX_ORDINALS {
            return Err(CaptureDefect::TooManyLengths {
                found: original.len(),
            }
            .into());
        }

        let (seq_offset, seq) = *tokens
            .get(self.header_slots)
            .ok_or(CaptureDefect::MissingSequence)?;

        let available = original.len();
        for (i, &byte) in seq.iter().enumerate() {
            if !byte.is_ascii_digit() {
                return Err(CaptureDefect::InvalidByte {
                    byte,
                    offset: seq_offset + i,
                }
                .into());
            }
            let ordinal = byte - b'0';
            if ordinal as usize >= available {
                return Err(CaptureDefect::OrdinalOutOfRange {
                    ordinal,
                    offset: seq_offset + i,
                    available,
                }
                .into());
            }
        }

        if let Some(&(offset, _)) = tokens.get(self.header_slots + 1) {
            return Err(CaptureDefect::TrailingData { offset }.into());
        }

        // Equal lengths are one pulse class and share a rank
        let mut ranks = vec![0usize; available];
        let mut lengths: Vec<u32> = Vec::with_capacity(available);
        for i in sort_indices(&original) {
            if lengths.last() != Some(&original[i]) {
                lengths.push(original[i]);
            }
            ranks[i] = lengths.len() - 1;
        }

        let sequence = seq
            .iter()
            .map(|&byte| (b'0' + ranks[(byte - b'0') as usize] as u8) as char)
            .collect();

        Ok(PulseInfo { lengths, sequence })
    }
}

/// Normalize a raw capture record with the default header layout
pub fn prepare_compressed(raw: impl AsRef<[u8]>) -> Result<PulseInfo, PulseError> {
    CompressedFormat::default().parse(raw.as_ref())
}

/// Split on ASCII whitespace, keeping each token's byte offset
fn fields(raw: &[u8]) -> Vec<(usize, &[u8])> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;

    for (i, byte) in raw.iter().enumerate() {
        match (byte.is_ascii_whitespace(), start) {
            (true, Some(s)) => {
                out.push((s, &raw[s..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push((s, &raw[s..]));
    }

    out
}

fn parse_length(field: &[u8]) -> Option<u32> {
    // Digits only; `u32::from_str` would also take a leading '+'
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(field).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "255 2904 1388 771 11346 0 0 0 0100020002020000020002020000020002000202000200020002000200000202000200020000020002000200020002020002000002000200000002000200020002020002000200020034";
    const NORMALIZED: &str = "0300020002020000020002020000020002000202000200020002000200000202000200020000020002000200020002020002000002000200000002000200020002020002000200020014";

    #[test]
    fn test_prepare_compressed() {
        let p = prepare_compressed(RAW).unwrap();
        assert_eq!(p.lengths, vec![255, 771, 1388, 2904, 11346]);
        assert_eq!(p.sequence, NORMALIZED);
        assert_eq!(p.sequence.len(), 148);
    }

    #[test]
    fn test_sorted_header_keeps_sequence() {
        let p = prepare_compressed("100 200 300 0 0 0 0 0 0120210").unwrap();
        assert_eq!(p.lengths, vec![100, 200, 300]);
        assert_eq!(p.sequence, "0120210");
    }

    #[test]
    fn test_zero_slot_between_lengths() {
        // Ordinals count non-zero slots only
        let p = prepare_compressed("900 0 300 0 0 0 0 0 0101").unwrap();
        assert_eq!(p.lengths, vec![300, 900]);
        assert_eq!(p.sequence, "1010");
    }

    #[test]
    fn test_invalid_characters() {
        let raw = "544 4128 2100 100 140 320 808 188 01020202010202020202020202020202020101020102010101010J\u{fffd}G_YJ\u{fffd}\u{dc}xx\u{fffd}1\u{fffd}\u{fffd}Nz\u{fffd}8\u{fffd}\u{fffd}&[\u{fffd}\u{fffd}";
        let err = prepare_compressed(raw).unwrap_err();
        assert!(matches!(
            err,
            PulseError::MalformedCapture(CaptureDefect::InvalidByte { byte: b'J', .. })
        ));
    }

    #[test]
    fn test_non_utf8_bytes() {
        let mut raw = b"544 4128 2100 100 0 0 0 0 0123".to_vec();
        raw.extend_from_slice(&[0xff, 0xfe, b'0']);
        let err = prepare_compressed(&raw).unwrap_err();
        assert_eq!(
            err,
            PulseError::MalformedCapture(CaptureDefect::InvalidByte {
                byte: 0xff,
                offset: 30,
            })
        );
    }

    #[test]
    fn test_header_too_short() {
        let err = prepare_compressed("255 2904 1388").unwrap_err();
        assert_eq!(
            err,
            PulseError::MalformedCapture(CaptureDefect::HeaderTooShort {
                expected: 8,
                found: 3,
            })
        );
    }

    #[test]
    fn test_invalid_header_field() {
        let err = prepare_compressed("255 29x4 1388 0 0 0 0 0 0120").unwrap_err();
        assert!(matches!(
            err,
            PulseError::MalformedCapture(CaptureDefect::InvalidHeaderField { index: 1, .. })
        ));

        let err = prepare_compressed("255 -2904 1388 0 0 0 0 0 0120").unwrap_err();
        assert!(matches!(
            err,
            PulseError::MalformedCapture(CaptureDefect::InvalidHeaderField { index: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_header_lengths_merge() {
        let p = prepare_compressed("300 100 300 0 0 0 0 0 0120").unwrap();
        assert_eq!(p.lengths, vec![100, 300]);
        assert_eq!(p.sequence, "1011");
    }

    #[test]
    fn test_duplicate_lengths_keep_cardinality() {
        // 2116 appears twice in the header; both ordinals mean the same pulse
        let p = prepare_compressed("9112 2116 516 4152 2116 0 0 0 2140231").unwrap();
        assert_eq!(p.lengths, vec![516, 2116, 4152, 9112]);
        assert_eq!(p.sequence, "0113021");
    }

    #[test]
    fn test_signed_header_field() {
        let err = prepare_compressed("+255 2904 0 0 0 0 0 0 0101").unwrap_err();
        assert!(matches!(
            err,
            PulseError::MalformedCapture(CaptureDefect::InvalidHeaderField { index: 0, .. })
        ));
    }

    #[test]
    fn test_missing_sequence() {
        let err = prepare_compressed("255 2904 1388 0 0 0 0 0").unwrap_err();
        assert_eq!(
            err,
            PulseError::MalformedCapture(CaptureDefect::MissingSequence)
        );
    }

    #[test]
    fn test_ordinal_out_of_range() {
        let err = prepare_compressed("255 2904 0 0 0 0 0 0 0102").unwrap_err();
        assert!(matches!(
            err,
            PulseError::MalformedCapture(CaptureDefect::OrdinalOutOfRange {
                ordinal: 2,
                available: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_trailing_data() {
        let err = prepare_compressed("255 2904 0 0 0 0 0 0 0101 0101").unwrap_err();
        assert!(matches!(
            err,
            PulseError::MalformedCapture(CaptureDefect::TrailingData { .. })
        ));
    }

    #[test]
    fn test_custom_header_slots() {
        let format = CompressedFormat::new(4);
        let p = format.parse(b"2904 255 0 0 011\r\n").unwrap();
        assert_eq!(p.lengths, vec![255, 2904]);
        assert_eq!(p.sequence, "100");
    }

    #[test]
    fn test_too_many_lengths() {
        let format = CompressedFormat::new(11);
        let err = format
            .parse(b"1 2 3 4 5 6 7 8 9 10 11 0123")
            .unwrap_err();
        assert_eq!(
            err,
            PulseError::MalformedCapture(CaptureDefect::TooManyLengths { found: 11 })
        );
    }

    #[test]
    fn test_fields_offsets() {
        let f = fields(b"  12 3\t45 ");
        assert_eq!(f, vec![(2, &b"12"[..]), (5, &b"3"[..]), (7, &b"45"[..])]);
    }
}
