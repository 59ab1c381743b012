//! Pulse code to bit translation

use std::num::NonZeroUsize;

use crate::protocol::CodeTable;

use super::error::PulseError;

/// Fixed-width code symbols of a compact pulse sequence.
///
/// The compact sequence holds one ordinal character per pulse event. A
/// protocol reads it in fixed-width codes (usually a mark/space pair, width
/// 2). The last symbol is shorter than `width` when the sequence length is
/// not a multiple of it.
pub fn code_symbols(sequence: &str, width: NonZeroUsize) -> CodeSymbols<'_> {
    CodeSymbols {
        rest: sequence,
        width: width.get(),
    }
}

/// Iterator returned by [`code_symbols`]
#[derive(Debug, Clone)]
pub struct CodeSymbols<'a> {
    rest: &'a str,
    width: usize,
}

impl<'a> Iterator for CodeSymbols<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let end = self
            .rest
            .char_indices()
            .nth(self.width)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (symbol, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(symbol)
    }
}

/// Translate a pulse sequence into bits using `table`.
///
/// Every symbol must be present in the table, footer symbols included; a
/// footer maps to an empty fragment and adds nothing to the output.
pub fn map_pulses(sequence: &str, table: &CodeTable) -> Result<String, PulseError> {
    let mut bits = String::with_capacity(sequence.len() / table.width().get() + 1);

    for (position, symbol) in code_symbols(sequence, table.width()).enumerate() {
        let fragment = table.get(symbol).ok_or_else(|| PulseError::UnknownCode {
            code: symbol.to_string(),
            position,
        })?;
        bits.push_str(fragment);
    }

    Ok(bits)
}
