//! Pulse code tables

use std::collections::HashMap;
use std::num::NonZeroUsize;

use super::CatalogError;

/// Immutable mapping from fixed-width pulse codes to output fragments.
///
/// A code mapped to an empty fragment is a footer: it has to appear in the
/// table, but contributes nothing to the decoded bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    width: NonZeroUsize,
    codes: HashMap<String, String>,
}

impl CodeTable {
    /// Build a table whose codes are all exactly `width` characters long
    pub fn new<K, V>(
        width: usize,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, CatalogError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let width = NonZeroUsize::new(width).ok_or(CatalogError::ZeroCodeWidth)?;
        let mut codes = HashMap::new();

        for (code, fragment) in entries {
            let code = code.into();
            if code.chars().count() != width.get() {
                return Err(CatalogError::CodeWidthMismatch {
                    code,
                    width: width.get(),
                });
            }
            if codes.contains_key(&code) {
                return Err(CatalogError::DuplicateCode(code));
            }
            codes.insert(code, fragment.into());
        }

        if codes.is_empty() {
            return Err(CatalogError::EmptyCodeTable);
        }

        Ok(Self { width, codes })
    }

    /// Table for compiled-in protocols, whose codes are known to be valid
    pub(crate) fn from_static(width: usize, entries: &[(&str, &str)]) -> Self {
        Self {
            width: NonZeroUsize::new(width).unwrap_or(NonZeroUsize::MIN),
            codes: entries
                .iter()
                .map(|&(c, f)| (c.to_string(), f.to_string()))
                .collect(),
        }
    }

    /// Width of every code in characters
    pub fn width(&self) -> NonZeroUsize {
        self.width
    }

    /// Fragment for `code`, if the code is known
    pub fn get(&self, code: &str) -> Option<&str> {
        self.codes.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes that mark the end of a frame
    pub fn footers(&self) -> impl Iterator<Item = &str> {
        self.codes
            .iter()
            .filter(|(_, fragment)| fragment.is_empty())
            .map(|(code, _)| code.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.codes.iter().map(|(c, f)| (c.as_str(), f.as_str()))
    }
}
