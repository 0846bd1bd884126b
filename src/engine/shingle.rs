//! Shingle creation for MinHash signature generation.
//!
//! A shingle is a fixed-length window of characters taken from a sliding
//! position over a document's text. The shingle set of a document feeds the
//! MinHash signature generator; similarity is only meaningful between
//! documents shingled with the same window size.

use std::collections::BTreeSet;

/// Shingle generator producing fixed-length character windows.
#[derive(Debug, Clone)]
pub struct ShingleGenerator {
    /// Window size (number of characters per shingle)
    window_size: usize,
}

impl ShingleGenerator {
    /// Create a new shingle generator with the given window size.
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    /// Returns the configured window size.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Create the shingle set for a document.
    ///
    /// Windows start at character offsets `0..len - window_size` (exclusive
    /// upper bound, so the final possible window is omitted); texts of
    /// `window_size` characters or fewer yield the empty set. Characters are
    /// Unicode scalar values. No case or whitespace normalization is applied:
    /// similarity is sensitive to exact surface text.
    pub fn shingle(&self, text: &str) -> BTreeSet<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut shingles = BTreeSet::new();

        if chars.len() <= self.window_size {
            return shingles;
        }

        for i in 0..chars.len() - self.window_size {
            shingles.insert(chars[i..i + self.window_size].iter().collect());
        }

        shingles
    }
}
