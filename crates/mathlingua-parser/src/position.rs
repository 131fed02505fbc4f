//! Byte offset to row/column resolution.
//!
//! [`PositionTracker`] precomputes the row and code-point column of every
//! byte of a document once, so each lookup is a pair of array reads.

use mathlingua_core::span::{Position, Span};

/// Resolves byte offsets of one document to [`Position`]s.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    rows: Vec<u32>,
    columns: Vec<u32>,
}

impl PositionTracker {
    /// Indexes `source`.
    ///
    /// Every byte of a multi-byte code point maps to that code point's
    /// column, and a `\n` ends its row.
    pub fn new(source: &str) -> Self {
        let mut rows = Vec::with_capacity(source.len() + 1);
        let mut columns = Vec::with_capacity(source.len() + 1);
        let (mut row, mut column) = (0u32, 0u32);
        for ch in source.chars() {
            for _ in 0..ch.len_utf8() {
                rows.push(row);
                columns.push(column);
            }
            if ch == '\n' {
                row += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        rows.push(row);
        columns.push(column);
        Self { rows, columns }
    }

    /// Length in bytes of the indexed source.
    pub fn len(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The position of byte `offset`, clamped to the end of the source.
    ///
    /// # Examples
    ///
    /// ```
    /// use mathlingua_parser::position::PositionTracker;
    ///
    /// let tracker = PositionTracker::new("ab\nλx");
    /// let position = tracker.position_of(5);
    /// assert_eq!((position.row, position.column), (1, 1));
    /// ```
    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.len());
        Position::new(
            offset,
            self.rows[offset] as usize,
            self.columns[offset] as usize,
        )
    }

    /// The position where `span` starts.
    pub fn start_of(&self, span: Span) -> Position {
        self.position_of(span.start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_positions() {
        let tracker = PositionTracker::new("Theorem:\nthen:\n");
        assert_eq!(tracker.position_of(0), Position::new(0, 0, 0));
        assert_eq!(tracker.position_of(8), Position::new(8, 0, 8));
        assert_eq!(tracker.position_of(9), Position::new(9, 1, 0));
        assert_eq!(tracker.position_of(13), Position::new(13, 1, 4));
    }

    #[test]
    fn test_multibyte_code_point_is_one_column() {
        // `ℝ` is three bytes.
        let tracker = PositionTracker::new("ℝx");
        assert_eq!(tracker.position_of(0).column, 0);
        assert_eq!(tracker.position_of(2).column, 0);
        assert_eq!(tracker.position_of(3).column, 1);
        assert_eq!(tracker.position_of(4).column, 2);
    }

    #[test]
    fn test_offset_is_clamped_to_end() {
        let tracker = PositionTracker::new("a\nb");
        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.position_of(99), Position::new(3, 1, 1));
        assert!(PositionTracker::new("").is_empty());
    }
}
