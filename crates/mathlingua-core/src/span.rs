//! Source locations.
//!
//! A [`Span`] is a half-open byte range into the document source. A
//! [`Position`] is a single point resolved to a zero-based row and a
//! zero-based column counted in code points.

use std::{fmt, ops::Range};

use serde::Serialize;

/// A half-open byte range `start..end` into the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Creates a span from a byte range.
    ///
    /// # Examples
    ///
    /// ```
    /// use mathlingua_core::span::Span;
    ///
    /// let span = Span::new(3..7);
    /// assert_eq!(span.len(), 4);
    /// ```
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// A zero-length span at `offset`.
    pub fn point(offset: usize) -> Self {
        Self::new(offset..offset)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The smallest span covering both `self` and `other`.
    pub fn union(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Shifts the span right by `offset` bytes.
    ///
    /// Used to turn an offset inside an embedded literal into an absolute
    /// document offset.
    pub fn shifted(self, offset: usize) -> Span {
        Span {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

/// A resolved point in a document.
///
/// `row` is zero-based, `column` is zero-based and counted in Unicode code
/// points from the start of the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Position {
    pub offset: usize,
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, row: usize, column: usize) -> Self {
        Self {
            offset,
            row,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row + 1, self.column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basics() {
        let span = Span::new(10..20);
        assert_eq!(span.start(), 10);
        assert_eq!(span.end(), 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(Span::point(4).is_empty());
    }

    #[test]
    fn test_span_inverted_range_is_clamped() {
        #[allow(clippy::reversed_empty_ranges)]
        let span = Span::new(8..3);
        assert_eq!(span.start(), 8);
        assert!(span.is_empty());
    }

    #[test]
    fn test_span_union_and_shift() {
        let merged = Span::new(5..8).union(Span::new(2..6));
        assert_eq!(merged.range(), 2..8);
        assert_eq!(Span::new(1..3).shifted(10).range(), 11..13);
    }

    #[test]
    fn test_position_display_is_one_based() {
        assert_eq!(Position::new(12, 2, 4).to_string(), "(3, 5)");
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn span_strategy() -> impl Strategy<Value = Span> {
        (0usize..1000, 0usize..200).prop_map(|(start, len)| Span::new(start..start + len))
    }

    // ===================
    // Checks
    // ===================

    fn check_union_covers_both(a: Span, b: Span) -> Result<(), TestCaseError> {
        let merged = a.union(b);
        prop_assert!(merged.start() <= a.start() && merged.start() <= b.start());
        prop_assert!(merged.end() >= a.end() && merged.end() >= b.end());
        prop_assert_eq!(merged, b.union(a));
        Ok(())
    }

    fn check_shift_preserves_len(span: Span, offset: usize) -> Result<(), TestCaseError> {
        let shifted = span.shifted(offset);
        prop_assert_eq!(shifted.len(), span.len());
        prop_assert_eq!(shifted.start(), span.start() + offset);
        Ok(())
    }

    proptest! {
        #[test]
        fn union_covers_both(a in span_strategy(), b in span_strategy()) {
            check_union_covers_both(a, b)?;
        }

        #[test]
        fn shift_preserves_len(span in span_strategy(), offset in 0usize..10_000) {
            check_shift_preserves_len(span, offset)?;
        }
    }
}
