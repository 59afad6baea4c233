//! Span tracking for source locations.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A position in the source text.
///
/// Offsets count characters, not bytes, so that columns stay correct with
/// multi-byte input. Two points are equal when their offsets are equal.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    /// Character offset from the start of the input (0-based).
    pub offset: usize,
    /// Line number (1-based).
    pub line: usize,
    /// Column number in characters (1-based).
    pub column: usize,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The point of the first character of the input.
    #[inline]
    pub fn origin() -> Self {
        Self::new(0, 1, 1)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::origin()
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.offset.hash(state);
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset.cmp(&other.offset)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A range in the source text, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// First character of the range.
    pub start: Point,
    /// Last character of the range.
    pub end: Point,
}

impl Span {
    /// Create a new span from its first and last points.
    #[inline]
    pub fn new(start: Point, end: Point) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Create a span covering a single point.
    #[inline]
    pub fn point(point: Point) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    /// Number of characters covered by this span.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset + 1
    }

    /// Whether this span covers a single point.
    #[inline]
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// The point covered by this span if it is a single point.
    #[inline]
    pub fn as_point(&self) -> Option<Point> {
        self.is_point().then_some(self.start)
    }

    /// The smallest span covering both spans.
    #[inline]
    pub fn union(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Half-open character range, as expected by report renderers.
    #[inline]
    pub fn char_range(&self) -> std::ops::Range<usize> {
        self.start.offset..self.end.offset + 1
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_point() {
            Some(point) => write!(f, "{point}"),
            None => write!(f, "{}-{}", self.start, self.end),
        }
    }
}

impl From<Point> for Span {
    fn from(point: Point) -> Self {
        Span::point(point)
    }
}
