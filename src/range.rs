//! Source ranges and editor selections.
//!
//! Positions use LSP coordinates: zero-based lines and UTF-16 code unit
//! columns. Ranges are half-open spans, but containment compares bounds
//! inclusively so a range always contains itself.

use tower_lsp_server::ls_types::{Position, Range};

/// Compare two positions in document order.
fn cmp_position(a: Position, b: Position) -> std::cmp::Ordering {
    (a.line, a.character).cmp(&(b.line, b.character))
}

/// An immutable span over a document.
///
/// The default value is the blank range `(0,0)-(0,0)` used as the initial
/// cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceRange {
    pub start: Position,
    pub end: Position,
}

impl SourceRange {
    /// Create a range from `(start_line, start_column, end_line, end_column)`.
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start: Position::new(start_line, start_column),
            end: Position::new(end_line, end_column),
        }
    }

    /// Create a range from two positions, ordering them so `start <= end`.
    pub fn from_positions(a: Position, b: Position) -> Self {
        if cmp_position(a, b).is_gt() {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    /// True iff `other` lies entirely within `self`, bounds inclusive.
    pub fn contains(&self, other: &SourceRange) -> bool {
        self.contains_position(other.start) && self.contains_position(other.end)
    }

    /// True iff `position` lies within `[start, end]`.
    pub fn contains_position(&self, position: Position) -> bool {
        cmp_position(self.start, position).is_le() && cmp_position(position, self.end).is_le()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

impl From<Range> for SourceRange {
    fn from(range: Range) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

impl From<SourceRange> for Range {
    fn from(range: SourceRange) -> Self {
        Range {
            start: range.start,
            end: range.end,
        }
    }
}

impl std::fmt::Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{},{}]-[{},{}]",
            self.start.line, self.start.character, self.end.line, self.end.character
        )
    }
}

/// A user selection: a range plus the orientation it was made in.
///
/// `anchor` is where the selection started and `active` is the caret. The
/// fields are public because hosts hand selections over as-is; nothing
/// guarantees `range` agrees with `anchor`/`active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub range: SourceRange,
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    /// Build a consistent selection from its anchor and caret.
    pub fn new(anchor: Position, active: Position) -> Self {
        Self {
            range: SourceRange::from_positions(anchor, active),
            anchor,
            active,
        }
    }

    pub fn start(&self) -> Position {
        self.range.start
    }

    pub fn end(&self) -> Position {
        self.range.end
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn is_single_line(&self) -> bool {
        self.range.is_single_line()
    }

    /// Number of lines the selection touches.
    pub fn line_count(&self) -> u32 {
        self.range.end.line.saturating_sub(self.range.start.line) + 1
    }

    pub fn contains_position(&self, position: Position) -> bool {
        self.range.contains_position(position)
    }

    /// True iff the caret lies outside the selection's own bounds.
    ///
    /// Only possible for selections assembled field by field.
    pub fn active_out_of_bounds(&self) -> bool {
        cmp_position(self.active, self.start()).is_lt()
            || cmp_position(self.active, self.end()).is_gt()
    }
}

impl From<SourceRange> for Selection {
    fn from(range: SourceRange) -> Self {
        Self::new(range.start, range.end)
    }
}
