//! Position types shared by the engine and the hosts.
//!
//! We use line/column positions rather than char offsets because every
//! overtype decision is made against a single line: how many characters are
//! left between the cursor and the line break.

use ropey::Rope;

/// A position in a document, represented as line and column.
///
/// Both `line` and `column` are 0-indexed. Columns count chars on the line,
/// excluding the line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Create a position at the start of the document.
    pub fn zero() -> Self {
        Self { line: 0, column: 0 }
    }

    /// The position `count` chars to the right on the same line.
    pub fn shifted(&self, count: usize) -> Position {
        Position::new(self.line, self.column + count)
    }

    /// Calculate the position after inserting the given text at this position.
    pub fn after_text(&self, text: &str) -> Position {
        let (lines_added, end_column) = insert_effect(text);
        if lines_added == 0 {
            Position::new(self.line, self.column + end_column)
        } else {
            Position::new(self.line + lines_added, end_column)
        }
    }

    /// Clamp this position to real text in `rope`.
    pub fn clamp_to_text(&self, rope: &Rope) -> Position {
        let last_line = rope.len_lines().saturating_sub(1);
        let line = self.line.min(last_line);
        let column = self.column.min(line_length_excluding_newline(rope, line));
        Position::new(line, column)
    }

    /// Convert to a char index in `rope`. The position must be within the text.
    pub fn to_char_index(&self, rope: &Rope) -> usize {
        rope.line_to_char(self.line) + self.column
    }

    /// Whether this position addresses real text in `rope`.
    pub fn is_within(&self, rope: &Rope) -> bool {
        self.line < rope.len_lines()
            && self.column <= line_length_excluding_newline(rope, self.line)
    }
}

/// A half-open span of text between two positions, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range, ordering the endpoints.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A selection as reported by the host: an anchor and an active end.
///
/// A collapsed selection (`anchor == active`) is a plain cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// A collapsed selection at `pos`.
    pub fn cursor(pos: Position) -> Self {
        Self {
            anchor: pos,
            active: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }

    pub fn range(&self) -> Range {
        Range::new(self.anchor, self.active)
    }
}

/// Length of `line` in chars, not counting its line break.
///
/// Lines past the end of the rope have length zero.
pub fn line_length_excluding_newline(rope: &Rope, line: usize) -> usize {
    if line >= rope.len_lines() {
        return 0;
    }
    let slice = rope.line(line);
    let mut len = slice.len_chars();
    if len > 0 && slice.char(len - 1) == '\n' {
        len -= 1;
    }
    if len > 0 && slice.char(len - 1) == '\r' {
        len -= 1;
    }
    len
}

/// Number of chars on the first line of `text`, not counting the line break.
pub fn first_line_chars(text: &str) -> usize {
    line_length_excluding_newline(&Rope::from_str(text), 0)
}

/// Calculate the effect of inserting text: (lines_added, end_column)
///
/// Uses Rope to handle multi-line text correctly.
pub fn insert_effect(text: &str) -> (usize, usize) {
    if text.is_empty() {
        return (0, 0);
    }
    let r = Rope::from_str(text);
    let lines = r.len_lines();
    (lines - 1, line_length_excluding_newline(&r, lines - 1))
}
