//! Edit descriptions handed to the host.

use crate::position::{Position, Range};

/// Why an edit was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Collapsed cursor: existing characters are overwritten in place.
    Overwrite,
    /// Non-empty selection: the selection is replaced, exactly as in insert mode.
    ReplaceSelection,
}

/// A single delete-range-and-insert-text instruction targeting a document.
///
/// Positions refer to the document as it was before any edit of the same
/// batch was applied. When `delete` is set, `insert_pos` is its start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOp {
    pub delete: Option<Range>,
    pub insert_text: String,
    pub insert_pos: Position,
    pub kind: EditKind,
}

impl EditOp {
    /// Delete `range` (if non-empty) and insert `text` at its start.
    pub fn replace(range: Range, text: &str, kind: EditKind) -> Self {
        Self {
            delete: (!range.is_empty()).then_some(range),
            insert_text: text.to_string(),
            insert_pos: range.start,
            kind,
        }
    }

    /// Delete `range` without inserting anything.
    pub fn delete(range: Range, kind: EditKind) -> Self {
        Self::replace(range, "", kind)
    }

    /// The deletion half of this edit, if it deletes anything.
    ///
    /// This is what the command adapter applies before handing the insertion
    /// to the host's native command.
    pub fn deletion(&self) -> Option<EditOp> {
        self.delete.map(|range| EditOp::delete(range, self.kind))
    }

    /// Number of chars this edit deletes, when it stays on one line.
    pub fn deleted_columns(&self) -> usize {
        match self.delete {
            Some(range) if range.start.line == range.end.line => {
                range.end.column - range.start.column
            }
            _ => 0,
        }
    }

    /// Position where the edit's effect begins.
    pub fn start(&self) -> Position {
        self.delete.map_or(self.insert_pos, |range| range.start)
    }

    /// Position where the edit's deleted region ends.
    pub fn end(&self) -> Position {
        self.delete.map_or(self.insert_pos, |range| range.end)
    }
}
