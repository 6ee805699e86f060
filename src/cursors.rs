//! Selections of the demo host's buffers.
//!
//! Every selection endpoint is a live position that is updated when the
//! buffer is modified, the same way for inserts and deletes wherever they
//! come from.

use crate::position::{Position, Selection};

/// All selections of one buffer. Never empty.
#[derive(Debug, Clone)]
pub struct CursorSet {
    selections: Vec<Selection>,
    /// Index of the primary selection.
    primary: usize,
}

impl Default for CursorSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorSet {
    /// A single cursor at (0, 0).
    pub fn new() -> Self {
        Self {
            selections: vec![Selection::cursor(Position::zero())],
            primary: 0,
        }
    }

    /// All selections in document order.
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn primary(&self) -> Selection {
        self.selections[self.primary]
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Replace everything with a single selection.
    pub fn set(&mut self, selection: Selection) {
        self.selections = vec![selection];
        self.primary = 0;
    }

    /// Add a selection and make it primary.
    pub fn add(&mut self, selection: Selection) {
        self.selections.push(selection);
        self.primary = self.selections.len() - 1;
        self.normalize();
    }

    /// Drop everything except the primary selection.
    pub fn collapse_to_primary(&mut self) {
        let primary = self.primary();
        self.set(primary);
    }

    /// Replace every selection with `f(selection)`.
    pub fn map(&mut self, mut f: impl FnMut(Selection) -> Selection) {
        for sel in self.selections.iter_mut() {
            *sel = f(*sel);
        }
        self.normalize();
    }

    /// Sort selections and merge those that overlap or touch.
    pub fn normalize(&mut self) {
        let primary_at = self.primary().active;
        let mut sorted = std::mem::take(&mut self.selections);
        sorted.sort_by_key(|sel| (sel.start(), sel.end()));

        let mut merged: Vec<Selection> = Vec::with_capacity(sorted.len());
        for sel in sorted {
            match merged.last_mut() {
                Some(last) if sel.start() <= last.end() => {
                    let start = last.start().min(sel.start());
                    let end = last.end().max(sel.end());
                    *last = if last.is_empty() && sel.is_empty() {
                        Selection::cursor(end)
                    } else {
                        Selection::new(start, end)
                    };
                }
                _ => merged.push(sel),
            }
        }

        self.primary = merged
            .iter()
            .position(|sel| sel.start() <= primary_at && primary_at <= sel.end())
            .unwrap_or(0);
        self.selections = merged;
    }

    /// Sort selections and merge only those that overlap.
    ///
    /// Unlike [`normalize`](Self::normalize), touching or coinciding
    /// selections stay apart, so each one still receives its own text when
    /// the buffer replaces them one by one.
    pub fn sort(&mut self) {
        let mut indexed: Vec<(usize, Selection)> =
            std::mem::take(&mut self.selections).into_iter().enumerate().collect();
        indexed.sort_by_key(|(_, sel)| (sel.start(), sel.end()));

        let mut merged: Vec<Selection> = Vec::with_capacity(indexed.len());
        let mut primary = 0;
        for (index, sel) in indexed {
            match merged.last_mut() {
                Some(last) if sel.start() < last.end() => {
                    *last = Selection::new(last.start().min(sel.start()), last.end().max(sel.end()));
                }
                _ => merged.push(sel),
            }
            if index == self.primary {
                primary = merged.len() - 1;
            }
        }
        self.primary = primary;
        self.selections = merged;
    }

    /// Update all positions after an insertion.
    ///
    /// - `at`: The position where text was inserted
    /// - `lines_added`: Number of complete lines added (from newlines in inserted text)
    /// - `end_column`: The column position after the insertion on the final line
    pub fn update_after_insert(&mut self, at: Position, lines_added: usize, end_column: usize) {
        for sel in self.selections.iter_mut() {
            shift_after_insert(&mut sel.anchor, at, lines_added, end_column);
            shift_after_insert(&mut sel.active, at, lines_added, end_column);
        }
    }

    /// Update all positions after selection `owner` inserted text at `at`.
    ///
    /// Earlier selections ending exactly at `at` stay in front of the new
    /// text instead of being pushed behind it.
    pub fn update_after_insert_by(
        &mut self,
        owner: usize,
        at: Position,
        lines_added: usize,
        end_column: usize,
    ) {
        for (index, sel) in self.selections.iter_mut().enumerate() {
            for pos in [&mut sel.anchor, &mut sel.active] {
                if index < owner && *pos == at {
                    continue;
                }
                shift_after_insert(pos, at, lines_added, end_column);
            }
        }
    }

    /// Update all positions after a deletion.
    ///
    /// - `from`: Start position of deletion (inclusive)
    /// - `to`: End position of deletion (exclusive)
    pub fn update_after_delete(&mut self, from: Position, to: Position) {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        for sel in self.selections.iter_mut() {
            shift_after_delete(&mut sel.anchor, from, to);
            shift_after_delete(&mut sel.active, from, to);
        }
    }
}

fn shift_after_insert(pos: &mut Position, at: Position, lines_added: usize, end_column: usize) {
    // Positions before the insertion point don't move
    if *pos < at {
        return;
    }

    if pos.line == at.line {
        if lines_added > 0 {
            // Text was split, position moves to new line
            pos.line = at.line + lines_added;
            pos.column = pos.column - at.column + end_column;
        } else {
            pos.column += end_column;
        }
        return;
    }

    pos.line += lines_added;
}

fn shift_after_delete(pos: &mut Position, from: Position, to: Position) {
    if *pos <= from {
        return;
    }

    // Positions in the deletion range move to start of deletion
    if *pos < to {
        *pos = from;
        return;
    }

    if pos.line == to.line {
        pos.line = from.line;
        pos.column = from.column + (pos.column - to.column);
    } else {
        pos.line -= to.line - from.line;
    }
}
