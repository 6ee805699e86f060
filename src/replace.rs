//! The overtype replacement engine.
//!
//! Turns a pending type or paste command plus the editor's selections into
//! [`EditOp`]s that overwrite existing characters instead of pushing them to
//! the right. Overwriting is bounded by the end of the cursor's line: a line
//! break is never consumed, so lines are never merged.
//!
//! The engine only describes edits. Applying them is up to the host.

use ropey::Rope;

use crate::edit_op::{EditKind, EditOp};
use crate::position::{Position, Range, Selection, first_line_chars, line_length_excluding_newline};

/// Read access to line lengths, which is all the engine needs of a document.
pub trait LineSource {
    /// Length of `line` in chars, excluding its line break. Zero past the end.
    fn line_len(&self, line: usize) -> usize;
}

impl LineSource for Rope {
    fn line_len(&self, line: usize) -> usize {
        line_length_excluding_newline(self, line)
    }
}

/// Edits realising overtype for typed `text`, one per selection.
///
/// A cursor never overwrites past the next selection on its line, so the
/// edits of one batch never overlap and each selection keeps its own text.
pub fn overtype_before_type<D: LineSource + ?Sized>(
    doc: &D,
    selections: &[Selection],
    text: &str,
) -> Vec<EditOp> {
    selections
        .iter()
        .enumerate()
        .map(|(index, sel)| edit_for_selection(doc, selections, index, sel, text))
        .collect()
}

/// Edits realising overtype for pasted `text`, one per selection.
///
/// Only the first pasted line overwrites, bounded by the end of the cursor's
/// line. Later pasted lines are inserted by the host as new lines. A
/// single-line paste is therefore identical to typing the same text.
///
/// With `paste_on_new_line` the host inserts a whole line above each cursor,
/// so a cursor overwrites nothing; selections are still replaced.
pub fn overtype_before_paste<D: LineSource + ?Sized>(
    doc: &D,
    selections: &[Selection],
    text: &str,
    paste_on_new_line: bool,
) -> Vec<EditOp> {
    if !paste_on_new_line {
        return overtype_before_type(doc, selections, text);
    }
    selections
        .iter()
        .map(|sel| {
            if sel.is_empty() {
                let line_start = Position::new(sel.active.line, 0);
                EditOp::replace(Range::new(line_start, line_start), text, EditKind::Overwrite)
            } else {
                EditOp::replace(sel.range(), text, EditKind::ReplaceSelection)
            }
        })
        .collect()
}

fn edit_for_selection<D: LineSource + ?Sized>(
    doc: &D,
    selections: &[Selection],
    index: usize,
    sel: &Selection,
    text: &str,
) -> EditOp {
    if !sel.is_empty() {
        return EditOp::replace(sel.range(), text, EditKind::ReplaceSelection);
    }
    let at = sel.active;
    let count = overwrite_count(doc, at, first_line_chars(text));
    let count = room_before_next(selections, index).map_or(count, |room| count.min(room));
    EditOp::replace(Range::new(at, at.shifted(count)), text, EditKind::Overwrite)
}

/// Chars between cursor `index` and the nearest other selection starting
/// after it on the same line.
///
/// Of two cursors at the same position the earlier one gets the room, the
/// later one gets none.
fn room_before_next(selections: &[Selection], index: usize) -> Option<usize> {
    let at = selections[index].active;
    selections
        .iter()
        .enumerate()
        .filter(|&(other, _)| other != index)
        .map(|(other, sel)| (other, sel.start()))
        .filter(|&(other, start)| {
            start.line == at.line && (start > at || (start == at && other < index))
        })
        .map(|(_, start)| start.column - at.column)
        .min()
}

/// How many existing chars at `at` can be overwritten by `wanted` chars.
pub fn overwrite_count<D: LineSource + ?Sized>(doc: &D, at: Position, wanted: usize) -> usize {
    doc.line_len(at.line).saturating_sub(at.column).min(wanted)
}

#[cfg(test)]
mod tests;
