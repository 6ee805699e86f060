//! A Rope-backed text buffer with multiple selections.
//!
//! This is the demo host's editor. It implements [`TextEditor`] so the
//! overtype add-on can drive it, and it provides the native `type` and
//! `paste` behaviour the add-on delegates to.

use std::cmp::Reverse;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;
use ropey::Rope;

use crate::config::CursorStyle;
use crate::cursors::CursorSet;
use crate::edit_op::EditOp;
use crate::error::HostError;
use crate::host::TextEditor;
use crate::mode_store::EditorId;
use crate::position::{Position, Selection, insert_effect, line_length_excluding_newline};
use crate::replace::LineSource;

/// An editable buffer.
#[derive(Debug)]
pub struct Buffer {
    id: EditorId,
    name: String,
    path: Option<PathBuf>,
    /// The underlying rope data structure.
    rope: Rope,
    cursors: CursorSet,
    cursor_style: CursorStyle,
    read_only: bool,
    modified: bool,
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

// Constructors
impl Buffer {
    /// Create a new empty buffer.
    pub fn new(id: EditorId, name: &str) -> Self {
        Self::from_str(id, name, "")
    }

    pub fn from_str(id: EditorId, name: &str, text: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            path: None,
            rope: Rope::from_str(text),
            cursors: CursorSet::new(),
            cursor_style: CursorStyle::default(),
            read_only: false,
            modified: false,
        }
    }

    /// Load a buffer from `path`. A missing file gives an empty buffer.
    pub fn open(id: EditorId, path: &Path) -> Result<Self> {
        let text = if path.exists() {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?
        } else {
            String::new()
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let mut buffer = Self::from_str(id, &name, &text);
        buffer.path = Some(path.to_path_buf());
        Ok(buffer)
    }
}

// Accessors
impl Buffer {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn modified(&self) -> bool {
        self.modified
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn cursors(&self) -> &CursorSet {
        &self.cursors
    }

    /// Number of lines, counting an empty last line after a final newline.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Content of `line` without its line break.
    pub fn line_content(&self, line: usize) -> String {
        if line >= self.rope.len_lines() {
            return String::new();
        }
        self.rope
            .line(line)
            .chars()
            .take(line_length_excluding_newline(&self.rope, line))
            .collect()
    }

    /// Put a single cursor at `pos`, clamped to the text.
    pub fn set_cursor(&mut self, pos: Position) {
        self.cursors
            .set(Selection::cursor(pos.clamp_to_text(&self.rope)));
    }

    /// Select from `anchor` to `active`, both clamped to the text.
    pub fn set_selection(&mut self, anchor: Position, active: Position) {
        self.cursors.set(Selection::new(
            anchor.clamp_to_text(&self.rope),
            active.clamp_to_text(&self.rope),
        ));
    }

    /// Write the buffer to its path. Returns the number of lines written.
    pub fn save(&mut self) -> Result<usize> {
        let Some(path) = &self.path else {
            anyhow::bail!("No file path specified.");
        };
        let mut contents = self.rope.to_string();
        if !contents.is_empty() && !contents.ends_with('\n') {
            contents.push('\n');
        }
        std::fs::write(path, &contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        self.modified = false;
        Ok(contents.lines().count())
    }
}

// Native commands
impl Buffer {
    /// The host's own `type`: replace every selection with `text`.
    pub fn type_text(&mut self, text: &str) -> Result<(), HostError> {
        self.check_writable()?;
        self.cursors.sort();
        let selections: Vec<Selection> = self.cursors.selections().to_vec();
        for (index, sel) in selections.iter().enumerate().rev() {
            self.delete(sel.start(), sel.end());
            self.insert_by(index, sel.start(), text);
        }
        self.modified = true;
        Ok(())
    }

    /// The host's own `paste`.
    ///
    /// A whole-line paste goes above the line of each empty selection,
    /// leaving the cursor where it was in the text. Anything else is typed.
    pub fn paste_text(&mut self, text: &str, paste_on_new_line: bool) -> Result<(), HostError> {
        if !paste_on_new_line {
            return self.type_text(text);
        }
        self.check_writable()?;
        self.cursors.sort();
        let selections: Vec<Selection> = self.cursors.selections().to_vec();
        for sel in selections.iter().rev() {
            if sel.is_empty() {
                self.insert_at(Position::new(sel.active.line, 0), text);
            } else {
                self.delete(sel.start(), sel.end());
                self.insert_at(sel.start(), text);
            }
        }
        self.modified = true;
        Ok(())
    }

    /// Delete the selections, or the char before each cursor.
    pub fn backspace(&mut self) -> Result<(), HostError> {
        self.delete_each(|rope, pos| {
            if pos.column > 0 {
                Position::new(pos.line, pos.column - 1)
            } else if pos.line > 0 {
                Position::new(pos.line - 1, line_length_excluding_newline(rope, pos.line - 1))
            } else {
                pos
            }
        })
    }

    /// Delete the selections, or the char after each cursor.
    pub fn delete_forward(&mut self) -> Result<(), HostError> {
        self.delete_each(|rope, pos| {
            if pos.column < line_length_excluding_newline(rope, pos.line) {
                Position::new(pos.line, pos.column + 1)
            } else if pos.line + 1 < rope.len_lines() {
                Position::new(pos.line + 1, 0)
            } else {
                pos
            }
        })
    }

    fn delete_each(&mut self, other_end: impl Fn(&Rope, Position) -> Position) -> Result<(), HostError> {
        self.check_writable()?;
        self.cursors.normalize();
        let selections: Vec<Selection> = self.cursors.selections().to_vec();
        for sel in selections.iter().rev() {
            let (from, to) = if sel.is_empty() {
                let end = other_end(&self.rope, sel.active);
                (sel.active.min(end), sel.active.max(end))
            } else {
                (sel.start(), sel.end())
            };
            if self.delete(from, to) {
                self.modified = true;
            }
        }
        self.cursors.normalize();
        Ok(())
    }

    /// Text to put on the clipboard, and whether it is a whole line.
    ///
    /// With only empty selections, copies the primary cursor's line
    /// including its line break.
    pub fn copy(&self) -> (String, bool) {
        let selections = self.cursors.selections();
        if selections.iter().all(Selection::is_empty) {
            let line = self.cursors.primary().active.line;
            let mut text = self.line_content(line);
            text.push('\n');
            return (text, true);
        }
        let text = selections
            .iter()
            .filter(|sel| !sel.is_empty())
            .map(|sel| {
                let from = sel.start().to_char_index(&self.rope);
                let to = sel.end().to_char_index(&self.rope);
                self.rope.slice(from..to).to_string()
            })
            .join("\n");
        (text, false)
    }
}

/// Cursor movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
}

// Movement
impl Buffer {
    /// Move every cursor. With `extend`, the anchors stay put.
    pub fn move_cursors(&mut self, motion: Motion, extend: bool) {
        let rope = &self.rope;
        self.cursors.map(|sel| {
            let to = step(rope, sel.active, motion);
            if extend {
                Selection::new(sel.anchor, to)
            } else {
                Selection::cursor(to)
            }
        });
    }

    /// Add a cursor at `pos`, clamped to the text, and make it primary.
    pub fn add_cursor(&mut self, pos: Position) {
        self.cursors
            .add(Selection::cursor(pos.clamp_to_text(&self.rope)));
    }

    /// Add a cursor one line below the primary one.
    pub fn add_cursor_below(&mut self) {
        let active = self.cursors.primary().active;
        if active.line + 1 < self.rope.len_lines() {
            self.add_cursor(Position::new(active.line + 1, active.column));
        }
    }

    pub fn collapse_cursors(&mut self) {
        self.cursors.collapse_to_primary();
        let active = self.cursors.primary().active;
        self.cursors.set(Selection::cursor(active));
    }
}

fn step(rope: &Rope, pos: Position, motion: Motion) -> Position {
    let line_len = line_length_excluding_newline(rope, pos.line);
    match motion {
        Motion::Left if pos.column > 0 => Position::new(pos.line, pos.column - 1),
        Motion::Left if pos.line > 0 => {
            Position::new(pos.line - 1, line_length_excluding_newline(rope, pos.line - 1))
        }
        Motion::Right if pos.column < line_len => Position::new(pos.line, pos.column + 1),
        Motion::Right if pos.line + 1 < rope.len_lines() => Position::new(pos.line + 1, 0),
        Motion::Up if pos.line > 0 => Position::new(pos.line - 1, pos.column).clamp_to_text(rope),
        Motion::Down if pos.line + 1 < rope.len_lines() => {
            Position::new(pos.line + 1, pos.column).clamp_to_text(rope)
        }
        Motion::LineStart => Position::new(pos.line, 0),
        Motion::LineEnd => Position::new(pos.line, line_len),
        _ => pos,
    }
}

// Primitive edits
impl Buffer {
    fn check_writable(&self) -> Result<(), HostError> {
        if self.read_only {
            Err(HostError::ReadOnly)
        } else {
            Ok(())
        }
    }

    /// Delete text from `from` to `to` (exclusive).
    ///
    /// Positions are clamped to actual text.
    /// Updates all selections appropriately.
    fn delete(&mut self, from: Position, to: Position) -> bool {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        let from = from.clamp_to_text(&self.rope);
        let to = to.clamp_to_text(&self.rope);
        if from == to {
            return false;
        }

        let from_idx = from.to_char_index(&self.rope);
        let to_idx = to.to_char_index(&self.rope);
        self.rope.remove(from_idx..to_idx);

        self.cursors.update_after_delete(from, to);
        true
    }

    /// Insert text at a specific position.
    ///
    /// Updates all selections appropriately.
    fn insert_at(&mut self, pos: Position, text: &str) {
        if text.is_empty() {
            return;
        }
        let pos = pos.clamp_to_text(&self.rope);
        let char_idx = pos.to_char_index(&self.rope);
        self.rope.insert(char_idx, text);

        let (lines_added, end_column) = insert_effect(text);
        self.cursors.update_after_insert(pos, lines_added, end_column);
    }

    /// Insert the text typed by selection `owner`.
    ///
    /// Selections before `owner` that end at `pos` stay in front of the text.
    fn insert_by(&mut self, owner: usize, pos: Position, text: &str) {
        if text.is_empty() {
            return;
        }
        let pos = pos.clamp_to_text(&self.rope);
        let char_idx = pos.to_char_index(&self.rope);
        self.rope.insert(char_idx, text);

        let (lines_added, end_column) = insert_effect(text);
        self.cursors
            .update_after_insert_by(owner, pos, lines_added, end_column);
    }
}

impl LineSource for Buffer {
    fn line_len(&self, line: usize) -> usize {
        line_length_excluding_newline(&self.rope, line)
    }
}

impl TextEditor for Buffer {
    fn id(&self) -> EditorId {
        self.id
    }

    fn selections(&self) -> Vec<Selection> {
        self.cursors.selections().to_vec()
    }

    fn cursor_style(&self) -> CursorStyle {
        self.cursor_style
    }

    fn set_cursor_style(&mut self, style: CursorStyle) {
        self.cursor_style = style;
    }

    fn apply_edits(&mut self, edits: &[EditOp]) -> Result<(), HostError> {
        self.check_writable()?;
        for op in edits {
            for pos in [op.start(), op.end(), op.insert_pos] {
                if !pos.is_within(&self.rope) {
                    return Err(HostError::InvalidPosition(pos));
                }
            }
        }
        let ordered: Vec<&EditOp> = edits.iter().sorted_by_key(|op| op.start()).collect();
        if ordered
            .iter()
            .tuple_windows()
            .any(|(a, b)| a.end() > b.start())
        {
            return Err(HostError::OverlappingEdits);
        }

        for op in ordered.into_iter().sorted_by_key(|op| Reverse(op.start())) {
            if let Some(range) = op.delete {
                self.delete(range.start, range.end);
            }
            self.insert_at(op.insert_pos, &op.insert_text);
        }
        if !edits.is_empty() {
            self.modified = true;
        }
        Ok(())
    }
}
