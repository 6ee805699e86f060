//! Screen rendering for the demo host.
//!
//! The screen is split into the text area, a status row and a message row:
//!
//! ```text
//! +--------------------------------+
//! | text of the focused buffer     |
//! | ...                            |
//! | name [+]  Ln 3, Col 7      OVR |  <- status row (reverse video)
//! | message                        |  <- message row
//! +--------------------------------+
//! ```
//!
//! Each row is rendered into a string and compared against what was last
//! written; only rows that differ are sent to the terminal.

use crate::buffer::Buffer;
use crate::config::CursorStyle;
use crate::host::TextEditor;
use crate::terminal::{TermSize, Terminal};
use crate::workspace::{StatusSlot, Workspace};

/// Marker text for end of file.
const EOF_MARKER: &str = "<End of File>";

/// Rows below the text area: status and message.
const CHROME_ROWS: usize = 2;

/// Tab stops every this many columns.
const TAB_WIDTH: usize = 8;

/// Manages screen rendering.
pub struct Screen {
    width: usize,
    height: usize,
    /// First buffer line shown.
    pub top_line: usize,
    /// First column shown.
    pub offset: usize,
    /// What each row showed when last written. `None` forces a rewrite.
    drawn: Vec<Option<String>>,
    message: Option<String>,
    cursor_style: Option<CursorStyle>,
}

impl Screen {
    pub fn new(term_size: TermSize) -> Self {
        let width = term_size.width as usize;
        let height = term_size.height as usize;
        Self {
            width,
            height,
            top_line: 0,
            offset: 0,
            drawn: vec![None; height],
            message: None,
            cursor_style: None,
        }
    }

    /// Resize the screen (e.g. on terminal resize).
    pub fn resize(&mut self, term_size: TermSize) {
        self.width = term_size.width as usize;
        self.height = term_size.height as usize;
        self.drawn = vec![None; self.height];
    }

    /// Number of usable text rows.
    pub fn text_height(&self) -> usize {
        self.height.saturating_sub(CHROME_ROWS)
    }

    pub fn show_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Bring the focused buffer's primary cursor into view and redraw.
    pub fn render(&mut self, workspace: &Workspace, terminal: &mut dyn Terminal) {
        if let Some(buffer) = workspace.focused() {
            self.scroll_to_cursor(buffer);
        }

        let text_height = self.text_height();
        for row in 0..text_height {
            let content = match workspace.focused() {
                Some(buffer) => self.build_line_content(buffer, self.top_line + row),
                None => String::new(),
            };
            self.write_row(terminal, row, content, false);
        }
        if self.height >= CHROME_ROWS {
            let status = self.build_status_line(workspace.focused(), &workspace.status());
            self.write_row(terminal, text_height, status, true);
            let message = self.message.clone().unwrap_or_default();
            self.write_row(terminal, text_height + 1, message, false);
        }

        self.position_cursor(workspace.focused(), terminal);
        terminal.flush();
    }

    /// Adjust `top_line` and `offset` so the primary cursor is visible.
    fn scroll_to_cursor(&mut self, buffer: &Buffer) {
        let cursor = buffer.cursors().primary().active;
        let text_height = self.text_height().max(1);
        if cursor.line < self.top_line {
            self.top_line = cursor.line;
        } else if cursor.line >= self.top_line + text_height {
            self.top_line = cursor.line + 1 - text_height;
        }

        let width = self.width.max(1);
        if cursor.column < self.offset {
            self.offset = cursor.column;
        } else if cursor.column >= self.offset + width {
            self.offset = cursor.column + 1 - width;
        }
    }

    fn write_row(&mut self, terminal: &mut dyn Terminal, row: usize, content: String, reverse: bool) {
        if self.drawn.get(row).is_some_and(|drawn| drawn.as_ref() == Some(&content)) {
            return;
        }
        terminal.move_cursor(0, row as u16);
        if reverse {
            terminal.set_reverse(true);
        }
        terminal.write_str(&content);
        if reverse {
            terminal.set_reverse(false);
        }
        terminal.clear_eol();
        if let Some(drawn) = self.drawn.get_mut(row) {
            *drawn = Some(content);
        }
    }

    /// Build the visible portion of a buffer line as a string.
    fn build_line_content(&self, buffer: &Buffer, line: usize) -> String {
        let line_count = buffer.line_count();
        let width = self.width;
        let offset = self.offset;

        if line >= line_count {
            // Past end of file, show EOF marker on the first line past end, blank after
            if line == line_count && offset < EOF_MARKER.len() {
                return EOF_MARKER[offset..].chars().take(width).collect();
            }
            return String::new();
        }

        let mut result = String::with_capacity(width);
        let mut col = 0;
        for ch in buffer.line_content(line).chars() {
            let cells: Vec<char> = if ch == '\t' {
                vec![' '; TAB_WIDTH - col % TAB_WIDTH]
            } else if ch.is_control() {
                // Show control chars as ^X
                vec!['^', char::from((ch as u8 & 0x1f) + b'@')]
            } else {
                vec![ch]
            };
            for cell in cells {
                if col >= offset {
                    result.push(cell);
                }
                col += 1;
            }
            if col >= offset + width {
                break;
            }
        }
        result.chars().take(width).collect()
    }

    /// Status row: buffer name and flags on the left, the status item on the right.
    fn build_status_line(&self, buffer: Option<&Buffer>, status: &StatusSlot) -> String {
        let left = match buffer {
            Some(buffer) => {
                let cursor = buffer.cursors().primary().active;
                let mut left = format!(" {}", buffer.name());
                if buffer.modified() {
                    left.push_str(" [+]");
                }
                if buffer.read_only() {
                    left.push_str(" [RO]");
                }
                if buffer.cursors().len() > 1 {
                    left.push_str(&format!(" ({} cursors)", buffer.cursors().len()));
                }
                left.push_str(&format!("  Ln {}, Col {}", cursor.line + 1, cursor.column + 1));
                left
            }
            None => " (no editor)".to_string(),
        };
        let right = if status.visible && !status.disposed {
            format!("{} ", status.text)
        } else {
            String::new()
        };

        let used = left.chars().count() + right.chars().count();
        let pad = self.width.saturating_sub(used);
        let line = format!("{}{}{}", left, " ".repeat(pad), right);
        line.chars().take(self.width).collect()
    }

    /// Place the hardware cursor at the primary cursor, or on the message row
    /// when no buffer is focused.
    fn position_cursor(&mut self, buffer: Option<&Buffer>, terminal: &mut dyn Terminal) {
        match buffer {
            Some(buffer) => {
                let style = buffer.cursor_style();
                if self.cursor_style != Some(style) {
                    terminal.set_cursor_style(style);
                    self.cursor_style = Some(style);
                }
                let cursor = buffer.cursors().primary().active;
                let col = display_column(buffer, cursor.line, cursor.column).saturating_sub(self.offset);
                let row = cursor.line.saturating_sub(self.top_line);
                terminal.move_cursor(col as u16, row as u16);
            }
            None => {
                let row = self.height.saturating_sub(1);
                terminal.move_cursor(0, row as u16);
            }
        }
    }
}

/// Screen column of character `column` on `line`, accounting for tabs and
/// control characters.
fn display_column(buffer: &Buffer, line: usize, column: usize) -> usize {
    buffer
        .line_content(line)
        .chars()
        .take(column)
        .fold(0, |col, ch| match ch {
            '\t' => col + TAB_WIDTH - col % TAB_WIDTH,
            ch if ch.is_control() => col + 2,
            _ => col + 1,
        })
}
