//! Output and key input for the demo host.
//!
//! [`Screen`](crate::screen::Screen) draws through the [`Terminal`] trait so
//! the editor loop can run against [`CrosstermTerminal`] or, in tests, a
//! recording `MockTerminal`.

use std::io::{Stdout, Write};

use anyhow::Result;
use crossterm::cursor::{self, SetCursorStyle};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{self, ClearType};
use crossterm::{execute, queue};

use crate::config::CursorStyle;

/// Key code standing in for a terminal resize in the key stream.
pub const RESIZE_KEY: KeyCode = KeyCode::F(63);

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    pub width: u16,
    pub height: u16,
}

/// What the screen and the event loop need from a terminal.
///
/// Drawing calls may be buffered; nothing is guaranteed visible before
/// [`flush`](Terminal::flush).
pub trait Terminal {
    /// Switch to raw mode on an alternate screen.
    fn init(&mut self) -> Result<()>;

    /// Undo [`init`](Terminal::init), restoring the user's cursor shape.
    fn cleanup(&mut self) -> Result<()>;

    /// Cells available for text rows plus the status and message rows.
    fn size(&self) -> TermSize;

    /// Place the cursor at 0-based `col`, `row`.
    fn move_cursor(&mut self, col: u16, row: u16);

    fn write_str(&mut self, s: &str);

    /// Reverse video, used for the status row.
    fn set_reverse(&mut self, on: bool);

    /// Blank the rest of the current row.
    fn clear_eol(&mut self);

    fn clear_screen(&mut self);

    /// Show the add-on's cursor style for the focused buffer.
    fn set_cursor_style(&mut self, style: CursorStyle);

    /// Bell for a rejected command.
    fn beep(&mut self);

    fn flush(&mut self);

    /// Wait for the next key. A resize arrives as [`RESIZE_KEY`].
    fn read_key(&mut self) -> Result<KeyEvent>;
}

/// Closest terminal cursor shape for an editor cursor style.
///
/// Terminals have no outline block, so `BlockOutline` shows as a steady block.
pub fn crossterm_cursor_style(style: CursorStyle) -> SetCursorStyle {
    match style {
        CursorStyle::Line => SetCursorStyle::BlinkingBar,
        CursorStyle::LineThin => SetCursorStyle::SteadyBar,
        CursorStyle::Block => SetCursorStyle::BlinkingBlock,
        CursorStyle::BlockOutline => SetCursorStyle::SteadyBlock,
        CursorStyle::Underline => SetCursorStyle::BlinkingUnderScore,
        CursorStyle::UnderlineThin => SetCursorStyle::SteadyUnderScore,
    }
}

/// Stdout-backed terminal. Drawing is queued and sent on `flush`.
pub struct CrosstermTerminal {
    out: Stdout,
    size: TermSize,
    /// The cursor is hidden while rows are redrawn.
    drawing: bool,
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        let (width, height) = terminal::size().unwrap_or((80, 24));
        Self {
            out: std::io::stdout(),
            size: TermSize { width, height },
            drawing: false,
        }
    }

    fn begin_drawing(&mut self) {
        if !self.drawing {
            queue!(self.out, cursor::Hide).ok();
            self.drawing = true;
        }
    }

    fn end_drawing(&mut self) {
        if self.drawing {
            execute!(self.out, cursor::Show).ok();
            self.drawing = false;
        }
    }
}

impl Terminal for CrosstermTerminal {
    fn init(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.out, terminal::EnterAlternateScreen)?;
        let (width, height) = terminal::size()?;
        self.size = TermSize { width, height };
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        execute!(
            self.out,
            SetCursorStyle::DefaultUserShape,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        self.drawing = false;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn size(&self) -> TermSize {
        self.size
    }

    fn move_cursor(&mut self, col: u16, row: u16) {
        queue!(self.out, cursor::MoveTo(col, row)).ok();
    }

    fn write_str(&mut self, s: &str) {
        self.begin_drawing();
        queue!(self.out, Print(s)).ok();
    }

    fn set_reverse(&mut self, on: bool) {
        let attr = if on { Attribute::Reverse } else { Attribute::NoReverse };
        queue!(self.out, SetAttribute(attr)).ok();
    }

    fn clear_eol(&mut self) {
        queue!(self.out, terminal::Clear(ClearType::UntilNewLine)).ok();
    }

    fn clear_screen(&mut self) {
        self.begin_drawing();
        queue!(self.out, terminal::Clear(ClearType::All)).ok();
    }

    fn set_cursor_style(&mut self, style: CursorStyle) {
        queue!(self.out, crossterm_cursor_style(style)).ok();
    }

    fn beep(&mut self) {
        queue!(self.out, Print('\x07')).ok();
    }

    fn flush(&mut self) {
        self.out.flush().ok();
    }

    fn read_key(&mut self) -> Result<KeyEvent> {
        self.end_drawing();
        loop {
            match event::read()? {
                Event::Key(key) => return Ok(key),
                Event::Resize(width, height) => {
                    self.size = TermSize { width, height };
                    return Ok(KeyEvent::new(RESIZE_KEY, KeyModifiers::NONE));
                }
                Event::Paste(text) => {
                    tracing::debug!(len = text.len(), "bracketed paste ignored");
                }
                _ => {}
            }
        }
    }
}

/// Mock terminal for testing, records all operations.
#[cfg(test)]
pub struct MockTerminal {
    pub size: TermSize,
    pub cursor_col: u16,
    pub cursor_row: u16,
    pub cursor_style: Option<CursorStyle>,
    pub ops: Vec<MockOp>,
    pub key_queue: Vec<KeyEvent>,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum MockOp {
    Init,
    Cleanup,
    MoveCursor(u16, u16),
    WriteStr(String),
    Reverse(bool),
    ClearEol,
    ClearScreen,
    CursorStyle(CursorStyle),
    Beep,
    Flush,
}

#[cfg(test)]
impl MockTerminal {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: TermSize { width, height },
            cursor_col: 0,
            cursor_row: 0,
            cursor_style: None,
            ops: Vec::new(),
            key_queue: Vec::new(),
        }
    }

    pub fn push_key(&mut self, key: KeyEvent) {
        self.key_queue.push(key);
    }

    /// All strings written, in order.
    pub fn written(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                MockOp::WriteStr(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl Terminal for MockTerminal {
    fn init(&mut self) -> Result<()> {
        self.ops.push(MockOp::Init);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        self.ops.push(MockOp::Cleanup);
        Ok(())
    }

    fn size(&self) -> TermSize {
        self.size
    }

    fn move_cursor(&mut self, col: u16, row: u16) {
        self.cursor_col = col;
        self.cursor_row = row;
        self.ops.push(MockOp::MoveCursor(col, row));
    }

    fn write_str(&mut self, s: &str) {
        self.ops.push(MockOp::WriteStr(s.to_string()));
    }

    fn set_reverse(&mut self, on: bool) {
        self.ops.push(MockOp::Reverse(on));
    }

    fn clear_eol(&mut self) {
        self.ops.push(MockOp::ClearEol);
    }

    fn clear_screen(&mut self) {
        self.ops.push(MockOp::ClearScreen);
    }

    fn set_cursor_style(&mut self, style: CursorStyle) {
        self.cursor_style = Some(style);
        self.ops.push(MockOp::CursorStyle(style));
    }

    fn beep(&mut self) {
        self.ops.push(MockOp::Beep);
    }

    fn flush(&mut self) {
        self.ops.push(MockOp::Flush);
    }

    fn read_key(&mut self) -> Result<KeyEvent> {
        if self.key_queue.is_empty() {
            anyhow::bail!("No more keys in mock queue");
        }
        Ok(self.key_queue.remove(0))
    }
}
