//! Status-bar indicator and cursor-shape feedback.

use crate::config::{Config, CursorStyle};
use crate::edit_mode::EditMode;
use crate::host::{StatusItem, TextEditor};

/// What the indicator currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusState {
    /// No focused editor.
    Hidden,
    Mode(EditMode),
}

/// The label shown for `mode`.
pub fn label(config: &Config, mode: EditMode) -> String {
    let custom = match mode {
        EditMode::Insert => config.insert_label.as_deref(),
        EditMode::Overtype => config.overtype_label.as_deref(),
    };
    let builtin = match (mode, config.abbreviated_status) {
        (EditMode::Insert, true) => "INS",
        (EditMode::Overtype, true) => "OVR",
        (EditMode::Insert, false) => "Insert",
        (EditMode::Overtype, false) => "Overtype",
    };
    custom.unwrap_or(builtin).to_string()
}

/// The cursor shape shown for `mode`.
pub fn cursor_style(config: &Config, mode: EditMode) -> CursorStyle {
    match mode {
        EditMode::Insert => config.default_cursor_style,
        EditMode::Overtype => config.overtype_cursor_style,
    }
}

/// Keeps a host status item in sync with the focused editor's mode.
pub struct StatusIndicator {
    item: Box<dyn StatusItem>,
    state: StatusState,
    disposed: bool,
}

impl StatusIndicator {
    pub fn new(item: Box<dyn StatusItem>) -> Self {
        Self {
            item,
            state: StatusState::Hidden,
            disposed: false,
        }
    }

    pub fn state(&self) -> StatusState {
        self.state
    }

    /// Show the label for `mode`, or hide the item when `mode` is `None`.
    pub fn update(&mut self, config: &Config, mode: Option<EditMode>) {
        if self.disposed {
            return;
        }
        match mode {
            None => {
                self.state = StatusState::Hidden;
                self.item.hide();
            }
            Some(mode) => {
                self.state = StatusState::Mode(mode);
                self.item.set_text(&label(config, mode));
                self.item.show();
            }
        }
    }

    /// Set the cursor shape of `editor` to match `mode`.
    pub fn apply_cursor(&self, config: &Config, editor: &mut dyn TextEditor, mode: EditMode) {
        let style = cursor_style(config, mode);
        if editor.cursor_style() != style {
            editor.set_cursor_style(style);
        }
    }

    pub fn dispose(&mut self) {
        if !self.disposed {
            self.item.dispose();
            self.disposed = true;
        }
    }
}
