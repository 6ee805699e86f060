//! `Workspace`: the demo host's open buffers, focus, clipboard and status slot.

use std::cell::RefCell;
use std::rc::Rc;

use crate::buffer::Buffer;
use crate::error::HostError;
use crate::host::{Host, PasteArgs, StatusItem, TextEditor, TypeArgs};
use crate::mode_store::EditorId;

/// What the status item currently displays. Shared with the screen.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusSlot {
    pub text: String,
    pub visible: bool,
    pub disposed: bool,
}

/// The workspace's end of a status item.
struct SlotItem(Rc<RefCell<StatusSlot>>);

impl StatusItem for SlotItem {
    fn set_text(&mut self, text: &str) {
        self.0.borrow_mut().text = text.to_string();
    }

    fn show(&mut self) {
        self.0.borrow_mut().visible = true;
    }

    fn hide(&mut self) {
        self.0.borrow_mut().visible = false;
    }

    fn dispose(&mut self) {
        let mut slot = self.0.borrow_mut();
        slot.visible = false;
        slot.disposed = true;
    }
}

/// Clipboard contents.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Clipboard {
    pub text: String,
    /// Copied as a whole line from an empty selection.
    pub whole_line: bool,
}

/// A collection of buffers with at most one focused.
pub struct Workspace {
    buffers: Vec<Buffer>,
    /// `None` when focus is outside any text buffer.
    focused: Option<usize>,
    clipboard: Clipboard,
    status: Rc<RefCell<StatusSlot>>,
    next_id: u64,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            buffers: Vec::new(),
            focused: None,
            clipboard: Clipboard::default(),
            status: Rc::default(),
            next_id: 1,
        }
    }

    /// Hand out the next editor id.
    pub fn alloc_id(&mut self) -> EditorId {
        let id = EditorId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a buffer and focus it.
    pub fn add(&mut self, buffer: Buffer) {
        self.buffers.push(buffer);
        self.focused = Some(self.buffers.len() - 1);
    }

    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused(&self) -> Option<&Buffer> {
        self.focused.and_then(|i| self.buffers.get(i))
    }

    pub fn focused_mut(&mut self) -> Option<&mut Buffer> {
        self.focused.and_then(|i| self.buffers.get_mut(i))
    }

    /// Focus the next buffer, wrapping around. Focus outside any buffer
    /// moves to the first one.
    pub fn focus_next(&mut self) {
        if self.buffers.is_empty() {
            return;
        }
        self.focused = Some(match self.focused {
            Some(i) => (i + 1) % self.buffers.len(),
            None => 0,
        });
    }

    /// Move focus away from all buffers.
    pub fn unfocus(&mut self) {
        self.focused = None;
    }

    pub fn status(&self) -> StatusSlot {
        self.status.borrow().clone()
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Copy from the focused buffer. Returns false without one.
    pub fn copy(&mut self) -> bool {
        let Some(buffer) = self.focused() else {
            return false;
        };
        let (text, whole_line) = buffer.copy();
        self.clipboard = Clipboard { text, whole_line };
        true
    }

    /// Arguments for a paste of the clipboard.
    pub fn paste_args(&self) -> PasteArgs {
        PasteArgs::new(self.clipboard.text.clone(), self.clipboard.whole_line)
    }

    /// Whether any buffer has unsaved changes.
    pub fn modified(&self) -> bool {
        self.buffers.iter().any(Buffer::modified)
    }
}

impl Host for Workspace {
    fn active_editor(&mut self) -> Option<&mut dyn TextEditor> {
        self.focused_mut().map(|buffer| buffer as &mut dyn TextEditor)
    }

    fn default_type(&mut self, args: &TypeArgs) -> Result<(), HostError> {
        match self.focused_mut() {
            Some(buffer) => buffer.type_text(&args.text),
            None => Err(HostError::NoActiveEditor),
        }
    }

    fn default_paste(&mut self, args: &PasteArgs) -> Result<(), HostError> {
        match self.focused_mut() {
            Some(buffer) => buffer.paste_text(&args.text, args.paste_on_new_line),
            None => Err(HostError::NoActiveEditor),
        }
    }

    fn create_status_item(&mut self) -> Box<dyn StatusItem> {
        *self.status.borrow_mut() = StatusSlot::default();
        Box::new(SlotItem(self.status.clone()))
    }
}
