//! The surface a host editor exposes to the overtype add-on.
//!
//! A host owns documents, selections, the native `type`/`paste` commands and
//! a status bar. The add-on only ever talks to it through these traits.

use crate::config::CursorStyle;
use crate::edit_op::EditOp;
use crate::error::HostError;
use crate::mode_store::EditorId;
use crate::position::Selection;
use crate::replace::LineSource;

/// Command id of the user-facing toggle.
pub const TOGGLE_COMMAND: &str = "overtype.toggle";
/// Command id of the native "insert typed text" command.
pub const TYPE_COMMAND: &str = "type";
/// Command id of the native paste command.
pub const PASTE_COMMAND: &str = "paste";

/// Arguments of the `type` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeArgs {
    pub text: String,
}

impl TypeArgs {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Arguments of the `paste` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteArgs {
    pub text: String,
    /// The clipboard holds a whole line copied from an empty selection.
    pub paste_on_new_line: bool,
}

impl PasteArgs {
    pub fn new(text: impl Into<String>, paste_on_new_line: bool) -> Self {
        Self {
            text: text.into(),
            paste_on_new_line,
        }
    }
}

/// A command as delivered by the host's command registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Type(TypeArgs),
    Paste(PasteArgs),
}

impl Command {
    pub fn id(&self) -> &'static str {
        match self {
            Command::Toggle => TOGGLE_COMMAND,
            Command::Type(_) => TYPE_COMMAND,
            Command::Paste(_) => PASTE_COMMAND,
        }
    }
}

/// One open text editor.
pub trait TextEditor: LineSource {
    fn id(&self) -> EditorId;

    /// Current selections, primary first.
    fn selections(&self) -> Vec<Selection>;

    fn cursor_style(&self) -> CursorStyle;

    fn set_cursor_style(&mut self, style: CursorStyle);

    /// Apply `edits` as one transaction. Positions refer to the document
    /// before any of them is applied.
    fn apply_edits(&mut self, edits: &[EditOp]) -> Result<(), HostError>;
}

/// A status-bar entry owned by the add-on.
pub trait StatusItem {
    fn set_text(&mut self, text: &str);
    fn show(&mut self);
    fn hide(&mut self);
    fn dispose(&mut self);
}

/// The host editor.
pub trait Host {
    /// The focused text editor, if any.
    fn active_editor(&mut self) -> Option<&mut dyn TextEditor>;

    /// The host's own `type` implementation.
    fn default_type(&mut self, args: &TypeArgs) -> Result<(), HostError>;

    /// The host's own `paste` implementation.
    fn default_paste(&mut self, args: &PasteArgs) -> Result<(), HostError>;

    fn create_status_item(&mut self) -> Box<dyn StatusItem>;
}
