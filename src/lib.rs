//! Insert/overtype text entry for a host editor.
//!
//! The add-on keeps one mode per editor (or one global mode), shows it in a
//! status item and the cursor shape, and makes the host's own `type` and
//! `paste` commands overwrite the characters after each cursor while in
//! overtype mode.
//!
//! # Example
//!
//! ```rust
//! use overtype::{Buffer, Overtype, Position, TypeArgs, Workspace};
//!
//! let mut workspace = Workspace::new();
//! let id = workspace.alloc_id();
//! workspace.add(Buffer::from_str(id, "demo", "hello"));
//!
//! let mut overtype = Overtype::activate(&mut workspace, &String::new());
//! overtype.toggle_command(&mut workspace);
//!
//! workspace.focused_mut().unwrap().set_cursor(Position::new(0, 2));
//! overtype.type_command(&mut workspace, &TypeArgs::new("XY")).unwrap();
//!
//! assert_eq!(workspace.focused().unwrap().to_string(), "heXYo");
//! ```

mod app;
mod buffer;
pub mod config;
mod cursors;
mod edit_mode;
mod edit_op;
mod error;
pub mod host;
mod keybind;
mod mode_store;
mod overtype;
mod position;
mod replace;
mod screen;
mod status;
mod terminal;
mod workspace;

pub use app::App;
pub use buffer::{Buffer, Motion};
pub use config::{Config, Configuration, CursorStyle, FileSettings, SettingsSource};
pub use cursors::CursorSet;
pub use edit_mode::EditMode;
pub use edit_op::{EditKind, EditOp};
pub use error::{ConfigError, HostError};
pub use host::{Command, Host, PasteArgs, StatusItem, TextEditor, TypeArgs};
pub use keybind::{KeyAction, resolve_key};
pub use mode_store::{EditorId, ModeStore};
pub use overtype::Overtype;
pub use position::{Position, Range, Selection};
pub use replace::{LineSource, overtype_before_paste, overtype_before_type, overwrite_count};
pub use screen::Screen;
pub use status::{StatusIndicator, StatusState};
pub use terminal::{CrosstermTerminal, TermSize, Terminal};
pub use workspace::{Clipboard, StatusSlot, Workspace};
