//! Application event loop for the demo host.
//!
//! The `App` struct ties together the Workspace, the Overtype add-on, Screen,
//! Terminal and key bindings into a main event loop. Typing and pasting go
//! through the add-on's command handlers; everything else is plain editing.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::buffer::Buffer;
use crate::config::SettingsSource;
use crate::error::HostError;
use crate::host::{Command, TypeArgs};
use crate::keybind::{self, KeyAction};
use crate::overtype::Overtype;
use crate::screen::Screen;
use crate::terminal::Terminal;
use crate::workspace::Workspace;

/// The interactive application state.
pub struct App {
    pub workspace: Workspace,
    pub overtype: Overtype,
    pub screen: Screen,
    settings: Box<dyn SettingsSource>,
    pub running: bool,
}

impl App {
    /// Activate the add-on against `workspace`.
    pub fn new(mut workspace: Workspace, screen: Screen, settings: Box<dyn SettingsSource>) -> Self {
        let overtype = Overtype::activate(&mut workspace, settings.as_ref());
        Self {
            workspace,
            overtype,
            screen,
            settings,
            running: true,
        }
    }

    /// Run the main event loop.
    pub fn run(&mut self, terminal: &mut dyn Terminal) -> Result<()> {
        terminal.init()?;
        self.screen.resize(terminal.size());

        while self.running {
            self.screen.render(&self.workspace, terminal);
            let key = match terminal.read_key() {
                Ok(key) => key,
                Err(e) => {
                    warn!("Failed to read key: {}", e);
                    continue;
                }
            };

            let action = keybind::resolve_key(key);
            self.handle_action(action, terminal);
        }

        self.overtype.deactivate();
        terminal.cleanup()?;
        Ok(())
    }

    /// Handle a resolved key action.
    pub fn handle_action(&mut self, action: KeyAction, terminal: &mut dyn Terminal) {
        if action != KeyAction::Resize {
            self.screen.clear_message();
        }

        let result = match action {
            KeyAction::Type(ch) => {
                let command = Command::Type(TypeArgs::new(ch.to_string()));
                self.overtype.execute(&mut self.workspace, &command)
            }
            KeyAction::Paste => {
                let command = Command::Paste(self.workspace.paste_args());
                self.overtype.execute(&mut self.workspace, &command)
            }
            KeyAction::ToggleOvertype => self.overtype.execute(&mut self.workspace, &Command::Toggle),
            KeyAction::Copy => {
                if !self.workspace.copy() {
                    terminal.beep();
                }
                Ok(())
            }
            KeyAction::Backspace => self.with_buffer(Buffer::backspace),
            KeyAction::Delete => self.with_buffer(Buffer::delete_forward),
            KeyAction::Move(motion) => self.with_buffer(|b| {
                b.move_cursors(motion, false);
                Ok(())
            }),
            KeyAction::Select(motion) => self.with_buffer(|b| {
                b.move_cursors(motion, true);
                Ok(())
            }),
            KeyAction::AddCursorBelow => self.with_buffer(|b| {
                b.add_cursor_below();
                Ok(())
            }),
            KeyAction::CollapseCursors => self.with_buffer(|b| {
                b.collapse_cursors();
                Ok(())
            }),
            KeyAction::NextEditor => {
                self.workspace.focus_next();
                self.overtype.active_editor_changed(&mut self.workspace);
                Ok(())
            }
            KeyAction::Unfocus => {
                self.workspace.unfocus();
                self.overtype.active_editor_changed(&mut self.workspace);
                Ok(())
            }
            KeyAction::ReloadSettings => {
                self.overtype
                    .configuration_changed(&mut self.workspace, self.settings.as_ref());
                self.screen.show_message("Settings reloaded.");
                Ok(())
            }
            KeyAction::Save => {
                self.handle_save(terminal);
                Ok(())
            }
            KeyAction::Quit => {
                self.handle_quit(terminal);
                Ok(())
            }
            KeyAction::Resize => {
                self.screen.resize(terminal.size());
                Ok(())
            }
            KeyAction::Ignore => Ok(()),
        };

        if let Err(e) = result {
            debug!(?action, "command failed: {}", e);
            self.screen.show_message(e.to_string());
            terminal.beep();
        }
    }

    /// Run `f` on the focused buffer.
    fn with_buffer(
        &mut self,
        f: impl FnOnce(&mut Buffer) -> Result<(), HostError>,
    ) -> Result<(), HostError> {
        match self.workspace.focused_mut() {
            Some(buffer) => f(buffer),
            None => Err(HostError::NoActiveEditor),
        }
    }

    /// Handle quit. Unsaved changes need a second Ctrl-Q.
    fn handle_quit(&mut self, terminal: &mut dyn Terminal) {
        if !self.workspace.modified() {
            self.running = false;
            return;
        }

        self.screen
            .show_message("Unsaved changes. Ctrl-Q again to quit, or Ctrl-S to save.");
        self.screen.render(&self.workspace, terminal);

        // Wait for another key
        if let Ok(key) = terminal.read_key() {
            match keybind::resolve_key(key) {
                KeyAction::Quit => {
                    self.running = false;
                }
                KeyAction::Save => {
                    self.handle_save(terminal);
                    self.running = false;
                }
                _ => {
                    self.screen.clear_message();
                }
            }
        }
    }

    /// Save the focused buffer.
    fn handle_save(&mut self, terminal: &mut dyn Terminal) {
        let Some(buffer) = self.workspace.focused_mut() else {
            self.screen.show_message(HostError::NoActiveEditor.to_string());
            terminal.beep();
            return;
        };
        match buffer.save() {
            Ok(line_count) => {
                info!(name = buffer.name(), lines = line_count, "saved");
                self.screen.show_message(format!(
                    "{} saved ({} line{}).",
                    buffer.name(),
                    line_count,
                    if line_count == 1 { "" } else { "s" }
                ));
            }
            Err(e) => {
                warn!("Save failed: {:#}", e);
                self.screen.show_message(format!("Save failed: {:#}", e));
                terminal.beep();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::buffer::Motion;
    use crate::edit_mode::EditMode;
    use crate::host::TextEditor;
    use crate::position::Position;
    use crate::terminal::{MockOp, MockTerminal, TermSize};

    fn app(texts: &[&str], settings: &str) -> App {
        let mut workspace = Workspace::new();
        for (i, text) in texts.iter().enumerate() {
            let id = workspace.alloc_id();
            workspace.add(Buffer::from_str(id, &format!("buf{}", i + 1), text));
        }
        workspace.unfocus();
        workspace.focus_next();
        let screen = Screen::new(TermSize {
            width: 40,
            height: 8,
        });
        App::new(workspace, screen, Box::new(settings.to_string()))
    }

    fn press(app: &mut App, term: &mut MockTerminal, actions: &[KeyAction]) {
        for action in actions {
            app.handle_action(*action, term);
        }
    }

    fn text(app: &App) -> String {
        app.workspace.focused().unwrap().to_string()
    }

    #[test]
    fn test_typing_in_insert_and_overtype() {
        let mut app = app(&["hello"], "");
        let mut term = MockTerminal::new(40, 8);
        press(
            &mut app,
            &mut term,
            &[
                KeyAction::Move(Motion::Right),
                KeyAction::Move(Motion::Right),
                KeyAction::Type('X'),
                KeyAction::ToggleOvertype,
                KeyAction::Type('Y'),
                KeyAction::Type('Z'),
            ],
        );
        assert_eq!(text(&app), "heXYZo");
        let id = app.workspace.focused().unwrap().id();
        assert_eq!(app.overtype.mode(id), EditMode::Overtype);
        assert_eq!(app.workspace.status().text, "OVR");
    }

    #[test]
    fn test_copy_paste_with_overtype_paste() {
        let mut app = app(&["abc\nxyz"], "[overtype]\npaste = true\n");
        let mut term = MockTerminal::new(40, 8);
        press(
            &mut app,
            &mut term,
            &[
                KeyAction::Select(Motion::LineEnd),
                KeyAction::Copy,
                KeyAction::Move(Motion::Down),
                KeyAction::Move(Motion::LineStart),
                KeyAction::ToggleOvertype,
                KeyAction::Paste,
            ],
        );
        assert_eq!(text(&app), "abc\nabc");
    }

    #[test]
    fn test_unfocus_and_type_reports_error() {
        let mut app = app(&["a", "b"], "");
        let mut term = MockTerminal::new(40, 8);
        press(&mut app, &mut term, &[KeyAction::Unfocus, KeyAction::Type('x')]);
        assert_eq!(app.screen.message(), Some("no active editor"));
        assert!(term.ops.contains(&MockOp::Beep));

        press(&mut app, &mut term, &[KeyAction::NextEditor, KeyAction::Type('x')]);
        assert_eq!(text(&app), "xa");
    }

    #[test]
    fn test_reload_settings_switches_scope() {
        let mut app = app(&["a", "b"], "");
        let mut term = MockTerminal::new(40, 8);
        press(&mut app, &mut term, &[KeyAction::ToggleOvertype]);
        app.settings = Box::new("[overtype]\nper_editor = true\n".to_string());
        press(&mut app, &mut term, &[KeyAction::ReloadSettings]);
        assert!(app.overtype.config().per_editor);
        press(&mut app, &mut term, &[KeyAction::NextEditor, KeyAction::Type('x')]);
        // The global mode was carried over to every editor.
        assert_eq!(text(&app), "x");
    }

    #[test]
    fn test_multi_cursor_overtype() {
        let mut app = app(&["ab\ncd"], "");
        let mut term = MockTerminal::new(40, 8);
        press(
            &mut app,
            &mut term,
            &[
                KeyAction::AddCursorBelow,
                KeyAction::ToggleOvertype,
                KeyAction::Type('1'),
                KeyAction::CollapseCursors,
                KeyAction::Type('2'),
            ],
        );
        assert_eq!(text(&app), "1b\n12");
        assert_eq!(
            app.workspace.focused().unwrap().cursors().primary().active,
            Position::new(1, 2)
        );
    }

    #[test]
    fn test_quit_without_changes() {
        let mut app = app(&["a"], "");
        let mut term = MockTerminal::new(40, 8);
        press(&mut app, &mut term, &[KeyAction::Quit]);
        assert!(!app.running);
    }

    #[test]
    fn test_quit_with_changes_needs_confirmation() {
        let mut app = app(&["a"], "");
        let mut term = MockTerminal::new(40, 8);
        press(&mut app, &mut term, &[KeyAction::Type('x')]);

        term.push_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        press(&mut app, &mut term, &[KeyAction::Quit]);
        assert!(app.running);

        term.push_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        press(&mut app, &mut term, &[KeyAction::Quit]);
        assert!(!app.running);
    }

    #[test]
    fn test_run_renders_and_quits() {
        let mut app = app(&["hello"], "");
        let mut term = MockTerminal::new(40, 8);
        term.push_key(KeyEvent::new(KeyCode::Insert, KeyModifiers::NONE));
        term.push_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        app.run(&mut term).unwrap();
        assert_eq!(term.ops.first(), Some(&MockOp::Init));
        assert_eq!(term.ops.last(), Some(&MockOp::Cleanup));
        assert!(term.written().iter().any(|s| s.ends_with("OVR ")));
        assert!(app.workspace.status().disposed);
    }

    #[test]
    fn test_save_without_path_reports_error() {
        let mut app = app(&["a"], "");
        let mut term = MockTerminal::new(40, 8);
        press(&mut app, &mut term, &[KeyAction::Save]);
        assert_eq!(app.screen.message(), Some("Save failed: No file path specified."));
    }
}
