//! The add-on itself: command interception and event handlers.
//!
//! Each handler is an independent entry point the host calls with itself as
//! the argument. The `type` and `paste` handlers either pass the command
//! straight through, or first apply the deletions that make the native
//! command overwrite instead of insert, and then pass it through. The native
//! command always runs, whatever happened to the overtype edit.

use tracing::{debug, trace, warn};

use crate::config::{Config, Configuration, SettingsSource};
use crate::edit_mode::EditMode;
use crate::edit_op::{EditKind, EditOp};
use crate::error::HostError;
use crate::host::{Command, Host, PasteArgs, TextEditor, TypeArgs};
use crate::mode_store::{EditorId, ModeStore};
use crate::replace::{overtype_before_paste, overtype_before_type};
use crate::status::{StatusIndicator, StatusState};

/// Overtype mode for one host.
pub struct Overtype {
    configuration: Configuration,
    modes: ModeStore,
    status: StatusIndicator,
}

impl Overtype {
    /// Load settings, create the status item and show the initial state.
    pub fn activate(host: &mut dyn Host, settings: &dyn SettingsSource) -> Self {
        let configuration = Configuration::load(settings);
        let modes = ModeStore::new(configuration.current().per_editor);
        let status = StatusIndicator::new(host.create_status_item());
        let mut overtype = Self {
            configuration,
            modes,
            status,
        };
        overtype.active_editor_changed(host);
        overtype
    }

    pub fn deactivate(&mut self) {
        self.status.dispose();
    }

    pub fn config(&self) -> &Config {
        self.configuration.current()
    }

    /// The mode currently in effect for `editor`.
    pub fn mode(&mut self, editor: EditorId) -> EditMode {
        self.modes.get_mode(editor)
    }

    pub fn status(&self) -> StatusState {
        self.status.state()
    }

    /// Run a command delivered by the host's command registry.
    pub fn execute(&mut self, host: &mut dyn Host, command: &Command) -> Result<(), HostError> {
        trace!(command = command.id(), "execute");
        match command {
            Command::Toggle => {
                self.toggle_command(host);
                Ok(())
            }
            Command::Type(args) => self.type_command(host, args),
            Command::Paste(args) => self.paste_command(host, args),
        }
    }

    /// The focused editor changed (possibly to none).
    pub fn active_editor_changed(&mut self, host: &mut dyn Host) {
        let config = self.configuration.current();
        match host.active_editor() {
            None => self.status.update(config, None),
            Some(editor) => {
                let mode = self.modes.get_mode(editor.id());
                self.status.update(config, Some(mode));
                self.status.apply_cursor(config, editor, mode);
            }
        }
    }

    /// Flip the mode of the focused editor. Does nothing without one.
    pub fn toggle_command(&mut self, host: &mut dyn Host) {
        let Some(editor) = host.active_editor() else {
            return;
        };
        let id = editor.id();
        self.modes.toggle_mode(id);
        debug!(editor = id.0, mode = ?self.modes.get_mode(id), "toggled overtype");
        self.active_editor_changed(host);
    }

    /// Settings may have changed: reload and react to what did.
    pub fn configuration_changed(&mut self, host: &mut dyn Host, settings: &dyn SettingsSource) {
        let previous_per_editor = self.configuration.current().per_editor;
        let updated = match self.configuration.reload(settings) {
            Ok(updated) => updated,
            Err(e) => {
                warn!("Failed to reload overtype settings: {}", e);
                false
            }
        };
        if !updated {
            return;
        }

        let per_editor = self.configuration.current().per_editor;
        if per_editor != previous_per_editor {
            // Without a focused editor only the global value can carry over.
            let seed = match host.active_editor() {
                Some(editor) => Some(self.modes.get_mode(editor.id())),
                None if !previous_per_editor => Some(self.modes.global()),
                None => None,
            };
            self.modes.reset_modes(seed, per_editor);
        }
        self.active_editor_changed(host);
    }

    /// Intercepted `type` command.
    pub fn type_command(&mut self, host: &mut dyn Host, args: &TypeArgs) -> Result<(), HostError> {
        if let Some(editor) = self.overtype_editor(host) {
            let selections = editor.selections();
            let ops = overtype_before_type(&*editor, &selections, &args.text);
            pre_consume(editor, &ops);
        }
        host.default_type(args)
    }

    /// Intercepted `paste` command. Passes through unless paste is enabled.
    pub fn paste_command(&mut self, host: &mut dyn Host, args: &PasteArgs) -> Result<(), HostError> {
        if self.configuration.current().paste
            && let Some(editor) = self.overtype_editor(host)
        {
            let selections = editor.selections();
            let ops =
                overtype_before_paste(&*editor, &selections, &args.text, args.paste_on_new_line);
            pre_consume(editor, &ops);
        }
        host.default_paste(args)
    }

    /// The focused editor, if it is in overtype mode.
    fn overtype_editor<'h>(&mut self, host: &'h mut dyn Host) -> Option<&'h mut dyn TextEditor> {
        let editor = host.active_editor()?;
        if self.modes.get_mode(editor.id()).is_overtype() {
            Some(editor)
        } else {
            None
        }
    }
}

/// Apply the deletions of the overwriting edits, leaving the insertion to the
/// native command.
fn pre_consume(editor: &mut dyn TextEditor, ops: &[EditOp]) {
    let deletions: Vec<EditOp> = ops
        .iter()
        .filter(|op| op.kind == EditKind::Overwrite)
        .filter_map(EditOp::deletion)
        .collect();
    if deletions.is_empty() {
        return;
    }
    trace!(
        editor = editor.id().0,
        count = deletions.len(),
        chars = deletions.iter().map(EditOp::deleted_columns).sum::<usize>(),
        "overtype pre-edit"
    );
    if let Err(e) = editor.apply_edits(&deletions) {
        warn!(editor = editor.id().0, "overtype edit failed: {}", e);
    }
}
