//! Per-editor (or global) overtype mode storage.

use std::collections::HashMap;

use tracing::debug;

use crate::edit_mode::EditMode;

/// Opaque identity of one open editor, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditorId(pub u64);

/// Holds the overtype mode for every editor, or one global mode.
///
/// Entries are created lazily and never removed; an entry for an editor the
/// host has since closed is simply never asked for again.
#[derive(Debug, Default)]
pub struct ModeStore {
    per_editor: bool,
    /// The mode when scope is global.
    global: EditMode,
    /// Seed for editors seen for the first time when scope is per-editor.
    seed: EditMode,
    modes: HashMap<EditorId, EditMode>,
}

impl ModeStore {
    pub fn new(per_editor: bool) -> Self {
        Self {
            per_editor,
            ..Self::default()
        }
    }

    pub fn per_editor(&self) -> bool {
        self.per_editor
    }

    /// The single mode used while scope is global.
    pub fn global(&self) -> EditMode {
        self.global
    }

    /// The mode in effect for `editor`.
    pub fn get_mode(&mut self, editor: EditorId) -> EditMode {
        if !self.per_editor {
            return self.global;
        }
        *self.modes.entry(editor).or_insert(self.seed)
    }

    /// Flip the mode in effect for `editor`.
    pub fn toggle_mode(&mut self, editor: EditorId) {
        if self.per_editor {
            let seed = self.seed;
            let mode = self.modes.entry(editor).or_insert(seed);
            *mode = mode.toggled();
        } else {
            self.global = self.global.toggled();
        }
    }

    /// Re-initialise all modes after a scope change.
    ///
    /// Every editor (or the global value) observes `seed` afterwards, or
    /// [`EditMode::Insert`] when no seed is given.
    pub fn reset_modes(&mut self, seed: Option<EditMode>, per_editor: bool) {
        let mode = seed.unwrap_or_default();
        debug!(
            ?mode,
            per_editor,
            dropped = self.tracked_editors(),
            "resetting overtype modes"
        );
        self.per_editor = per_editor;
        self.modes.clear();
        self.seed = mode;
        self.global = mode;
    }

    /// Number of editors with a recorded mode.
    pub fn tracked_editors(&self) -> usize {
        self.modes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: EditorId = EditorId(1);
    const B: EditorId = EditorId(2);

    #[test]
    fn test_default_is_insert() {
        let mut store = ModeStore::new(true);
        assert_eq!(store.get_mode(A), EditMode::Insert);
        assert_eq!(store.tracked_editors(), 1);
    }

    #[test]
    fn test_global_toggle_affects_every_editor() {
        let mut store = ModeStore::new(false);
        store.toggle_mode(A);
        assert_eq!(store.global(), EditMode::Overtype);
        assert_eq!(store.get_mode(A), EditMode::Overtype);
        assert_eq!(store.get_mode(B), EditMode::Overtype);
        assert_eq!(store.tracked_editors(), 0);
    }

    #[test]
    fn test_per_editor_toggle_is_isolated() {
        let mut store = ModeStore::new(true);
        store.toggle_mode(A);
        assert_eq!(store.get_mode(A), EditMode::Overtype);
        assert_eq!(store.get_mode(B), EditMode::Insert);
        store.toggle_mode(A);
        assert_eq!(store.get_mode(A), EditMode::Insert);
    }

    #[test]
    fn test_switch_to_per_editor_seeds_every_editor() {
        let mut store = ModeStore::new(false);
        store.toggle_mode(A);
        let prior = store.get_mode(A);
        store.reset_modes(Some(prior), true);
        assert_eq!(store.get_mode(A), EditMode::Overtype);
        assert_eq!(store.get_mode(B), EditMode::Overtype);
        store.toggle_mode(B);
        assert_eq!(store.get_mode(A), EditMode::Overtype);
        assert_eq!(store.get_mode(B), EditMode::Insert);
    }

    #[test]
    fn test_switch_to_global_takes_focused_mode() {
        let mut store = ModeStore::new(true);
        store.toggle_mode(B);
        let focused = store.get_mode(B);
        store.reset_modes(Some(focused), false);
        assert!(!store.per_editor());
        assert_eq!(store.get_mode(A), EditMode::Overtype);
        assert_eq!(store.get_mode(B), EditMode::Overtype);
    }

    #[test]
    fn test_reset_without_seed_is_insert() {
        let mut store = ModeStore::new(true);
        store.toggle_mode(A);
        store.reset_modes(None, false);
        assert_eq!(store.get_mode(A), EditMode::Insert);
        store.reset_modes(None, true);
        assert_eq!(store.get_mode(A), EditMode::Insert);
        assert_eq!(store.tracked_editors(), 1);
    }
}
