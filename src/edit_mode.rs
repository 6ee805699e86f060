//! Edit mode tracking.

/// The current text-entry mode of an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditMode {
    /// Characters are inserted at the cursor position.
    #[default]
    Insert,
    /// Characters overtype (replace) at the cursor position.
    Overtype,
}

impl EditMode {
    pub fn is_overtype(self) -> bool {
        self == EditMode::Overtype
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            EditMode::Insert => EditMode::Overtype,
            EditMode::Overtype => EditMode::Insert,
        }
    }
}
