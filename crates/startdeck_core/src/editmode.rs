//! Edit-mode two-state controller.
//!
//! # Responsibility
//! - Hold the Normal/Edit flag that gates reorder handles, overlays, and add
//!   affordances.
//! - Report transitions so the owner can apply surface and engine side
//!   effects exactly once per change.
//!
//! # Invariants
//! - Pure in-memory state; nothing here persists or performs I/O.

/// Status caption shown while edit mode is active.
pub const EDIT_CAPTION: &str = "Edit Mode Active";

/// Status caption shown at rest.
pub const NORMAL_CAPTION: &str = "Hold any item to Edit";

/// The two interaction modes of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Normal,
    Edit,
}

impl EditMode {
    /// Returns the status caption for this mode.
    pub fn caption(self) -> &'static str {
        match self {
            Self::Normal => NORMAL_CAPTION,
            Self::Edit => EDIT_CAPTION,
        }
    }
}

/// Owner of the mode flag; entered via long-press or add actions, exited via
/// background tap or a completed destructive action.
#[derive(Debug, Default)]
pub struct EditModeController {
    mode: EditMode,
}

impl EditModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_edit(&self) -> bool {
        self.mode == EditMode::Edit
    }

    /// Switches to Edit. Returns true when this call changed the mode.
    pub fn enter(&mut self) -> bool {
        let changed = self.mode == EditMode::Normal;
        self.mode = EditMode::Edit;
        changed
    }

    /// Switches to Normal. Returns true when this call changed the mode.
    pub fn exit(&mut self) -> bool {
        let changed = self.mode == EditMode::Edit;
        self.mode = EditMode::Normal;
        changed
    }
}
