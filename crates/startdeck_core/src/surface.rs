//! Rendering-surface seam.
//!
//! # Responsibility
//! - Describe every patch the core applies to the page, with markup and
//!   styling left entirely to the implementor.
//!
//! # Invariants
//! - The surface mirrors the board; it is patched in place after successful
//!   mutations and never re-fetched wholesale.

use crate::model::board::{FillLevel, Link, Section};

/// Visual tone of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastTone {
    Success,
    Error,
}

/// Content of the shared edit/add modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSpec {
    /// Modal heading ("Edit Link", "Add New Section", ...).
    pub title: &'static str,
    /// Pre-filled name field.
    pub name: String,
    /// Pre-filled URL field; `None` hides the field (section forms).
    pub url: Option<String>,
    /// Pre-filled color field; only meaningful for link forms.
    pub color: Option<String>,
    /// Whether the hold-to-delete control replaces the cancel button.
    pub allow_delete: bool,
}

/// The page mutations the interaction core can request.
///
/// Hosts implement this over their DOM (or scene graph); tests implement it
/// with a recorder.
pub trait Surface {
    /// Applies or removes the page-wide edit-active marker.
    fn set_edit_marker(&mut self, active: bool);
    /// Updates the status caption under the board.
    fn set_mode_caption(&mut self, caption: &str);
    /// Marks a drag session in progress (the original toggles a body class).
    fn set_drag_highlight(&mut self, active: bool);
    /// Shows a non-blocking notification.
    fn show_toast(&mut self, message: &str, tone: ToastTone);
    /// Opens the shared modal with the given content.
    fn open_modal(&mut self, spec: &ModalSpec);
    /// Closes the shared modal.
    fn close_modal(&mut self);
    /// Appends a rendered link row to its section container.
    fn append_link(&mut self, section_id: &str, link: &Link);
    /// Appends a rendered section card (with an empty link container).
    fn append_section(&mut self, section: &Section);
    /// Removes one link row.
    fn remove_link(&mut self, link_id: &str);
    /// Removes one section card with its container.
    fn remove_section(&mut self, section_id: &str);
    /// Rewrites one link row's label, href, and color.
    fn update_link(&mut self, link: &Link);
    /// Rewrites one section card's heading.
    fn rename_section(&mut self, section_id: &str, name: &str);
    /// Refreshes one container's fill badge and add-affordance visibility.
    fn set_fill_badge(&mut self, section_id: &str, level: FillLevel);
    /// Shows or hides the rail's add-section affordance (empty board state).
    fn set_board_empty(&mut self, empty: bool);
    /// Opens a URL in a new browsing context.
    fn open_url(&mut self, url: &str);
}
