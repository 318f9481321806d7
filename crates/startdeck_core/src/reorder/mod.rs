//! Drag-and-drop reorder engine for the section rail and link containers.
//!
//! # Responsibility
//! - Track which containers participate in dragging and whether dragging is
//!   currently enabled.
//! - Convert completed drag sessions into canonical ordered-ID lists and
//!   fill-flag refreshes.
//!
//! # Invariants
//! - One drag session at a time.
//! - A cross-container link drop into a full container is rejected with no
//!   state change and no persistence payload.
//! - Enabling/disabling never tears down container registrations.

pub mod engine;

pub use engine::{
    DragKind, DragOutcome, DragProfile, DropTarget, ReorderEngine, ReorderError,
    LINK_DRAG_PROFILE, SECTION_DRAG_PROFILE,
};
