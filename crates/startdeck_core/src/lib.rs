//! Interaction core for a drag-and-drop bookmark startpage.
//! This crate owns every state transition between the rendering surface and
//! the persistence backend: gesture disambiguation, edit mode, reordering,
//! hold-to-confirm deletion, and the optimistic sync protocol.

pub mod clock;
pub mod dashboard;
pub mod editmode;
pub mod gesture;
pub mod logging;
pub mod model;
pub mod reorder;
pub mod session;
pub mod surface;
pub mod sync;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dashboard::{normalize_url, Dashboard, EditSession, EditTarget, ModalForm};
pub use editmode::{EditMode, EditModeController};
pub use gesture::hold::{HoldRelease, HoldToConfirm, HOLD_DURATION_MS};
pub use gesture::press::{
    ClickDisposition, GestureClassifier, InputSource, LongPress, PointerTarget, LONG_PRESS_MS,
    TAP_MAX_MS,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::{
    Board, BoardError, FillLevel, Link, LinkId, Section, SectionId, LINK_CAPACITY,
    NEAR_FULL_THRESHOLD,
};
pub use reorder::{DragOutcome, DropTarget, ReorderEngine, ReorderError};
pub use surface::{ModalSpec, Surface, ToastTone};
pub use sync::http::HttpSyncBackend;
pub use sync::{ItemKind, SyncBackend, SyncError, SyncResult};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
