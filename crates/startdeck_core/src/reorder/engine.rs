//! Drag session lifecycle and order capture.

use crate::model::board::{Board, BoardError, FillLevel, LinkId, SectionId};
use log::{debug, info};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Behavior descriptor the host's pointer layer applies to one container
/// class. Thresholds are midpoint-overlap fractions for swapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragProfile {
    /// Overlap fraction at which two items swap.
    pub swap_threshold: f32,
    /// Whether dragging may only start from the designated handle.
    pub handle_only: bool,
    /// Whether the container flows horizontally (grid wrapping).
    pub horizontal: bool,
    /// Whether items may leave for sibling containers of the same class.
    pub cross_container: bool,
}

/// Section rail: header-handle drag, horizontal bias, midpoint swap.
pub const SECTION_DRAG_PROFILE: DragProfile = DragProfile {
    swap_threshold: 0.50,
    handle_only: true,
    horizontal: true,
    cross_container: false,
};

/// Link containers: drag from anywhere, shared group across sections.
pub const LINK_DRAG_PROFILE: DragProfile = DragProfile {
    swap_threshold: 0.65,
    handle_only: false,
    horizontal: false,
    cross_container: true,
};

/// Errors from drag session management.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// Dragging is disabled outside edit mode.
    Disabled,
    /// Another drag session is already active.
    DragInProgress,
    /// Commit or cancel called with no active session.
    NoActiveDrag,
    /// Section drags must start from the header handle.
    HandleRequired,
    /// Target link container was never registered.
    ContainerNotRegistered(SectionId),
    /// Dragged section does not exist.
    UnknownSection(SectionId),
    /// Dragged link does not exist.
    UnknownLink(LinkId),
    /// Drop vetoed by the capacity rule; nothing changed.
    DropRejected(SectionId),
    /// Order mutation failed at the model layer.
    Board(BoardError),
}

impl Display for ReorderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "dragging is disabled outside edit mode"),
            Self::DragInProgress => write!(f, "a drag session is already active"),
            Self::NoActiveDrag => write!(f, "no drag session is active"),
            Self::HandleRequired => write!(f, "section drags must start from the header handle"),
            Self::ContainerNotRegistered(id) => {
                write!(f, "link container not registered: {id}")
            }
            Self::UnknownSection(id) => write!(f, "unknown section: {id}"),
            Self::UnknownLink(id) => write!(f, "unknown link: {id}"),
            Self::DropRejected(id) => write!(f, "drop rejected: section {id} is full"),
            Self::Board(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReorderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Board(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BoardError> for ReorderError {
    fn from(value: BoardError) -> Self {
        match value {
            BoardError::SectionFull(id) => Self::DropRejected(id),
            other => Self::Board(other),
        }
    }
}

/// What is being dragged in the active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragKind {
    Section { id: SectionId },
    Link { id: LinkId, origin: SectionId },
}

/// Candidate container under the pointer during a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// The section rail.
    Rail,
    /// One section's link container.
    Links(SectionId),
}

/// Result of one committed drag: the order list to persist plus the fill
/// flags to refresh on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    SectionOrder {
        ids: Vec<SectionId>,
    },
    LinkOrder {
        section_id: SectionId,
        link_ids: Vec<LinkId>,
        fill_updates: Vec<(SectionId, FillLevel)>,
    },
}

/// Registry of sortable containers plus the single active drag session.
#[derive(Debug, Default)]
pub struct ReorderEngine {
    enabled: bool,
    link_containers: BTreeSet<SectionId>,
    session: Option<DragKind>,
}

impl ReorderEngine {
    /// Creates the engine disabled, matching the page's Normal mode at load.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one section's link container for dragging.
    pub fn register_link_container(&mut self, section_id: impl Into<SectionId>) {
        self.link_containers.insert(section_id.into());
    }

    /// Drops one section's link container from the registry.
    pub fn unregister_link_container(&mut self, section_id: &str) {
        self.link_containers.remove(section_id);
    }

    pub fn is_registered(&self, section_id: &str) -> bool {
        self.link_containers.contains(section_id)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggles dragging for every registered container in place.
    ///
    /// Registrations survive the toggle; there is no teardown/rebuild.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        debug!("event=reorder_toggle module=reorder enabled={enabled}");
    }

    pub fn active_drag(&self) -> Option<&DragKind> {
        self.session.as_ref()
    }

    /// Opens a drag session on one section card.
    pub fn begin_section_drag(
        &mut self,
        board: &Board,
        section_id: &str,
        from_handle: bool,
    ) -> Result<(), ReorderError> {
        self.ensure_ready()?;
        if SECTION_DRAG_PROFILE.handle_only && !from_handle {
            return Err(ReorderError::HandleRequired);
        }
        if board.section(section_id).is_none() {
            return Err(ReorderError::UnknownSection(section_id.to_string()));
        }
        self.session = Some(DragKind::Section {
            id: section_id.to_string(),
        });
        Ok(())
    }

    /// Opens a drag session on one link row.
    pub fn begin_link_drag(&mut self, board: &Board, link_id: &str) -> Result<(), ReorderError> {
        self.ensure_ready()?;
        let origin = board
            .owner_of(link_id)
            .map(|section| section.id.clone())
            .ok_or_else(|| ReorderError::UnknownLink(link_id.to_string()))?;
        if !self.is_registered(&origin) {
            return Err(ReorderError::ContainerNotRegistered(origin));
        }
        self.session = Some(DragKind::Link {
            id: link_id.to_string(),
            origin,
        });
        Ok(())
    }

    /// Answers whether the active session may drop into `target`.
    ///
    /// Same-container moves are always allowed; cross-container link moves
    /// are vetoed when the candidate container is full.
    pub fn evaluate_drop(&self, board: &Board, target: &DropTarget) -> bool {
        match (&self.session, target) {
            (Some(DragKind::Section { .. }), DropTarget::Rail) => true,
            (Some(DragKind::Link { origin, .. }), DropTarget::Links(dest)) => {
                if origin == dest {
                    return true;
                }
                !matches!(board.fill_level(dest), Some(level) if level.rejects_incoming())
            }
            _ => false,
        }
    }

    /// Commits a section drag at its final rail position.
    pub fn commit_section_drag(
        &mut self,
        board: &mut Board,
        to_index: usize,
    ) -> Result<DragOutcome, ReorderError> {
        let id = match self.session.take() {
            Some(DragKind::Section { id }) => id,
            other => {
                self.session = other;
                return Err(ReorderError::NoActiveDrag);
            }
        };

        board.move_section(&id, to_index)?;
        let ids = board.section_order();
        info!(
            "event=reorder_commit module=reorder kind=section count={}",
            ids.len()
        );
        Ok(DragOutcome::SectionOrder { ids })
    }

    /// Commits a link drag into its final container and position.
    ///
    /// Rejection by the capacity rule ends the session, leaves the board
    /// untouched, and produces no outcome to persist.
    pub fn commit_link_drag(
        &mut self,
        board: &mut Board,
        dest_section: &str,
        dest_index: usize,
    ) -> Result<DragOutcome, ReorderError> {
        let (id, origin) = match &self.session {
            Some(DragKind::Link { id, origin }) => (id.clone(), origin.clone()),
            _ => return Err(ReorderError::NoActiveDrag),
        };
        if !self.is_registered(dest_section) {
            self.session = None;
            return Err(ReorderError::ContainerNotRegistered(
                dest_section.to_string(),
            ));
        }

        let target = DropTarget::Links(dest_section.to_string());
        if !self.evaluate_drop(board, &target) {
            self.session = None;
            return Err(ReorderError::DropRejected(dest_section.to_string()));
        }

        let result = board.move_link(&id, dest_section, dest_index);
        self.session = None;
        let moved = result?;

        // Destination flags always refresh; the origin's too when the link
        // crossed containers.
        let mut fill_updates = Vec::new();
        if moved.crossed {
            if let Some(level) = board.fill_level(&origin) {
                fill_updates.push((origin, level));
            }
        }
        if let Some(level) = board.fill_level(dest_section) {
            fill_updates.push((dest_section.to_string(), level));
        }

        let link_ids = board
            .section(dest_section)
            .map(|section| section.link_order())
            .unwrap_or_default();
        info!(
            "event=reorder_commit module=reorder kind=link section={} count={} crossed={}",
            dest_section,
            link_ids.len(),
            moved.crossed
        );
        Ok(DragOutcome::LinkOrder {
            section_id: dest_section.to_string(),
            link_ids,
            fill_updates,
        })
    }

    /// Abandons the active session without touching the board.
    pub fn cancel_drag(&mut self) {
        self.session = None;
    }

    fn ensure_ready(&self) -> Result<(), ReorderError> {
        if !self.enabled {
            return Err(ReorderError::Disabled);
        }
        if self.session.is_some() {
            return Err(ReorderError::DragInProgress);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DragOutcome, DropTarget, ReorderEngine, ReorderError};
    use crate::model::board::{Board, FillLevel, Link, Section, LINK_CAPACITY};

    fn board() -> Board {
        let mut a = Section::new("a", "Alpha");
        for n in 0..3 {
            a.links.push(Link {
                id: format!("a-{n}"),
                name: format!("link {n}"),
                url: "https://example.com".to_string(),
                color: None,
            });
        }
        let mut b = Section::new("b", "Beta");
        for n in 0..LINK_CAPACITY {
            b.links.push(Link {
                id: format!("b-{n}"),
                name: format!("link {n}"),
                url: "https://example.com".to_string(),
                color: None,
            });
        }
        Board::from_sections(vec![a, b])
    }

    fn engine() -> ReorderEngine {
        let mut engine = ReorderEngine::new();
        engine.register_link_container("a");
        engine.register_link_container("b");
        engine.set_enabled(true);
        engine
    }

    #[test]
    fn disabled_engine_rejects_drag_start() {
        let mut engine = ReorderEngine::new();
        engine.register_link_container("a");
        let err = engine.begin_link_drag(&board(), "a-0").unwrap_err();
        assert_eq!(err, ReorderError::Disabled);
    }

    #[test]
    fn section_drag_requires_the_handle() {
        let mut engine = engine();
        let err = engine
            .begin_section_drag(&board(), "a", false)
            .unwrap_err();
        assert_eq!(err, ReorderError::HandleRequired);
    }

    #[test]
    fn section_commit_reports_full_rail_order() {
        let mut board = board();
        let mut engine = engine();
        engine.begin_section_drag(&board, "b", true).unwrap();
        let outcome = engine.commit_section_drag(&mut board, 0).unwrap();
        assert_eq!(
            outcome,
            DragOutcome::SectionOrder {
                ids: vec!["b".to_string(), "a".to_string()]
            }
        );
    }

    #[test]
    fn cross_drop_into_full_container_is_vetoed() {
        let board = board();
        let mut engine = engine();
        engine.begin_link_drag(&board, "a-0").unwrap();
        assert!(!engine.evaluate_drop(&board, &DropTarget::Links("b".to_string())));
        assert!(engine.evaluate_drop(&board, &DropTarget::Links("a".to_string())));
    }

    #[test]
    fn full_container_commit_rejects_without_mutation() {
        let mut board = board();
        let before = board.clone();
        let mut engine = engine();
        engine.begin_link_drag(&board, "a-0").unwrap();

        let err = engine.commit_link_drag(&mut board, "b", 0).unwrap_err();
        assert_eq!(err, ReorderError::DropRejected("b".to_string()));
        assert_eq!(board, before);
        assert!(engine.active_drag().is_none(), "session ended");
    }

    #[test]
    fn cross_commit_refreshes_both_containers() {
        let mut board = board();
        board.remove_link("b-9").unwrap();
        let mut engine = engine();

        engine.begin_link_drag(&board, "a-0").unwrap();
        let outcome = engine.commit_link_drag(&mut board, "b", 0).unwrap();
        match outcome {
            DragOutcome::LinkOrder {
                section_id,
                link_ids,
                fill_updates,
            } => {
                assert_eq!(section_id, "b");
                assert_eq!(link_ids.first().map(String::as_str), Some("a-0"));
                assert_eq!(
                    fill_updates,
                    vec![
                        ("a".to_string(), FillLevel::HasRoom),
                        ("b".to_string(), FillLevel::Full),
                    ]
                );
            }
            other => panic!("expected link order outcome, got {other:?}"),
        }
    }

    #[test]
    fn same_container_commit_refreshes_destination_only() {
        let mut board = board();
        let mut engine = engine();
        engine.begin_link_drag(&board, "b-9").unwrap();
        let outcome = engine.commit_link_drag(&mut board, "b", 0).unwrap();
        match outcome {
            DragOutcome::LinkOrder {
                link_ids,
                fill_updates,
                ..
            } => {
                assert_eq!(link_ids.first().map(String::as_str), Some("b-9"));
                assert_eq!(fill_updates, vec![("b".to_string(), FillLevel::Full)]);
            }
            other => panic!("expected link order outcome, got {other:?}"),
        }
    }

    #[test]
    fn toggle_preserves_registrations() {
        let mut engine = engine();
        engine.set_enabled(false);
        assert!(engine.is_registered("a"));
        engine.set_enabled(true);
        assert!(engine
            .begin_link_drag(&board(), "a-0")
            .is_ok());
    }
}
