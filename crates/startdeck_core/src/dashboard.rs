//! Page facade: routes pointer events into mode changes, drag sessions, and
//! CRUD flows.
//!
//! # Responsibility
//! - Own the board, the gesture machines, the edit-mode flag, the reorder
//!   engine, and the transient edit session.
//! - Patch the surface optimistically and push mutations through the
//!   backend seam.
//!
//! # Invariants
//! - Order pushes are fire-and-forget: the surface is never rolled back on
//!   failure, only a non-blocking notification is raised.
//! - The edit modal stays open when a save fails so the user can retry.
//! - A destructive action only runs off a completed hold-to-confirm.

use crate::clock::Clock;
use crate::editmode::EditModeController;
use crate::gesture::hold::{HoldRelease, HoldToConfirm};
use crate::gesture::press::{ClickDisposition, GestureClassifier, InputSource, PointerTarget};
use crate::model::board::{Board, Link, LinkId, SectionId};
use crate::reorder::{DragOutcome, DropTarget, ReorderEngine, ReorderError};
use crate::session::normalize_hex_color;
use crate::surface::{ModalSpec, Surface, ToastTone};
use crate::sync::{AddLinkRequest, ItemKind, SaveItemRequest, SyncBackend, SyncError};
use log::{error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

static URL_SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("valid url scheme regex"));

/// Prefixes `https://` onto URLs submitted without an explicit scheme.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() || URL_SCHEME_RE.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// What the open modal is editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Section(SectionId),
    Link(LinkId),
    NewSection,
    NewLink(SectionId),
}

/// Transient modal state; created on gesture/add trigger, destroyed on
/// save, cancel, or completed delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub target: EditTarget,
}

/// Raw field values submitted from the modal form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalForm {
    pub name: String,
    pub url: String,
    pub color: String,
}

/// The interactive startpage.
pub struct Dashboard<S: Surface, B: SyncBackend, C: Clock> {
    board: Board,
    surface: S,
    backend: B,
    gestures: GestureClassifier<C>,
    hold: HoldToConfirm<C>,
    edit_mode: EditModeController,
    engine: ReorderEngine,
    session: Option<EditSession>,
}

impl<S: Surface, B: SyncBackend, C: Clock + Clone> Dashboard<S, B, C> {
    /// Wires the page up from its initially rendered board.
    pub fn new(board: Board, surface: S, backend: B, clock: C) -> Self {
        let mut dashboard = Self {
            gestures: GestureClassifier::new(clock.clone()),
            hold: HoldToConfirm::new(clock),
            edit_mode: EditModeController::new(),
            engine: ReorderEngine::new(),
            session: None,
            board,
            surface,
            backend,
        };
        for id in dashboard.board.section_order() {
            dashboard.engine.register_link_container(id);
        }
        dashboard.refresh_all_badges();
        dashboard
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode.is_edit()
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Caption for the hold-to-delete control in its current phase.
    pub fn hold_caption(&self) -> &'static str {
        self.hold.caption()
    }

    /// Fill progress of the hold-to-delete control, `[0, 1]`.
    pub fn hold_progress(&self) -> f32 {
        self.hold.progress()
    }

    // --- pointer stream -----------------------------------------------------

    pub fn pointer_down(&mut self, target: &PointerTarget, source: InputSource) {
        let arm = !self.edit_mode.is_edit();
        self.gestures.press_down(target, source, arm);
    }

    pub fn pointer_up(&mut self, source: InputSource) {
        self.gestures.press_up(source);
    }

    pub fn pointer_leave(&mut self) {
        self.gestures.pointer_leave();
    }

    pub fn touch_move(&mut self) {
        self.gestures.touch_move();
    }

    /// Drives pending gesture deadlines; call once per host frame.
    pub fn tick(&mut self) {
        if self.gestures.poll().is_some() {
            self.enter_edit_mode();
        }
        // Confirmation is reflected through `hold_caption`/`hold_progress`.
        self.hold.poll();
    }

    /// Routes one click event from the interactive surface.
    pub fn click(&mut self, target: &PointerTarget) {
        let disposition = self.gestures.observe_click();
        if disposition == ClickDisposition::Suppressed {
            return;
        }

        // Add affordances respond to plain clicks in either mode.
        match target {
            PointerTarget::AddLink(section_id) => {
                let section_id = section_id.clone();
                self.open_add_link_modal(section_id);
                return;
            }
            PointerTarget::AddSection => {
                self.open_add_section_modal();
                return;
            }
            _ => {}
        }

        if !self.edit_mode.is_edit() || disposition == ClickDisposition::Slow {
            return;
        }

        match target {
            PointerTarget::Link(id) => {
                let id = id.clone();
                self.open_edit_modal(ItemKind::Link, &id);
            }
            PointerTarget::Section(id) => {
                let id = id.clone();
                self.open_edit_modal(ItemKind::Section, &id);
            }
            PointerTarget::Background => self.leave_edit_mode(),
            // Clicks inside the modal or on other controls change nothing.
            _ => {}
        }
    }

    // --- drag sessions ------------------------------------------------------

    pub fn begin_section_drag(
        &mut self,
        section_id: &str,
        from_handle: bool,
    ) -> Result<(), ReorderError> {
        self.engine
            .begin_section_drag(&self.board, section_id, from_handle)?;
        self.surface.set_drag_highlight(true);
        Ok(())
    }

    pub fn begin_link_drag(&mut self, link_id: &str) -> Result<(), ReorderError> {
        self.engine.begin_link_drag(&self.board, link_id)?;
        self.surface.set_drag_highlight(true);
        Ok(())
    }

    /// Answers the host's mid-drag question: may the active item land here?
    pub fn can_drop(&self, target: &DropTarget) -> bool {
        self.engine.evaluate_drop(&self.board, target)
    }

    /// Completes a section drag and pushes the new rail order.
    pub fn drop_section(&mut self, to_index: usize) {
        self.surface.set_drag_highlight(false);
        match self.engine.commit_section_drag(&mut self.board, to_index) {
            Ok(DragOutcome::SectionOrder { ids }) => {
                // Fire-and-forget: a failed push is logged, never rolled back.
                if let Err(err) = self.backend.reorder_sections(&ids) {
                    warn!("event=reorder_push_failed module=dashboard kind=section err={err}");
                }
            }
            Ok(_) => {}
            Err(err) => warn!("event=drag_abandoned module=dashboard kind=section err={err}"),
        }
    }

    /// Completes a link drag, refreshes fill badges, pushes the new order.
    pub fn drop_link(&mut self, dest_section: &str, dest_index: usize) {
        self.surface.set_drag_highlight(false);
        match self
            .engine
            .commit_link_drag(&mut self.board, dest_section, dest_index)
        {
            Ok(DragOutcome::LinkOrder {
                section_id,
                link_ids,
                fill_updates,
            }) => {
                for (id, level) in &fill_updates {
                    self.surface.set_fill_badge(id, *level);
                }
                if let Err(err) = self.backend.reorder_links(&section_id, &link_ids) {
                    warn!("event=reorder_push_failed module=dashboard kind=link err={err}");
                    let message = err.user_message("Error saving link order");
                    self.surface.show_toast(&message, ToastTone::Error);
                }
            }
            Ok(_) => {}
            Err(err) => warn!("event=drag_abandoned module=dashboard kind=link err={err}"),
        }
    }

    pub fn cancel_drag(&mut self) {
        self.engine.cancel_drag();
        self.surface.set_drag_highlight(false);
    }

    // --- modal flows --------------------------------------------------------

    /// Opens the edit modal for an existing item, populated from the backend.
    pub fn open_edit_modal(&mut self, kind: ItemKind, id: &str) {
        let detail = match self.backend.get_item(kind, id) {
            Ok(detail) => detail,
            Err(err) => {
                error!("event=get_item_failed module=dashboard kind={} err={err}", kind.as_str());
                return;
            }
        };

        let (target, spec) = match kind {
            ItemKind::Section => (
                EditTarget::Section(id.to_string()),
                ModalSpec {
                    title: "Edit Section",
                    name: detail.name,
                    url: None,
                    color: None,
                    allow_delete: true,
                },
            ),
            ItemKind::Link => (
                EditTarget::Link(id.to_string()),
                ModalSpec {
                    title: "Edit Link",
                    name: detail.name,
                    url: Some(detail.url.unwrap_or_default()),
                    color: detail.color,
                    allow_delete: true,
                },
            ),
        };
        self.session = Some(EditSession { target });
        self.surface.open_modal(&spec);
    }

    /// Opens the add-link modal; the page enters edit mode if it wasn't.
    pub fn open_add_link_modal(&mut self, section_id: SectionId) {
        self.session = Some(EditSession {
            target: EditTarget::NewLink(section_id),
        });
        self.surface.open_modal(&ModalSpec {
            title: "Add New Link",
            name: String::new(),
            url: Some(String::new()),
            color: Some(String::new()),
            allow_delete: false,
        });
        self.enter_edit_mode();
    }

    /// Opens the add-section modal; the page enters edit mode if it wasn't.
    pub fn open_add_section_modal(&mut self) {
        self.session = Some(EditSession {
            target: EditTarget::NewSection,
        });
        self.surface.open_modal(&ModalSpec {
            title: "Add New Section",
            name: String::new(),
            url: None,
            color: None,
            allow_delete: false,
        });
        self.enter_edit_mode();
    }

    /// Submits the modal form for whatever the session is editing.
    pub fn submit_modal(&mut self, form: &ModalForm) {
        let target = match &self.session {
            Some(session) => session.target.clone(),
            None => return,
        };
        match target {
            EditTarget::NewLink(section_id) => self.create_link(section_id, form),
            EditTarget::NewSection => self.create_section(form),
            EditTarget::Link(id) => self.save_link(id, form),
            EditTarget::Section(id) => self.save_section(id, form),
        }
    }

    /// Dismisses the modal without saving.
    pub fn modal_cancelled(&mut self) {
        self.session = None;
        self.hold.cancel();
        self.surface.close_modal();
    }

    // --- hold-to-delete -----------------------------------------------------

    pub fn delete_press_start(&mut self, primary: bool) {
        if self.session.is_none() {
            return;
        }
        self.hold.press_start(primary);
    }

    pub fn delete_pointer_leave(&mut self) {
        self.hold.cancel();
    }

    /// Releases the delete control; fires the delete only after a full hold.
    pub fn delete_press_release(&mut self) {
        if self.hold.release() == HoldRelease::Confirmed {
            self.execute_delete();
        }
    }

    // --- supplements --------------------------------------------------------

    /// Opens every link of one section through the surface.
    pub fn open_section_links(&mut self, section_id: &str) {
        let urls: Vec<String> = match self.board.section(section_id) {
            Some(section) => section.links.iter().map(|link| link.url.clone()).collect(),
            None => return,
        };
        for url in urls {
            self.surface.open_url(&url);
        }
    }

    /// Persists the selected theme with toast feedback.
    pub fn save_theme(&mut self, theme_id: &str) {
        match self.backend.update_theme(theme_id) {
            Ok(()) => self
                .surface
                .show_toast("Theme updated successfully!", ToastTone::Success),
            Err(err @ SyncError::Rejected { .. }) => {
                let message = err.user_message("Failed to update theme.");
                self.surface.show_toast(&message, ToastTone::Error);
            }
            Err(_) => self
                .surface
                .show_toast("Could not save theme preference.", ToastTone::Error),
        }
    }

    // --- internals ----------------------------------------------------------

    fn enter_edit_mode(&mut self) {
        if self.edit_mode.enter() {
            self.engine.set_enabled(true);
            self.surface.set_edit_marker(true);
            self.surface.set_mode_caption(self.edit_mode.mode().caption());
            info!("event=edit_mode module=dashboard active=true");
        }
    }

    fn leave_edit_mode(&mut self) {
        if self.edit_mode.exit() {
            self.engine.set_enabled(false);
            self.surface.set_edit_marker(false);
            self.surface.set_mode_caption(self.edit_mode.mode().caption());
            info!("event=edit_mode module=dashboard active=false");
        }
    }

    fn create_link(&mut self, section_id: SectionId, form: &ModalForm) {
        let request = AddLinkRequest {
            section_id: section_id.clone(),
            name: form.name.clone(),
            url: normalize_url(&form.url),
            color: normalize_hex_color(&form.color),
        };
        match self.backend.add_link(&request) {
            Ok(link) => {
                self.close_session();
                if let Err(err) = self.board.append_link(&section_id, link.clone()) {
                    error!("event=board_patch_failed module=dashboard err={err}");
                    return;
                }
                self.surface.append_link(&section_id, &link);
                self.refresh_badge(&section_id);
                self.surface.show_toast("Link added", ToastTone::Success);
            }
            Err(err) => {
                let message = err.user_message("Error adding link");
                self.surface.show_toast(&message, ToastTone::Error);
            }
        }
    }

    fn create_section(&mut self, form: &ModalForm) {
        match self.backend.add_section(&form.name) {
            Ok(section) => {
                self.close_session();
                self.engine.register_link_container(section.id.clone());
                self.board.push_section(section.clone());
                self.surface.append_section(&section);
                self.refresh_badge(&section.id);
                self.surface.set_board_empty(false);
                self.surface
                    .show_toast("Section created", ToastTone::Success);
            }
            Err(err) => {
                let message = err.user_message("Error adding section");
                self.surface.show_toast(&message, ToastTone::Error);
            }
        }
    }

    fn save_link(&mut self, id: LinkId, form: &ModalForm) {
        let url = normalize_url(&form.url);
        let color = normalize_hex_color(&form.color);
        let request = SaveItemRequest {
            id: id.clone(),
            kind: ItemKind::Link,
            name: form.name.clone(),
            url: Some(url.clone()),
            color: color.clone(),
        };
        match self.backend.save_item(&request) {
            Ok(()) => {
                self.close_session();
                if let Err(err) = self
                    .board
                    .update_link(&id, &form.name, &url, color.as_deref())
                {
                    error!("event=board_patch_failed module=dashboard err={err}");
                    return;
                }
                let link = Link {
                    id,
                    name: form.name.clone(),
                    url,
                    color,
                };
                self.surface.update_link(&link);
                self.surface.show_toast("Saved", ToastTone::Success);
            }
            // The modal stays open so the user can retry.
            Err(err) => {
                let message = err.user_message("Error saving item");
                self.surface.show_toast(&message, ToastTone::Error);
            }
        }
    }

    fn save_section(&mut self, id: SectionId, form: &ModalForm) {
        let request = SaveItemRequest {
            id: id.clone(),
            kind: ItemKind::Section,
            name: form.name.clone(),
            url: None,
            color: None,
        };
        match self.backend.save_item(&request) {
            Ok(()) => {
                self.close_session();
                if let Err(err) = self.board.rename_section(&id, &form.name) {
                    error!("event=board_patch_failed module=dashboard err={err}");
                    return;
                }
                self.surface.rename_section(&id, &form.name);
                self.surface.show_toast("Saved", ToastTone::Success);
            }
            Err(err) => {
                let message = err.user_message("Error saving item");
                self.surface.show_toast(&message, ToastTone::Error);
            }
        }
    }

    fn execute_delete(&mut self) {
        let target = match &self.session {
            Some(session) => session.target.clone(),
            None => return,
        };
        let (kind, id) = match target {
            EditTarget::Section(id) => (ItemKind::Section, id),
            EditTarget::Link(id) => (ItemKind::Link, id),
            // Add modals carry no delete control.
            _ => return,
        };

        match self.backend.delete_item(kind, &id) {
            Ok(()) => {
                self.close_session();
                match kind {
                    ItemKind::Section => {
                        if self.board.remove_section(&id).is_ok() {
                            self.engine.unregister_link_container(&id);
                            self.surface.remove_section(&id);
                            self.surface.set_board_empty(self.board.is_empty());
                        }
                    }
                    ItemKind::Link => {
                        if let Ok((_, owner)) = self.board.remove_link(&id) {
                            self.surface.remove_link(&id);
                            self.refresh_badge(&owner);
                        }
                    }
                }
                self.surface.show_toast("Deleted", ToastTone::Success);
                self.leave_edit_mode();
            }
            Err(err) => {
                // Hold control already reset on release; keep the modal open.
                let message = err.user_message("Error deleting item");
                self.surface.show_toast(&message, ToastTone::Error);
            }
        }
    }

    fn close_session(&mut self) {
        self.session = None;
        self.surface.close_modal();
    }

    fn refresh_badge(&mut self, section_id: &str) {
        if let Some(level) = self.board.fill_level(section_id) {
            self.surface.set_fill_badge(section_id, level);
        }
    }

    fn refresh_all_badges(&mut self) {
        for id in self.board.section_order() {
            self.refresh_badge(&id);
        }
        self.surface.set_board_empty(self.board.is_empty());
    }
}
