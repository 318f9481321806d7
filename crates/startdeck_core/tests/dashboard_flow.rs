use startdeck_core::model::board::{Board, FillLevel, Link, Section, LINK_CAPACITY};
use startdeck_core::reorder::DropTarget;
use startdeck_core::surface::{ModalSpec, Surface, ToastTone};
use startdeck_core::sync::{
    AddLinkRequest, ItemDetail, ItemKind, SaveItemRequest, SyncBackend, SyncError, SyncResult,
};
use startdeck_core::{
    Dashboard, InputSource, ManualClock, ModalForm, PointerTarget, HOLD_DURATION_MS,
    LONG_PRESS_MS,
};
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

/// Surface double that records every patch as a compact event string.
struct RecordingSurface {
    events: Log,
    last_modal: Rc<RefCell<Option<ModalSpec>>>,
}

impl RecordingSurface {
    fn new() -> (Self, Log, Rc<RefCell<Option<ModalSpec>>>) {
        let events: Log = Rc::default();
        let last_modal = Rc::new(RefCell::new(None));
        (
            Self {
                events: events.clone(),
                last_modal: last_modal.clone(),
            },
            events,
            last_modal,
        )
    }

    fn push(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl Surface for RecordingSurface {
    fn set_edit_marker(&mut self, active: bool) {
        self.push(format!("marker:{active}"));
    }
    fn set_mode_caption(&mut self, caption: &str) {
        self.push(format!("caption:{caption}"));
    }
    fn set_drag_highlight(&mut self, active: bool) {
        self.push(format!("drag:{active}"));
    }
    fn show_toast(&mut self, message: &str, tone: ToastTone) {
        self.push(format!("toast:{tone:?}:{message}"));
    }
    fn open_modal(&mut self, spec: &ModalSpec) {
        *self.last_modal.borrow_mut() = Some(spec.clone());
        self.push(format!("modal_open:{}", spec.title));
    }
    fn close_modal(&mut self) {
        self.push("modal_close".to_string());
    }
    fn append_link(&mut self, section_id: &str, link: &Link) {
        self.push(format!("append_link:{section_id}:{}", link.id));
    }
    fn append_section(&mut self, section: &Section) {
        self.push(format!("append_section:{}", section.id));
    }
    fn remove_link(&mut self, link_id: &str) {
        self.push(format!("remove_link:{link_id}"));
    }
    fn remove_section(&mut self, section_id: &str) {
        self.push(format!("remove_section:{section_id}"));
    }
    fn update_link(&mut self, link: &Link) {
        self.push(format!("update_link:{}:{}", link.id, link.url));
    }
    fn rename_section(&mut self, section_id: &str, name: &str) {
        self.push(format!("rename_section:{section_id}:{name}"));
    }
    fn set_fill_badge(&mut self, section_id: &str, level: FillLevel) {
        self.push(format!("fill:{section_id}:{level:?}"));
    }
    fn set_board_empty(&mut self, empty: bool) {
        self.push(format!("board_empty:{empty}"));
    }
    fn open_url(&mut self, url: &str) {
        self.push(format!("open:{url}"));
    }
}

/// Backend double with scripted failures and recorded calls.
#[derive(Default)]
struct ScriptedBackend {
    calls: Log,
    fail_save: bool,
    fail_delete: bool,
    reject_add_link: Option<String>,
}

impl ScriptedBackend {
    fn new() -> (Self, Log) {
        let calls: Log = Rc::default();
        (
            Self {
                calls: calls.clone(),
                ..Self::default()
            },
            calls,
        )
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl SyncBackend for ScriptedBackend {
    fn reorder_sections(&self, ids: &[String]) -> SyncResult<()> {
        self.record(format!("reorder_sections:{}", ids.join(",")));
        Ok(())
    }

    fn reorder_links(&self, section_id: &str, link_ids: &[String]) -> SyncResult<()> {
        self.record(format!("reorder_links:{section_id}:{}", link_ids.join(",")));
        Ok(())
    }

    fn get_item(&self, kind: ItemKind, id: &str) -> SyncResult<ItemDetail> {
        self.record(format!("get_item:{}:{id}", kind.as_str()));
        Ok(ItemDetail {
            id: id.to_string(),
            kind,
            name: "Stored name".to_string(),
            url: match kind {
                ItemKind::Link => Some("https://stored.example.com".to_string()),
                ItemKind::Section => None,
            },
            color: None,
        })
    }

    fn save_item(&self, request: &SaveItemRequest) -> SyncResult<()> {
        self.record(format!("save_item:{}:{}", request.kind.as_str(), request.id));
        if self.fail_save {
            return Err(SyncError::Rejected { message: None });
        }
        Ok(())
    }

    fn add_link(&self, request: &AddLinkRequest) -> SyncResult<Link> {
        self.record(format!("add_link:{}:{}", request.section_id, request.url));
        if let Some(message) = &self.reject_add_link {
            return Err(SyncError::Rejected {
                message: Some(message.clone()),
            });
        }
        Ok(Link {
            id: "L100".to_string(),
            name: request.name.clone(),
            url: request.url.clone(),
            color: request.color.clone(),
        })
    }

    fn add_section(&self, name: &str) -> SyncResult<Section> {
        self.record(format!("add_section:{name}"));
        Ok(Section::new("7", name))
    }

    fn delete_item(&self, kind: ItemKind, id: &str) -> SyncResult<()> {
        self.record(format!("delete_item:{}:{id}", kind.as_str()));
        if self.fail_delete {
            return Err(SyncError::Network("connection reset".to_string()));
        }
        Ok(())
    }

    fn update_theme(&self, theme_id: &str) -> SyncResult<()> {
        self.record(format!("update_theme:{theme_id}"));
        Ok(())
    }
}

fn link(id: &str) -> Link {
    Link {
        id: id.to_string(),
        name: format!("link {id}"),
        url: format!("https://example.com/{id}"),
        color: None,
    }
}

fn two_section_board() -> Board {
    let mut a = Section::new("A", "Alpha");
    a.links.push(link("L1"));
    a.links.push(link("L2"));
    let mut b = Section::new("B", "Beta");
    for n in 0..LINK_CAPACITY {
        b.links.push(link(&format!("B{n}")));
    }
    Board::from_sections(vec![a, b])
}

struct Fixture {
    dashboard: Dashboard<RecordingSurface, ScriptedBackend, ManualClock>,
    clock: ManualClock,
    events: Log,
    calls: Log,
    last_modal: Rc<RefCell<Option<ModalSpec>>>,
}

fn fixture_with(board: Board, configure: impl FnOnce(&mut ScriptedBackend)) -> Fixture {
    let (surface, events, last_modal) = RecordingSurface::new();
    let (mut backend, calls) = ScriptedBackend::new();
    configure(&mut backend);
    let clock = ManualClock::new();
    let dashboard = Dashboard::new(board, surface, backend, clock.clone());
    Fixture {
        dashboard,
        clock,
        events,
        calls,
        last_modal,
    }
}

fn fixture(board: Board) -> Fixture {
    fixture_with(board, |_| {})
}

impl Fixture {
    /// Drives a long-press on `target` until edit mode engages, including
    /// the synthetic click the browser emits on release.
    fn long_press(&mut self, target: &PointerTarget) {
        self.dashboard.pointer_down(target, InputSource::Mouse);
        self.clock.advance_ms(LONG_PRESS_MS);
        self.dashboard.tick();
        self.dashboard.pointer_up(InputSource::Mouse);
        self.dashboard.click(target);
    }

    /// Performs a short press-then-click on `target`.
    fn tap(&mut self, target: &PointerTarget) {
        self.dashboard.pointer_down(target, InputSource::Mouse);
        self.clock.advance_ms(50);
        self.dashboard.pointer_up(InputSource::Mouse);
        self.dashboard.click(target);
    }

    fn saw(&self, event: &str) -> bool {
        self.events.borrow().iter().any(|e| e == event)
    }

    fn called(&self, call: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == call)
    }

    fn clear(&self) {
        self.events.borrow_mut().clear();
        self.calls.borrow_mut().clear();
    }
}

#[test]
fn long_press_enters_edit_mode_and_swallows_the_synthetic_click() {
    let mut fx = fixture(two_section_board());
    let section = PointerTarget::Section("A".to_string());

    fx.dashboard.pointer_down(&section, InputSource::Mouse);
    fx.clock.advance_ms(LONG_PRESS_MS);
    fx.dashboard.tick();
    fx.dashboard.pointer_up(InputSource::Mouse);
    assert!(fx.dashboard.is_edit_mode());
    assert!(fx.saw("marker:true"));
    assert!(fx.saw("caption:Edit Mode Active"));

    // The browser's synthetic click lands right after release; it must not
    // open an editor.
    fx.dashboard.click(&section);
    assert!(!fx.called("get_item:section:A"));
    assert!(fx.last_modal.borrow().is_none());

    // The next real tap does open the editor.
    fx.tap(&section);
    assert!(fx.called("get_item:section:A"));
    assert!(fx.saw("modal_open:Edit Section"));
}

#[test]
fn background_tap_leaves_edit_mode_and_disables_dragging() {
    let mut fx = fixture(two_section_board());
    fx.long_press(&PointerTarget::Link("L1".to_string()));
    assert!(fx.dashboard.is_edit_mode());

    fx.tap(&PointerTarget::Background);
    assert!(!fx.dashboard.is_edit_mode());
    assert!(fx.saw("marker:false"));
    assert!(fx.saw("caption:Hold any item to Edit"));
    assert!(fx.dashboard.begin_link_drag("L1").is_err());
}

#[test]
fn clicks_inside_the_modal_do_not_leave_edit_mode() {
    let mut fx = fixture(two_section_board());
    fx.long_press(&PointerTarget::Section("A".to_string()));
    fx.tap(&PointerTarget::ModalCard);
    fx.tap(&PointerTarget::Control);
    assert!(fx.dashboard.is_edit_mode());
}

#[test]
fn add_section_creates_container_and_activates_edit_mode() {
    let mut fx = fixture(Board::new());
    assert!(fx.saw("board_empty:true"));

    fx.dashboard.click(&PointerTarget::AddSection);
    assert!(fx.saw("modal_open:Add New Section"));
    assert!(fx.dashboard.is_edit_mode());

    fx.dashboard.submit_modal(&ModalForm {
        name: "Work".to_string(),
        ..ModalForm::default()
    });

    assert!(fx.called("add_section:Work"));
    assert!(fx.saw("append_section:7"));
    assert!(fx.saw("board_empty:false"));
    assert!(fx.saw("toast:Success:Section created"));
    assert_eq!(fx.dashboard.board().section_order(), vec!["7"]);
    assert!(fx.dashboard.is_edit_mode());

    // The fresh container is registered for dragging straight away.
    assert!(fx.dashboard.begin_section_drag("7", true).is_ok());
}

#[test]
fn new_link_url_is_scheme_qualified_before_submission() {
    let mut fx = fixture(two_section_board());
    fx.dashboard.click(&PointerTarget::AddLink("A".to_string()));
    assert!(fx.saw("modal_open:Add New Link"));

    fx.dashboard.submit_modal(&ModalForm {
        name: "Docs".to_string(),
        url: "example.com".to_string(),
        color: String::new(),
    });

    assert!(fx.called("add_link:A:https://example.com"));
    assert!(fx.saw("append_link:A:L100"));
    assert!(fx.saw("fill:A:HasRoom"));
    assert!(fx.saw("toast:Success:Link added"));
}

#[test]
fn rejected_add_link_surfaces_the_server_message() {
    let mut fx = fixture_with(two_section_board(), |backend| {
        backend.reject_add_link = Some("Max 10 links per section allowed.".to_string());
    });
    fx.dashboard.click(&PointerTarget::AddLink("B".to_string()));
    fx.dashboard.submit_modal(&ModalForm {
        name: "Extra".to_string(),
        url: "extra.example.com".to_string(),
        color: String::new(),
    });

    assert!(fx.saw("toast:Error:Max 10 links per section allowed."));
    assert!(fx.dashboard.edit_session().is_some(), "modal stays open");
}

#[test]
fn section_drop_pushes_the_full_rail_order() {
    let mut fx = fixture(two_section_board());
    fx.long_press(&PointerTarget::Section("A".to_string()));

    fx.dashboard.begin_section_drag("B", true).unwrap();
    fx.dashboard.drop_section(0);

    assert!(fx.called("reorder_sections:B,A"));
    assert_eq!(fx.dashboard.board().section_order(), vec!["B", "A"]);
    assert!(fx.saw("drag:true"));
    assert!(fx.saw("drag:false"));
}

#[test]
fn drop_into_full_section_is_rejected_with_no_network_call() {
    let mut fx = fixture(two_section_board());
    fx.long_press(&PointerTarget::Link("L1".to_string()));

    fx.dashboard.begin_link_drag("L1").unwrap();
    assert!(!fx.dashboard.can_drop(&DropTarget::Links("B".to_string())));
    fx.dashboard.drop_link("B", 0);

    let board = fx.dashboard.board();
    assert_eq!(board.section("A").unwrap().link_order(), vec!["L1", "L2"]);
    assert_eq!(board.section("B").unwrap().links.len(), LINK_CAPACITY);
    assert!(!fx.calls.borrow().iter().any(|c| c.starts_with("reorder_links")));
}

#[test]
fn cross_drop_refreshes_both_fill_badges_and_pushes_destination_order() {
    let mut board = two_section_board();
    board.remove_link("B9").unwrap();
    let mut fx = fixture(board);
    fx.long_press(&PointerTarget::Link("L1".to_string()));
    fx.clear();

    fx.dashboard.begin_link_drag("L1").unwrap();
    fx.dashboard.drop_link("B", 0);

    assert!(fx.saw("fill:A:HasRoom"));
    assert!(fx.saw("fill:B:Full"));
    assert!(fx.called("reorder_links:B:L1,B0,B1,B2,B3,B4,B5,B6,B7,B8"));
}

#[test]
fn failed_save_keeps_the_modal_open_for_retry() {
    let mut fx = fixture_with(two_section_board(), |backend| {
        backend.fail_save = true;
    });
    fx.long_press(&PointerTarget::Link("L1".to_string()));
    fx.tap(&PointerTarget::Link("L1".to_string()));
    assert!(fx.saw("modal_open:Edit Link"));

    fx.dashboard.submit_modal(&ModalForm {
        name: "Renamed".to_string(),
        url: "https://example.com/L1".to_string(),
        color: String::new(),
    });

    assert!(fx.saw("toast:Error:Error saving item"));
    assert!(fx.dashboard.edit_session().is_some());
    assert!(!fx.saw("modal_close"));
}

#[test]
fn hold_released_early_never_deletes() {
    let mut fx = fixture(two_section_board());
    fx.long_press(&PointerTarget::Link("L1".to_string()));
    fx.tap(&PointerTarget::Link("L1".to_string()));

    fx.dashboard.delete_press_start(true);
    fx.clock.advance_ms(HOLD_DURATION_MS - 1);
    fx.dashboard.tick();
    fx.dashboard.delete_press_release();

    assert!(!fx.called("delete_item:link:L1"));
    assert!(fx.dashboard.edit_session().is_some());
}

#[test]
fn completed_hold_deletes_patches_the_surface_and_exits_edit_mode() {
    let mut fx = fixture(two_section_board());
    fx.long_press(&PointerTarget::Link("L1".to_string()));
    fx.tap(&PointerTarget::Link("L1".to_string()));

    fx.dashboard.delete_press_start(true);
    fx.clock.advance_ms(HOLD_DURATION_MS);
    fx.dashboard.tick();
    assert_eq!(fx.dashboard.hold_caption(), "Delete!");
    fx.dashboard.delete_press_release();

    assert!(fx.called("delete_item:link:L1"));
    assert!(fx.saw("remove_link:L1"));
    assert!(fx.saw("toast:Success:Deleted"));
    assert!(fx.dashboard.edit_session().is_none());
    assert!(!fx.dashboard.is_edit_mode());
    assert!(fx.dashboard.board().link("L1").is_none());
}

#[test]
fn failed_delete_keeps_the_page_usable() {
    let mut fx = fixture_with(two_section_board(), |backend| {
        backend.fail_delete = true;
    });
    fx.long_press(&PointerTarget::Section("A".to_string()));
    fx.tap(&PointerTarget::Section("A".to_string()));

    fx.dashboard.delete_press_start(true);
    fx.clock.advance_ms(HOLD_DURATION_MS);
    fx.dashboard.tick();
    fx.dashboard.delete_press_release();

    assert!(fx.saw("toast:Error:Network error"));
    assert!(fx.dashboard.edit_session().is_some(), "modal stays open");
    assert_eq!(fx.dashboard.hold_caption(), "Delete", "control reset");
    assert!(fx.dashboard.board().section("A").is_some());
}

#[test]
fn open_section_links_opens_every_url() {
    let mut fx = fixture(two_section_board());
    fx.dashboard.open_section_links("A");
    assert!(fx.saw("open:https://example.com/L1"));
    assert!(fx.saw("open:https://example.com/L2"));
}

#[test]
fn theme_save_reports_success() {
    let mut fx = fixture(two_section_board());
    fx.dashboard.save_theme("ocean");
    assert!(fx.called("update_theme:ocean"));
    assert!(fx.saw("toast:Success:Theme updated successfully!"));
}
