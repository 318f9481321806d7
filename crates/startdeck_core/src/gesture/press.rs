//! Tap / long-press disambiguation over the shared pointer stream.
//!
//! # Responsibility
//! - Arm and fire the long-press deadline for draggable targets.
//! - Swallow the synthetic click a browser emits after a long-press release.
//! - Classify ordinary clicks into tap vs. slow press at click time.
//!
//! # Invariants
//! - At most one long-press deadline is live; arming always clears the
//!   previous one first.
//! - The suppression flag is consumed by exactly one click.
//! - A mouse press arriving in the shadow of touch activity never arms or
//!   restarts the deadline.

use crate::clock::Clock;
use crate::model::board::{LinkId, SectionId};
use log::debug;
use std::time::{Duration, Instant};

/// Hold duration before a press becomes a long-press.
pub const LONG_PRESS_MS: u64 = 800;

/// Maximum press duration still classified as a tap.
pub const TAP_MAX_MS: u64 = 200;

/// Window after touch activity in which mouse presses are treated as
/// synthesized duplicates of the touch event family.
pub const SYNTHETIC_MOUSE_WINDOW_MS: u64 = 500;

/// Which event family produced a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Mouse,
    Touch,
}

/// Logical element under the pointer, resolved by the host surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// A draggable section card (or its header).
    Section(SectionId),
    /// A draggable link row.
    Link(LinkId),
    /// The per-section add-link affordance.
    AddLink(SectionId),
    /// The add-section affordance on the rail.
    AddSection,
    /// Inside the edit modal card.
    ModalCard,
    /// The modal backdrop outside the card.
    ModalBackdrop,
    /// Any other button-like control.
    Control,
    /// Bare page background.
    Background,
}

impl PointerTarget {
    /// Returns whether a long-press on this target may enter edit mode.
    pub fn is_draggable(&self) -> bool {
        matches!(self, Self::Section(_) | Self::Link(_))
    }
}

/// Signal produced when a pending long-press deadline elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongPress {
    pub target: PointerTarget,
}

/// Classification of one click event at the time it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDisposition {
    /// Synthetic click after a fired long-press; must be ignored entirely.
    Suppressed,
    /// Press lasted longer than the tap window; not a tap.
    Slow,
    /// Qualifying short click.
    Tap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PressPhase {
    Idle,
    Pending {
        target: PointerTarget,
        source: InputSource,
        deadline: Instant,
    },
    Fired,
}

/// Gesture disambiguation state machine.
///
/// The host forwards raw pointer events and polls on its frame tick; the
/// classifier owns the single live deadline and the one-shot click
/// suppression flag.
pub struct GestureClassifier<C: Clock> {
    clock: C,
    phase: PressPhase,
    press_started_at: Option<Instant>,
    suppress_next_click: bool,
    last_touch_activity: Option<Instant>,
}

impl<C: Clock> GestureClassifier<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            phase: PressPhase::Idle,
            press_started_at: None,
            suppress_next_click: false,
            last_touch_activity: None,
        }
    }

    /// Records a press start and arms the long-press deadline when allowed.
    ///
    /// `arm` is false while edit mode is already active: the press still
    /// counts for tap timing, but no deadline is armed.
    pub fn press_down(&mut self, target: &PointerTarget, source: InputSource, arm: bool) {
        let now = self.clock.now();

        if source == InputSource::Mouse && self.mouse_is_shadowed(now) {
            debug!("event=press_ignored module=gesture reason=synthesized_mouse");
            return;
        }
        if source == InputSource::Touch {
            self.last_touch_activity = Some(now);
        }

        // One live deadline: clear whatever was pending before arming.
        self.phase = PressPhase::Idle;
        self.press_started_at = Some(now);

        if arm && target.is_draggable() {
            self.phase = PressPhase::Pending {
                target: target.clone(),
                source,
                deadline: now + Duration::from_millis(LONG_PRESS_MS),
            };
        }
    }

    /// Cancels the pending deadline on press release.
    pub fn press_up(&mut self, source: InputSource) {
        if source == InputSource::Touch {
            self.last_touch_activity = Some(self.clock.now());
        }
        self.cancel_pending();
    }

    /// Cancels the pending deadline when the pointer leaves the surface.
    pub fn pointer_leave(&mut self) {
        self.cancel_pending();
    }

    /// Cancels the pending deadline on touch scroll/drag movement.
    pub fn touch_move(&mut self) {
        self.last_touch_activity = Some(self.clock.now());
        self.cancel_pending();
    }

    /// Fires the long-press when its deadline has elapsed.
    ///
    /// A poll with no pending deadline is a no-op, so a deadline cleared by
    /// any cancellation path can never fire late.
    pub fn poll(&mut self) -> Option<LongPress> {
        let now = self.clock.now();
        let fired = match &self.phase {
            PressPhase::Pending { target, deadline, .. } if now >= *deadline => {
                Some(LongPress {
                    target: target.clone(),
                })
            }
            _ => None,
        };

        if let Some(long_press) = fired {
            self.phase = PressPhase::Fired;
            self.suppress_next_click = true;
            debug!("event=long_press module=gesture target={:?}", long_press.target);
            return Some(long_press);
        }
        None
    }

    /// Classifies one click event, consuming the suppression flag if set.
    pub fn observe_click(&mut self) -> ClickDisposition {
        if self.suppress_next_click {
            self.suppress_next_click = false;
            debug!("event=click_suppressed module=gesture");
            return ClickDisposition::Suppressed;
        }

        let now = self.clock.now();
        match self.press_started_at {
            Some(started) if now - started <= Duration::from_millis(TAP_MAX_MS) => {
                ClickDisposition::Tap
            }
            _ => ClickDisposition::Slow,
        }
    }

    fn cancel_pending(&mut self) {
        self.phase = PressPhase::Idle;
    }

    fn mouse_is_shadowed(&self, now: Instant) -> bool {
        if let PressPhase::Pending { source, .. } = &self.phase {
            if *source == InputSource::Touch {
                return true;
            }
        }
        match self.last_touch_activity {
            Some(at) => now - at <= Duration::from_millis(SYNTHETIC_MOUSE_WINDOW_MS),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ClickDisposition, GestureClassifier, InputSource, PointerTarget, LONG_PRESS_MS,
        SYNTHETIC_MOUSE_WINDOW_MS,
    };
    use crate::clock::ManualClock;

    fn classifier() -> (ManualClock, GestureClassifier<ManualClock>) {
        let clock = ManualClock::new();
        (clock.clone(), GestureClassifier::new(clock))
    }

    fn section_target() -> PointerTarget {
        PointerTarget::Section("s1".to_string())
    }

    #[test]
    fn long_press_fires_only_at_threshold() {
        let (clock, mut gestures) = classifier();
        gestures.press_down(&section_target(), InputSource::Mouse, true);

        clock.advance_ms(LONG_PRESS_MS - 1);
        assert!(gestures.poll().is_none());

        clock.advance_ms(1);
        let fired = gestures.poll().expect("deadline elapsed");
        assert_eq!(fired.target, section_target());
        assert!(gestures.poll().is_none(), "fires once per press");
    }

    #[test]
    fn release_before_threshold_cancels() {
        let (clock, mut gestures) = classifier();
        gestures.press_down(&section_target(), InputSource::Mouse, true);
        clock.advance_ms(LONG_PRESS_MS - 1);
        gestures.press_up(InputSource::Mouse);
        clock.advance_ms(10);
        assert!(gestures.poll().is_none());
    }

    #[test]
    fn suppression_swallows_exactly_one_click() {
        let (clock, mut gestures) = classifier();
        gestures.press_down(&section_target(), InputSource::Touch, true);
        clock.advance_ms(LONG_PRESS_MS);
        gestures.poll().expect("long press fired");

        assert_eq!(gestures.observe_click(), ClickDisposition::Suppressed);
        assert_ne!(gestures.observe_click(), ClickDisposition::Suppressed);
    }

    #[test]
    fn non_draggable_target_never_arms() {
        let (clock, mut gestures) = classifier();
        gestures.press_down(&PointerTarget::Background, InputSource::Mouse, true);
        clock.advance_ms(LONG_PRESS_MS);
        assert!(gestures.poll().is_none());
    }

    #[test]
    fn synthesized_mouse_press_does_not_restart_deadline() {
        let (clock, mut gestures) = classifier();
        gestures.press_down(&section_target(), InputSource::Touch, true);

        // Device mirrors the touch as a mouse press part-way through the hold.
        clock.advance_ms(LONG_PRESS_MS / 2);
        gestures.press_down(&section_target(), InputSource::Mouse, true);

        clock.advance_ms(LONG_PRESS_MS / 2);
        assert!(gestures.poll().is_some(), "original deadline preserved");
    }

    #[test]
    fn mouse_press_after_touch_release_stays_shadowed() {
        let (clock, mut gestures) = classifier();
        gestures.press_down(&section_target(), InputSource::Touch, true);
        clock.advance_ms(100);
        gestures.press_up(InputSource::Touch);

        clock.advance_ms(SYNTHETIC_MOUSE_WINDOW_MS);
        gestures.press_down(&section_target(), InputSource::Mouse, true);
        clock.advance_ms(LONG_PRESS_MS);
        assert!(gestures.poll().is_none());
    }

    #[test]
    fn tap_window_is_enforced_at_click_time() {
        let (clock, mut gestures) = classifier();
        gestures.press_down(&section_target(), InputSource::Mouse, false);
        clock.advance_ms(150);
        assert_eq!(gestures.observe_click(), ClickDisposition::Tap);

        gestures.press_down(&section_target(), InputSource::Mouse, false);
        clock.advance_ms(201);
        assert_eq!(gestures.observe_click(), ClickDisposition::Slow);
    }

    #[test]
    fn new_press_replaces_pending_deadline() {
        let (clock, mut gestures) = classifier();
        gestures.press_down(&section_target(), InputSource::Mouse, true);
        clock.advance_ms(LONG_PRESS_MS - 100);

        let other = PointerTarget::Link("l1".to_string());
        gestures.press_down(&other, InputSource::Mouse, true);
        clock.advance_ms(100);
        assert!(gestures.poll().is_none(), "old deadline must not fire");

        clock.advance_ms(LONG_PRESS_MS - 100);
        assert_eq!(gestures.poll().expect("new deadline").target, other);
    }
}
