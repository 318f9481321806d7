//! Press-and-hold confirmation for destructive actions.
//!
//! # Responsibility
//! - Gate an action behind a sustained 1500 ms press.
//! - Expose fill progress and caption state for the host's animation.
//!
//! # Invariants
//! - Confirmation is a flag set when the deadline elapses, never derived from
//!   elapsed press time at release.
//! - Every cancellation path returns the control to `Idle` with zero
//!   progress.

use crate::clock::Clock;
use log::debug;
use std::time::{Duration, Instant};

/// Sustained press duration required before release confirms.
pub const HOLD_DURATION_MS: u64 = 1500;

/// Caption while the control is at rest.
pub const IDLE_CAPTION: &str = "Delete";

/// Caption while the press is being held.
pub const HOLDING_CAPTION: &str = "Hold...";

/// Caption once the hold has completed.
pub const READY_CAPTION: &str = "Delete!";

/// Outcome of releasing the press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldRelease {
    /// The full duration elapsed before release; fire the bound action.
    Confirmed,
    /// Released early; treat as cancellation.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldPhase {
    Idle,
    Holding { started: Instant, deadline: Instant },
    Confirmed,
}

/// One press-and-hold control instance.
pub struct HoldToConfirm<C: Clock> {
    clock: C,
    phase: HoldPhase,
}

impl<C: Clock> HoldToConfirm<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            phase: HoldPhase::Idle,
        }
    }

    /// Starts a hold on primary-button or touch press.
    ///
    /// Non-primary mouse buttons are ignored. Every accepted press restarts
    /// the control from scratch.
    pub fn press_start(&mut self, primary: bool) {
        if !primary {
            return;
        }
        let now = self.clock.now();
        self.phase = HoldPhase::Holding {
            started: now,
            deadline: now + Duration::from_millis(HOLD_DURATION_MS),
        };
    }

    /// Marks the hold confirmed once its deadline has elapsed.
    ///
    /// Polling an idle control is a no-op, so a deadline abandoned by
    /// cancellation can never confirm late.
    pub fn poll(&mut self) -> bool {
        if let HoldPhase::Holding { deadline, .. } = self.phase {
            if self.clock.now() >= deadline {
                self.phase = HoldPhase::Confirmed;
                debug!("event=hold_confirmed module=gesture");
                return true;
            }
        }
        false
    }

    /// Consumes the press release.
    ///
    /// Confirms only when the deadline already elapsed; releasing while still
    /// holding counts as cancellation. Either way the control resets.
    pub fn release(&mut self) -> HoldRelease {
        let outcome = match self.phase {
            HoldPhase::Confirmed => HoldRelease::Confirmed,
            _ => HoldRelease::Cancelled,
        };
        self.phase = HoldPhase::Idle;
        outcome
    }

    /// Cancels the hold on pointer-leave or touch-cancel.
    pub fn cancel(&mut self) {
        self.phase = HoldPhase::Idle;
    }

    /// Returns fill progress in `[0, 1]` for the host's animation.
    pub fn progress(&self) -> f32 {
        match self.phase {
            HoldPhase::Idle => 0.0,
            HoldPhase::Confirmed => 1.0,
            HoldPhase::Holding { started, deadline } => {
                let total = (deadline - started).as_millis() as f32;
                let elapsed = (self.clock.now() - started).as_millis() as f32;
                (elapsed / total).clamp(0.0, 1.0)
            }
        }
    }

    /// Returns the caption for the control's current phase.
    pub fn caption(&self) -> &'static str {
        match self.phase {
            HoldPhase::Idle => IDLE_CAPTION,
            HoldPhase::Holding { .. } => HOLDING_CAPTION,
            HoldPhase::Confirmed => READY_CAPTION,
        }
    }

    /// Returns whether the hold has completed and awaits release.
    pub fn is_confirmed(&self) -> bool {
        self.phase == HoldPhase::Confirmed
    }
}
