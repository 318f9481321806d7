//! Pointer gesture state machines.
//!
//! # Responsibility
//! - Disambiguate tap / long-press / drag-start on a shared pointer stream.
//! - Provide the press-and-hold confirmation used by destructive actions.
//!
//! # Invariants
//! - At most one long-press deadline is pending at any time.
//! - Every cancellation path clears its pending deadline; a poll after
//!   cancellation is a no-op.

pub mod hold;
pub mod press;
