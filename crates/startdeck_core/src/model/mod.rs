//! Board domain model for the startpage surface.
//!
//! # Responsibility
//! - Define canonical Section/Link records shared by every core component.
//! - Keep section and link order as explicit ID sequences the rendering
//!   surface is synchronized against.
//!
//! # Invariants
//! - Every identifier is backend-assigned and treated as opaque.
//! - A section holds at most [`board::LINK_CAPACITY`] links.

pub mod board;
