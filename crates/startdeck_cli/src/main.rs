//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `startdeck_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("startdeck_core ping={}", startdeck_core::ping());
    println!("startdeck_core version={}", startdeck_core::core_version());
}
