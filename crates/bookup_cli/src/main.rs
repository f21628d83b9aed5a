//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `bookup_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("bookup_core ping={}", bookup_core::ping());
    println!("bookup_core version={}", bookup_core::core_version());
}
