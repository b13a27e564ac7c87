// CLASSIFICATION: COMMUNITY
// Filename: mod.rs v0.5
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Logging for the launcher and loaded modules.

pub mod logging;

pub use logging::{init_logging, init_panic_hook, logs_to_stderr};
