// CLASSIFICATION: COMMUNITY
// Filename: lib.rs v2.0
// Date Modified: 2026-10-16
// Author: Lukas Bower

//! Boot chain for WhiteBox native apps.
//!
//! The launcher loads the boot manager module, which loads the kernel
//! module; each stage's exit code is forwarded back to the OS.

/// Module location, hardening, stage chaining and fatal reporting
pub mod boot;

/// Shared library loading and entry point invocation
pub mod runtime;

/// Localized messages
pub mod intl;

/// Command line flags and config file
pub mod config;

/// Logger setup
pub mod telemetry;

/// Library wrappers for binaries
pub mod binlib;
