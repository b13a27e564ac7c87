// CLASSIFICATION: COMMUNITY
// Filename: mod.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Library wrappers for WhiteBox binaries.

pub mod launcher_main;
