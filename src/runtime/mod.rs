// CLASSIFICATION: COMMUNITY
// Filename: mod.rs v1.2
// Date Modified: 2026-10-16
// Author: Lukas Bower

//! Runtime primitives for loading and entering boot chain modules.

pub mod entry;

pub mod loader;

pub use entry::{EntryFn, EntryPoint, SymbolError};
pub use loader::{LoadError, LoadFlags, LoadPolicy, ModuleHandle};
