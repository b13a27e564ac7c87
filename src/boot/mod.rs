// CLASSIFICATION: COMMUNITY
// Filename: mod.rs · WhiteBox boot subsystem
// Date Modified: 2026-10-16
// Author: Lukas Bower
//
// ─────────────────────────────────────────────────────────────
// WhiteBox Boot Subsystem – Root Module
//
// Locates, hardens, loads and enters the chain of native modules:
// launcher → boot manager → kernel. Any failure ends in the
// fatal reporter; success forwards the stage's exit code.
//
// ## Sub‑modules
// * `path`      – module location relative to the executable.
// * `hardening` – process-wide load-time protections.
// * `chain`     – stage descriptors and the load-and-invoke routine.
// * `args`      – argument bundles passed to entry points.
// * `fatal`     – fatal report composition and termination.
// * `context`   – process-wide init and teardown.
// ─────────────────────────────────────────────────────────────

pub mod args;
pub mod chain;
pub mod context;
pub mod error;
pub mod fatal;
pub mod hardening;
pub mod path;

pub use args::{BootManagerArgs, CommandLineFlags, KernelArgs, KernelFlags, PlatformArgs};
pub use chain::{
    run_stage_or_report, BootChain, ChainEvent, ChainTrace, Stage, BOOT_MANAGER_STAGE, KERNEL_STAGE,
};
pub use context::ProcessContext;
pub use error::BootError;
pub use fatal::{FailureReporter, FatalReport, FatalSink, SystemSink};
pub use hardening::{harden_process, HardeningReport, StepOutcome};
pub use path::{module_path, ModuleName, PlatformLayout};
