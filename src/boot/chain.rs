// CLASSIFICATION: COMMUNITY
// Filename: chain.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Generic load-and-invoke routine shared by every chain stage.
//!
//! A stage is resolved, loaded, entered and released in that order. The
//! module handle lives in [`BootChain::load_and_invoke`]'s frame and is
//! released before any error reaches the caller.

use crate::boot::error::BootError;
use crate::boot::fatal::FailureReporter;
use crate::boot::hardening::harden_process;
use crate::boot::path::{self, ModuleName, PlatformLayout};
use crate::intl::MessageId;
use crate::runtime::{EntryPoint, LoadFlags, LoadPolicy, ModuleHandle};
use log::info;
use std::path::PathBuf;

/// Everything the chain needs to know about one stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stage {
    pub module: ModuleName,
    /// Exported entry point, case-sensitive.
    pub entry: &'static str,
    /// Title of the fatal report raised while loading this stage.
    pub title: MessageId,
    pub directory_failure: MessageId,
    pub load_failure: MessageId,
    pub remediation: MessageId,
}

/// Loaded by the launcher.
pub const BOOT_MANAGER_STAGE: Stage = Stage {
    module: ModuleName::BootManager,
    entry: "BootmgrMain",
    title: MessageId::AppErrorDialogTitle,
    directory_failure: MessageId::CantGetCurrentDirectoryUnableToLoadTheApp,
    load_failure: MessageId::CantLoadBootManager,
    remediation: MessageId::PleaseCheckAppInstalledCorrectly,
};

/// Loaded by the boot manager.
pub const KERNEL_STAGE: Stage = Stage {
    module: ModuleName::Kernel,
    entry: "KernelMain",
    title: MessageId::BootmgrErrorDialogTitle,
    directory_failure: MessageId::CantGetExecutableDirectoryForBootManager,
    load_failure: MessageId::CantLoadKernelFrom,
    remediation: MessageId::PleaseReinstallTheApp,
};

/// Progress of a stage through the chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainEvent {
    Resolved(PathBuf),
    Loaded(PathBuf),
    EntryResolved(&'static str),
    Invoked(i32),
    Released(PathBuf),
}

/// Observer for chain progress.
pub trait ChainTrace {
    fn event(&self, stage: &Stage, event: ChainEvent);
}

/// Trace that drops every event.
pub struct NoTrace;

impl ChainTrace for NoTrace {
    fn event(&self, _stage: &Stage, _event: ChainEvent) {}
}

/// Locates, loads and enters chain stages for one executable.
pub struct BootChain<'t> {
    exe: PathBuf,
    layout: PlatformLayout,
    policy: LoadPolicy,
    trace: &'t dyn ChainTrace,
}

impl BootChain<'static> {
    pub fn new(exe: impl Into<PathBuf>, layout: PlatformLayout, policy: LoadPolicy) -> Self {
        Self {
            exe: exe.into(),
            layout,
            policy,
            trace: &NoTrace,
        }
    }

    /// Chain rooted at the running executable with the platform's layout.
    pub fn for_current_exe(policy: LoadPolicy) -> Result<Self, BootError> {
        Ok(Self::new(path::current_exe_path()?, PlatformLayout::current(), policy))
    }
}

impl<'t> BootChain<'t> {
    pub fn with_trace<'u>(self, trace: &'u dyn ChainTrace) -> BootChain<'u> {
        BootChain {
            exe: self.exe,
            layout: self.layout,
            policy: self.policy,
            trace,
        }
    }

    pub fn module_path(&self, stage: &Stage) -> Result<PathBuf, BootError> {
        path::module_path(&self.exe, stage.module, &self.layout)
    }

    /// Run `stage` with `args` and return the stage's own exit code.
    ///
    /// Process hardening is in place before the module is opened. The entry
    /// point must have the [`crate::runtime::EntryFn<A>`] signature; only the
    /// symbol name is checked.
    pub fn load_and_invoke<A>(&self, stage: &Stage, args: &A) -> Result<i32, BootError> {
        harden_process();
        let path = self.module_path(stage)?;
        self.trace.event(stage, ChainEvent::Resolved(path.clone()));

        let mut module = ModuleHandle::open(&path, LoadFlags::for_policy(self.policy))?;
        self.trace.event(stage, ChainEvent::Loaded(path.clone()));

        let outcome = self.enter(stage, &module, args);
        if module.close() {
            self.trace.event(stage, ChainEvent::Released(path));
        }
        outcome
    }

    fn enter<A>(&self, stage: &Stage, module: &ModuleHandle, args: &A) -> Result<i32, BootError> {
        let entry = EntryPoint::<A>::resolve(module, stage.entry)?;
        self.trace.event(stage, ChainEvent::EntryResolved(stage.entry));

        info!("starting {} '{}'", stage.module.as_str(), module.path().display());
        // SAFETY: chain modules export `stage.entry` as `EntryFn<A>`, and
        // `module` stays open until after the call returns.
        let code = unsafe { entry.call(args) };
        info!("{} exited with code {code}", stage.module.as_str());
        self.trace.event(stage, ChainEvent::Invoked(code));
        Ok(code)
    }
}

/// Run `stage`, or report the failure and terminate.
pub fn run_stage_or_report<A>(
    chain: &BootChain<'_>,
    stage: &Stage,
    args: &A,
    reporter: &FailureReporter<'_>,
) -> i32 {
    match chain.load_and_invoke(stage, args) {
        Ok(code) => code,
        Err(e) => reporter.report_fatal(stage, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<ChainEvent>>);

    impl ChainTrace for Recorder {
        fn event(&self, _stage: &Stage, event: ChainEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    #[test]
    fn stages_export_fixed_entry_points() {
        assert_eq!(BOOT_MANAGER_STAGE.entry, "BootmgrMain");
        assert_eq!(KERNEL_STAGE.entry, "KernelMain");
    }

    #[cfg(unix)]
    #[test]
    fn unloadable_module_never_reaches_entry() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("Game");
        std::fs::write(dir.path().join("libkernel.so"), b"unsigned and not even ELF").unwrap();

        let recorder = Recorder::default();
        let chain = BootChain::new(&exe, PlatformLayout::Posix, LoadPolicy::default()).with_trace(&recorder);
        let err = chain.load_and_invoke(&KERNEL_STAGE, &()).unwrap_err();

        assert!(matches!(err, BootError::Load(_)));
        assert_eq!(
            *recorder.0.borrow(),
            vec![ChainEvent::Resolved(dir.path().join("libkernel.so"))]
        );
    }

    #[test]
    fn relative_exe_fails_before_resolution() {
        let recorder = Recorder::default();
        let chain = BootChain::new("Game", PlatformLayout::Posix, LoadPolicy::default()).with_trace(&recorder);
        let err = chain.load_and_invoke(&BOOT_MANAGER_STAGE, &()).unwrap_err();
        assert!(matches!(err, BootError::ModuleDirectory(_)));
        assert!(recorder.0.borrow().is_empty());
    }
}
