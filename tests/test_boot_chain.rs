// CLASSIFICATION: COMMUNITY
// Filename: test_boot_chain.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-10-16

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use whitebox::boot::{
    module_path, run_stage_or_report, BootChain, BootError, ChainEvent, ChainTrace, FailureReporter, FatalReport,
    FatalSink, ModuleName, PlatformLayout, Stage, BOOT_MANAGER_STAGE, KERNEL_STAGE,
};
use whitebox::intl::LookupWithFallback;
use whitebox::runtime::LoadPolicy;

struct Exit(i32);

#[derive(Default)]
struct RecordingSink(RefCell<Vec<FatalReport>>);

impl FatalSink for RecordingSink {
    fn present(&self, report: &FatalReport) {
        self.0.borrow_mut().push(report.clone());
    }

    fn terminate(&self, exit_code: i32) -> ! {
        panic::panic_any(Exit(exit_code))
    }
}

#[derive(Default)]
struct Trace(RefCell<Vec<ChainEvent>>);

impl ChainTrace for Trace {
    fn event(&self, _stage: &Stage, event: ChainEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[cfg(unix)]
#[test]
fn linux_kernel_path_from_game_executable() {
    let path = module_path(Path::new("/app/bin/Game"), ModuleName::Kernel, &PlatformLayout::Posix).unwrap();
    assert_eq!(path, Path::new("/app/bin/libkernel.so"));
}

#[cfg(unix)]
#[test]
fn missing_kernel_is_reported_once_with_its_path() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempdir().unwrap();
    let bin = dir.path().join("app").join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let expected = bin.join("libkernel.so");

    let trace = Trace::default();
    let chain = BootChain::new(bin.join("Game"), PlatformLayout::Posix, LoadPolicy::from_insecure_flag(true))
        .with_trace(&trace);

    let err = chain.load_and_invoke(&KERNEL_STAGE, &()).unwrap_err();
    match &err {
        BootError::Load(e) => assert_eq!(e.path, expected),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(*trace.0.borrow(), vec![ChainEvent::Resolved(expected.clone())]);

    let lookup = LookupWithFallback::new("en");
    let sink = RecordingSink::default();
    let reporter = FailureReporter::new("Game", &lookup, &sink);
    let caught = panic::catch_unwind(AssertUnwindSafe(|| {
        run_stage_or_report(&chain, &KERNEL_STAGE, &(), &reporter);
    }))
    .unwrap_err();

    let reports = sink.0.borrow();
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(
        report.explanation,
        format!("Can't load whitebox kernel '{}'.", expected.display())
    );
    assert!(report.body().contains(&expected.display().to_string()));
    assert_ne!(report.exit_code, 0);
    assert_eq!(caught.downcast_ref::<Exit>().map(|e| e.0), Some(report.exit_code));
}

/// The `exit-code-stage` cdylib cargo builds next to the test binaries.
#[cfg(unix)]
fn exit_code_stage() -> PathBuf {
    use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
    let prefix = format!("{DLL_PREFIX}exit_code_stage");
    let exe = std::env::current_exe().unwrap();
    let deps = exe.parent().unwrap();
    [deps, deps.parent().unwrap()]
        .iter()
        .filter_map(|dir| std::fs::read_dir(dir).ok())
        .flatten()
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| name.starts_with(&prefix) && name.ends_with(DLL_SUFFIX))
        })
        .expect("exit-code-stage cdylib is built with the dev-dependencies")
}

/// Install the test stage as `module` next to a fake `Game` executable.
#[cfg(unix)]
fn install_stage(bin: &Path, module: ModuleName) -> PathBuf {
    let target = module_path(&bin.join("Game"), module, &PlatformLayout::Posix).unwrap();
    std::fs::copy(exit_code_stage(), &target).unwrap();
    target
}

#[cfg(unix)]
#[test]
fn stage_exit_code_is_forwarded_unchanged() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempdir().unwrap();
    let kernel = install_stage(dir.path(), ModuleName::Kernel);

    let trace = Trace::default();
    let chain = BootChain::new(dir.path().join("Game"), PlatformLayout::Posix, LoadPolicy::from_insecure_flag(true))
        .with_trace(&trace);

    assert_eq!(chain.load_and_invoke(&KERNEL_STAGE, &()).unwrap(), 42);
    assert_eq!(
        *trace.0.borrow(),
        vec![
            ChainEvent::Resolved(kernel.clone()),
            ChainEvent::Loaded(kernel.clone()),
            ChainEvent::EntryResolved("KernelMain"),
            ChainEvent::Invoked(42),
            ChainEvent::Released(kernel),
        ]
    );

    // A failing stage is an exit code, not a chain failure.
    let lookup = LookupWithFallback::new("en");
    let sink = RecordingSink::default();
    let reporter = FailureReporter::new("Game", &lookup, &sink);
    assert_eq!(run_stage_or_report(&chain, &KERNEL_STAGE, &(), &reporter), 42);
    assert!(sink.0.borrow().is_empty());
}

#[cfg(unix)]
#[test]
fn missing_entry_point_releases_module() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempdir().unwrap();
    // Exports KernelMain only.
    let boot_manager = install_stage(dir.path(), ModuleName::BootManager);

    let trace = Trace::default();
    let chain = BootChain::new(dir.path().join("Game"), PlatformLayout::Posix, LoadPolicy::from_insecure_flag(true))
        .with_trace(&trace);

    match chain.load_and_invoke(&BOOT_MANAGER_STAGE, &()).unwrap_err() {
        BootError::Symbol(e) => {
            assert_eq!(e.symbol(), "BootmgrMain");
            assert_eq!(e.path(), boot_manager.as_path());
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(
        *trace.0.borrow(),
        vec![
            ChainEvent::Resolved(boot_manager.clone()),
            ChainEvent::Loaded(boot_manager.clone()),
            ChainEvent::Released(boot_manager),
        ]
    );
}
