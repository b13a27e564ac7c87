// CLASSIFICATION: COMMUNITY
// Filename: hardening.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Process-wide load-time protections applied before the first module loads.
//!
//! A failed step weakens the process but does not stop it, so failures are
//! logged and recorded rather than returned. Signed-target enforcement is not
//! a step here; the loader applies it through its own flags.

use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use std::fmt;

/// Outcome of one hardening step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    Unsupported,
    Failed(String),
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => write!(f, "applied"),
            Self::Unsupported => write!(f, "unsupported"),
            Self::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

/// What [`harden_process`] managed to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HardeningReport {
    /// Module search limited to system and application directories.
    pub safe_search_order: StepOutcome,
    /// No OS popups for critical errors during loads.
    pub thread_error_mode: StepOutcome,
    /// Only hardened, system-trusted unmarshalers.
    pub strong_unmarshalling: StepOutcome,
    /// Interop exceptions reach the process instead of being swallowed.
    pub interop_exceptions: StepOutcome,
}

impl HardeningReport {
    fn steps(&self) -> [(&'static str, &StepOutcome); 4] {
        [
            (
                "Can't enable secure DLL search order, attacker can plant DLLs with malicious code",
                &self.safe_search_order,
            ),
            (
                "Can't set thread reaction to serious system errors, continue with default reaction",
                &self.thread_error_mode,
            ),
            (
                "Can't enable strong COM unmarshalling policy, some non-trusted marshallers can be used",
                &self.strong_unmarshalling,
            ),
            (
                "Can't disable COM exceptions swallowing, some exceptions may not be passed to the app",
                &self.interop_exceptions,
            ),
        ]
    }

    /// Whether any step that exists on this platform failed.
    pub fn degraded(&self) -> bool {
        self.steps()
            .iter()
            .any(|(_, outcome)| matches!(outcome, StepOutcome::Failed(_)))
    }

    fn log(&self) {
        for (warning, outcome) in self.steps() {
            match outcome {
                StepOutcome::Failed(e) => warn!("{warning}: {e}"),
                StepOutcome::Unsupported => debug!("hardening step not available here: {warning}"),
                StepOutcome::Applied => {}
            }
        }
        if !self.degraded() {
            info!("process hardening complete");
        }
    }
}

static HARDENING: OnceCell<HardeningReport> = OnceCell::new();

/// Apply every hardening step once per process.
///
/// Later calls return the first report without touching the OS again.
pub fn harden_process() -> &'static HardeningReport {
    HARDENING.get_or_init(|| {
        let report = platform::apply();
        report.log();
        report
    })
}

/// Report of the hardening pass, if it ran.
pub fn hardening_report() -> Option<&'static HardeningReport> {
    HARDENING.get()
}

#[cfg(windows)]
mod platform {
    use super::{HardeningReport, StepOutcome};
    use core::ffi::c_void;
    use std::io;
    use std::ptr;

    const LOAD_LIBRARY_SEARCH_USER_DIRS: u32 = 0x0000_0400;
    const LOAD_LIBRARY_SEARCH_SYSTEM32: u32 = 0x0000_0800;

    const SEM_FAILCRITICALERRORS: u32 = 0x0001;
    const SEM_NOGPFAULTERRORBOX: u32 = 0x0002;
    const SEM_NOOPENFILEERRORBOX: u32 = 0x8000;

    const COINIT_APARTMENTTHREADED: u32 = 0x2;
    const COINIT_DISABLE_OLE1DDE: u32 = 0x4;
    const COINIT_SPEED_OVER_MEMORY: u32 = 0x8;
    const CLSCTX_INPROC_SERVER: u32 = 0x1;

    const COMGLB_EXCEPTION_HANDLING: u32 = 1;
    const COMGLB_EXCEPTION_DONOT_HANDLE_ANY: usize = 2;
    const COMGLB_UNMARSHALING_POLICY: u32 = 5;
    const COMGLB_UNMARSHALING_POLICY_STRONG: usize = 1;

    #[repr(C)]
    struct Guid {
        data1: u32,
        data2: u16,
        data3: u16,
        data4: [u8; 8],
    }

    const CLSID_GLOBAL_OPTIONS: Guid = Guid {
        data1: 0x0000_034B,
        data2: 0,
        data3: 0,
        data4: [0xC0, 0, 0, 0, 0, 0, 0, 0x46],
    };
    const IID_IGLOBAL_OPTIONS: Guid = Guid {
        data1: 0x0000_015B,
        data2: 0,
        data3: 0,
        data4: [0xC0, 0, 0, 0, 0, 0, 0, 0x46],
    };

    #[repr(C)]
    #[allow(dead_code)]
    struct GlobalOptionsVtbl {
        query_interface: unsafe extern "system" fn(*mut GlobalOptions, *const Guid, *mut *mut c_void) -> i32,
        add_ref: unsafe extern "system" fn(*mut GlobalOptions) -> u32,
        release: unsafe extern "system" fn(*mut GlobalOptions) -> u32,
        set: unsafe extern "system" fn(*mut GlobalOptions, u32, usize) -> i32,
        query: unsafe extern "system" fn(*mut GlobalOptions, u32, *mut usize) -> i32,
    }

    #[repr(C)]
    struct GlobalOptions {
        vtbl: *const GlobalOptionsVtbl,
    }

    #[link(name = "kernel32")]
    extern "system" {
        fn SetDefaultDllDirectories(flags: u32) -> i32;
        fn SetThreadErrorMode(new_mode: u32, old_mode: *mut u32) -> i32;
    }

    #[link(name = "ole32")]
    extern "system" {
        fn CoInitializeEx(reserved: *mut c_void, coinit: u32) -> i32;
        fn CoCreateInstance(
            clsid: *const Guid,
            outer: *mut c_void,
            context: u32,
            iid: *const Guid,
            out: *mut *mut c_void,
        ) -> i32;
    }

    fn hresult(hr: i32) -> Result<(), String> {
        if hr >= 0 {
            Ok(())
        } else {
            Err(format!("HRESULT {:#010x}", hr as u32))
        }
    }

    fn last_error() -> String {
        io::Error::last_os_error().to_string()
    }

    /// Owned `IGlobalOptions` reference, released on drop.
    struct GlobalOptionsRef(*mut GlobalOptions);

    impl GlobalOptionsRef {
        fn create() -> Result<Self, String> {
            let mut out: *mut c_void = ptr::null_mut();
            // SAFETY: out-pointer is valid; COM was initialised on this thread.
            hresult(unsafe {
                CoCreateInstance(
                    &CLSID_GLOBAL_OPTIONS,
                    ptr::null_mut(),
                    CLSCTX_INPROC_SERVER,
                    &IID_IGLOBAL_OPTIONS,
                    &mut out,
                )
            })?;
            if out.is_null() {
                return Err("CoCreateInstance returned no IGlobalOptions".into());
            }
            Ok(Self(out.cast()))
        }

        fn query(&self, property: u32) -> Result<usize, String> {
            let mut value = 0usize;
            // SAFETY: self.0 is a live IGlobalOptions.
            hresult(unsafe { ((*(*self.0).vtbl).query)(self.0, property, &mut value) })?;
            Ok(value)
        }

        fn set(&self, property: u32, value: usize) -> Result<(), String> {
            // SAFETY: self.0 is a live IGlobalOptions.
            hresult(unsafe { ((*(*self.0).vtbl).set)(self.0, property, value) })
        }
    }

    impl Drop for GlobalOptionsRef {
        fn drop(&mut self) {
            // SAFETY: releases the reference taken in `create`.
            unsafe {
                ((*(*self.0).vtbl).release)(self.0);
            }
        }
    }

    fn safe_search_order() -> StepOutcome {
        // SAFETY: plain flag call.
        if unsafe { SetDefaultDllDirectories(LOAD_LIBRARY_SEARCH_SYSTEM32 | LOAD_LIBRARY_SEARCH_USER_DIRS) } != 0 {
            StepOutcome::Applied
        } else {
            StepOutcome::Failed(last_error())
        }
    }

    fn thread_error_mode() -> StepOutcome {
        let mut mode = SEM_NOGPFAULTERRORBOX | SEM_NOOPENFILEERRORBOX;
        if !cfg!(debug_assertions) {
            mode |= SEM_FAILCRITICALERRORS;
        }
        let mut old = 0u32;
        // SAFETY: `old` is a valid out-pointer.
        if unsafe { SetThreadErrorMode(mode, &mut old) } != 0 {
            StepOutcome::Applied
        } else {
            StepOutcome::Failed(last_error())
        }
    }

    fn com_options() -> Result<GlobalOptionsRef, String> {
        // S_FALSE and RPC_E_CHANGED_MODE both leave COM usable on this thread.
        const RPC_E_CHANGED_MODE: i32 = 0x8001_0106_u32 as i32;
        // SAFETY: reserved must be null.
        let hr = unsafe {
            CoInitializeEx(
                ptr::null_mut(),
                COINIT_APARTMENTTHREADED | COINIT_DISABLE_OLE1DDE | COINIT_SPEED_OVER_MEMORY,
            )
        };
        if hr != RPC_E_CHANGED_MODE {
            hresult(hr)?;
        }
        GlobalOptionsRef::create()
    }

    fn outcome(result: Result<(), String>) -> StepOutcome {
        match result {
            Ok(()) => StepOutcome::Applied,
            Err(e) => StepOutcome::Failed(e),
        }
    }

    pub(super) fn apply() -> HardeningReport {
        let safe_search_order = safe_search_order();
        let thread_error_mode = thread_error_mode();
        let (strong_unmarshalling, interop_exceptions) = match com_options() {
            Ok(options) => {
                let unmarshalling = options.query(COMGLB_UNMARSHALING_POLICY).and_then(|current| {
                    if current == COMGLB_UNMARSHALING_POLICY_STRONG {
                        Ok(())
                    } else {
                        options.set(COMGLB_UNMARSHALING_POLICY, COMGLB_UNMARSHALING_POLICY_STRONG)
                    }
                });
                let exceptions = options.set(COMGLB_EXCEPTION_HANDLING, COMGLB_EXCEPTION_DONOT_HANDLE_ANY);
                (outcome(unmarshalling), outcome(exceptions))
            }
            Err(e) => (StepOutcome::Failed(e.clone()), StepOutcome::Failed(e)),
        };
        HardeningReport {
            safe_search_order,
            thread_error_mode,
            strong_unmarshalling,
            interop_exceptions,
        }
    }
}

#[cfg(not(windows))]
mod platform {
    use super::{HardeningReport, StepOutcome};

    /// Modules are always opened by absolute path, so ambient search paths
    /// are never consulted, and there is no COM.
    pub(super) fn apply() -> HardeningReport {
        HardeningReport {
            safe_search_order: StepOutcome::Unsupported,
            thread_error_mode: StepOutcome::Unsupported,
            strong_unmarshalling: StepOutcome::Unsupported,
            interop_exceptions: StepOutcome::Unsupported,
        }
    }
}
