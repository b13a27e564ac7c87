// CLASSIFICATION: COMMUNITY
// Filename: fatal.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Terminal failure reporting.
//!
//! Every failing branch of the chain ends in [`FailureReporter::report_fatal`],
//! which logs, shows what the platform can show and terminates the process.

use crate::boot::chain::Stage;
use crate::boot::error::{error_chain, BootError};
use crate::intl::{l18n_fmt, Layout, Lookup};
use crate::telemetry::logs_to_stderr;
use log::{error, log_enabled, Level};

/// Rendered fatal report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FatalReport {
    pub title: String,
    /// What the user can do about it.
    pub remediation: String,
    /// What failed, naming the path or symbol.
    pub explanation: String,
    pub technical_details: String,
    pub exit_code: i32,
    pub layout: Layout,
}

impl FatalReport {
    /// Dialog body: remediation, explanation, then details.
    pub fn body(&self) -> String {
        format!(
            "{}\n\n{}\n\n{}",
            self.remediation, self.explanation, self.technical_details
        )
    }
}

/// Where fatal reports go, and how the process ends.
pub trait FatalSink {
    fn present(&self, report: &FatalReport);
    fn terminate(&self, exit_code: i32) -> !;
}

/// Writes stderr unless the logger already does, shows a modal dialog on
/// Windows, then exits.
pub struct SystemSink;

impl FatalSink for SystemSink {
    fn present(&self, report: &FatalReport) {
        if needs_stderr_copy(logs_to_stderr(), log_enabled!(Level::Error)) {
            eprintln!("{}\n{}", report.title, report.body());
        }
        platform::show_dialog(report);
    }

    fn terminate(&self, exit_code: i32) -> ! {
        log::logger().flush();
        std::process::exit(exit_code)
    }
}

/// The report reaches stderr through the logger only when it prints errors there.
fn needs_stderr_copy(logger_on_stderr: bool, errors_logged: bool) -> bool {
    !(logger_on_stderr && errors_logged)
}

/// Composes and delivers fatal reports for one app.
pub struct FailureReporter<'a> {
    app_description: &'a str,
    lookup: &'a dyn Lookup,
    sink: &'a dyn FatalSink,
}

impl<'a> FailureReporter<'a> {
    pub fn new(app_description: &'a str, lookup: &'a dyn Lookup, sink: &'a dyn FatalSink) -> Self {
        Self {
            app_description,
            lookup,
            sink,
        }
    }

    pub fn compose(&self, stage: &Stage, error: &BootError) -> FatalReport {
        FatalReport {
            title: l18n_fmt(self.lookup, stage.title, &[self.app_description]),
            remediation: error.remediation(stage).render(self.lookup),
            explanation: error.explanation(stage).render(self.lookup),
            technical_details: error_chain(error),
            exit_code: error.exit_code(),
            layout: self.lookup.layout(),
        }
    }

    /// Report `error` raised while running `stage` and terminate.
    pub fn report_fatal(&self, stage: &Stage, error: &BootError) -> ! {
        let report = self.compose(stage, error);
        error!(
            "{} {} ({}) exit code {}",
            report.title, report.explanation, report.technical_details, report.exit_code
        );
        self.sink.present(&report);
        self.sink.terminate(report.exit_code)
    }
}

#[cfg(windows)]
mod platform {
    use super::FatalReport;
    use crate::intl::Layout;
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use std::ptr;

    const MB_OK: u32 = 0x0000_0000;
    const MB_ICONERROR: u32 = 0x0000_0010;
    const MB_RIGHT: u32 = 0x0008_0000;
    const MB_RTLREADING: u32 = 0x0010_0000;

    #[link(name = "user32")]
    extern "system" {
        fn MessageBoxW(hwnd: *mut core::ffi::c_void, text: *const u16, caption: *const u16, kind: u32) -> i32;
    }

    fn wide(text: &str) -> Vec<u16> {
        OsStr::new(text).encode_wide().chain(Some(0)).collect()
    }

    pub(super) fn show_dialog(report: &FatalReport) {
        let mut kind = MB_OK | MB_ICONERROR;
        if report.layout == Layout::Rtl {
            kind |= MB_RIGHT | MB_RTLREADING;
        }
        let text = wide(&report.body());
        let caption = wide(&report.title);
        // SAFETY: both buffers are NUL-terminated and outlive the call.
        unsafe {
            MessageBoxW(ptr::null_mut(), text.as_ptr(), caption.as_ptr(), kind);
        }
    }
}

#[cfg(not(windows))]
mod platform {
    use super::FatalReport;

    pub(super) fn show_dialog(_report: &FatalReport) {
        // No UI surface before the kernel owns a window; stderr and the log carry it.
    }
}
