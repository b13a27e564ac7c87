// CLASSIFICATION: COMMUNITY
// Filename: lib.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! WhiteBox kernel module.
//!
//! Final stage of the chain. The window and its message loop are owned by
//! the UI layer; this entry point validates what the boot manager passed in
//! and returns the app's exit code.

use log::{info, warn};
use std::os::raw::c_int;
use whitebox::boot::KernelArgs;
use whitebox::intl::Lookup;
use whitebox::telemetry::init_logging;

pub const KERNEL_EXIT_SUCCESS: c_int = 0;

/// Kernel entry point.
#[no_mangle]
#[allow(non_snake_case, improper_ctypes_definitions)]
pub extern "C" fn KernelMain(args: &KernelArgs<'_>) -> c_int {
    init_logging(args.log);
    kernel_main(args)
}

fn kernel_main(args: &KernelArgs<'_>) -> c_int {
    let flags = args.kernel_flags;
    info!(
        "{} kernel started, main window {}x{}, locale {}",
        args.app_description,
        flags.main_window_width,
        flags.main_window_height,
        args.intl.locale()
    );
    if !flags.positional_flags.is_empty() {
        warn!("kernel ignores unknown flags: {}", flags.positional_flags.join(" "));
    }
    KERNEL_EXIT_SUCCESS
}
