// CLASSIFICATION: COMMUNITY
// Filename: lib.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! WhiteBox boot manager module.
//!
//! Loaded by the launcher through `BootmgrMain`; loads the kernel module the
//! same way and returns the kernel's exit code.

pub mod flags;

use log::info;
use std::os::raw::c_int;
use whitebox::boot::{
    run_stage_or_report, BootChain, BootManagerArgs, FailureReporter, KernelArgs, SystemSink, KERNEL_STAGE,
};
use whitebox::runtime::LoadPolicy;
use whitebox::telemetry::init_logging;

/// Boot manager entry point.
#[no_mangle]
#[allow(non_snake_case, improper_ctypes_definitions)]
pub extern "C" fn BootmgrMain(args: &BootManagerArgs<'_>) -> c_int {
    init_logging(args.log);
    info!("boot manager started for {}", args.app_description);
    run_kernel(args)
}

fn run_kernel(args: &BootManagerArgs<'_>) -> c_int {
    let reporter = FailureReporter::new(args.app_description, args.intl, &SystemSink);
    let policy = LoadPolicy::from_insecure_flag(args.command_line_flags.insecure_allow_unsigned_module_target);
    let chain = match BootChain::for_current_exe(policy) {
        Ok(chain) => chain,
        Err(e) => reporter.report_fatal(&KERNEL_STAGE, &e),
    };

    let kernel_flags = flags::kernel_flags(&args.command_line_flags.positional_flags);
    let kernel_args = KernelArgs::new(
        args.platform,
        args.app_description,
        &kernel_flags,
        args.intl,
        args.log,
    );
    run_stage_or_report(&chain, &KERNEL_STAGE, &kernel_args, &reporter)
}
