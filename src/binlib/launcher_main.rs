// CLASSIFICATION: COMMUNITY
// Filename: launcher_main.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-10-16

use crate::boot::{
    run_stage_or_report, BootChain, BootError, BootManagerArgs, CommandLineFlags, FailureReporter,
    PlatformArgs, ProcessContext, SystemSink, BOOT_MANAGER_STAGE,
};
use crate::config::{BootConfig, ConfigError, LauncherFlags};
use crate::runtime::LoadPolicy;
use log::warn;

/// Shown in titles and handed to every stage.
pub const APP_DESCRIPTION: &str = "WhiteBox";
/// Icon resource ids compiled into the Windows executable.
pub const MAIN_ICON_ID: i32 = 101;
pub const SMALL_ICON_ID: i32 = 102;

/// Boot the launcher: set up the process, then hand over to the boot manager.
///
/// Returns the boot manager's exit code. Failures never return.
pub fn run() -> i32 {
    let parsed = LauncherFlags::try_parse_args(std::env::args_os());
    if let Err(e) = &parsed {
        if !e.use_stderr() {
            // --help and --version.
            e.exit();
        }
    }
    let config = match &parsed {
        Ok(flags) => BootConfig::resolve(flags),
        Err(_) => Ok(BootConfig::default()),
    };
    let (config, config_error) = match config {
        Ok(config) => (config, None),
        Err(e) => (BootConfig::default(), Some(e)),
    };

    let context = ProcessContext::init(config);
    let reporter = FailureReporter::new(APP_DESCRIPTION, context.lookup(), &SystemSink);

    let flags = match parsed {
        Ok(flags) => flags,
        Err(e) => reporter.report_fatal(&BOOT_MANAGER_STAGE, &BootError::Config(ConfigError::Flags(e))),
    };
    if let Some(e) = config_error {
        reporter.report_fatal(&BOOT_MANAGER_STAGE, &BootError::Config(e));
    }

    let policy = LoadPolicy::from_insecure_flag(flags.insecure_allow_unsigned_module_target);
    if !policy.require_signed_target {
        warn!("INSECURE: signed module target enforcement is disabled, unsigned modules will load");
    }

    let chain = match BootChain::for_current_exe(policy) {
        Ok(chain) => chain,
        Err(e) => reporter.report_fatal(&BOOT_MANAGER_STAGE, &e),
    };
    let command_line_flags = CommandLineFlags {
        positional_flags: flags.positional_flags,
        insecure_allow_unsigned_module_target: flags.insecure_allow_unsigned_module_target,
    };
    let args = BootManagerArgs::new(
        PlatformArgs::current(MAIN_ICON_ID, SMALL_ICON_ID),
        APP_DESCRIPTION,
        &command_line_flags,
        context.lookup(),
        &context.config().log,
    );
    run_stage_or_report(&chain, &BOOT_MANAGER_STAGE, &args, &reporter)
}
