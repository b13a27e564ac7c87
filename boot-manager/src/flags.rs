// CLASSIFICATION: COMMUNITY
// Filename: flags.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Kernel settings carried in the launcher's positional flags.

use clap::Parser;
use log::warn;
use whitebox::boot::KernelFlags;

#[derive(Parser, Debug)]
#[command(name = "boot-manager", no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
struct KernelCli {
    #[arg(long, default_value_t = 1024, value_parser = clap::value_parser!(i32).range(1..))]
    main_window_width: i32,
    #[arg(long, default_value_t = 768, value_parser = clap::value_parser!(i32).range(1..))]
    main_window_height: i32,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    rest: Vec<String>,
}

/// Pull `--main-window-width` and `--main-window-height` out of `positional`.
///
/// Malformed values are logged and replaced by defaults; the kernel still starts.
pub fn kernel_flags(positional: &[String]) -> KernelFlags {
    match KernelCli::try_parse_from(positional) {
        Ok(cli) => KernelFlags {
            main_window_width: cli.main_window_width,
            main_window_height: cli.main_window_height,
            positional_flags: cli.rest,
        },
        Err(e) => {
            warn!("ignoring kernel flags, using defaults: {e}");
            KernelFlags {
                positional_flags: positional.to_vec(),
                ..KernelFlags::default()
            }
        }
    }
}
