// CLASSIFICATION: COMMUNITY
// Filename: logging.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Process-wide logger setup on top of `env_logger`.
//!
//! Every loaded module carries its own copy of the `log` statics, so the
//! launcher and each module install a logger independently.

use crate::config::LogConfig;
use log::{error, warn};
use once_cell::sync::OnceCell;
use std::fs::OpenOptions;
use std::io;

static PANIC_HOOK: OnceCell<()> = OnceCell::new();
static STDERR_TARGET: OnceCell<bool> = OnceCell::new();

/// Install the logger described by `config`.
///
/// Returns `false` when a logger was already installed in this module.
pub fn init_logging(config: &LogConfig) -> bool {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&config.level);
    let mut file_error: Option<(String, io::Error)> = None;
    if let Some(path) = &config.file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => file_error = Some((path.display().to_string(), e)),
        }
    }
    let on_stderr = config.file.is_none() || file_error.is_some();
    let installed = builder.try_init().is_ok();
    if installed {
        let _ = STDERR_TARGET.set(on_stderr);
    }
    if let Some((path, e)) = file_error {
        warn!("can't open log file '{path}', logging to stderr: {e}");
    }
    installed
}

/// Whether the installed logger writes to stderr.
pub fn logs_to_stderr() -> bool {
    STDERR_TARGET.get().copied().unwrap_or(false)
}

/// Route panics through the logger before the previous hook runs.
///
/// Installs once per process; returns `true` only for the installing call.
pub fn init_panic_hook() -> bool {
    let mut installed = false;
    PANIC_HOOK.get_or_init(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            error!("panic: {info}");
            log::logger().flush();
            default_hook(info);
        }));
        installed = true;
    });
    installed
}
