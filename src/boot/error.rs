// CLASSIFICATION: COMMUNITY
// Filename: error.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-16

use crate::boot::chain::Stage;
use crate::config::ConfigError;
use crate::intl::{LocalizedMessage, MessageId};
use crate::runtime::{LoadError, SymbolError};
use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Terminal failure of a boot chain stage.
#[derive(Debug, Error)]
pub enum BootError {
    #[error("can't determine the running executable path")]
    ExecutablePath(#[source] io::Error),
    #[error("can't derive module directory from '{}'", .0.display())]
    ModuleDirectory(PathBuf),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Symbol(#[from] SymbolError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BootError {
    /// Raw OS error behind the failure, if any.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            Self::ExecutablePath(e) => e.raw_os_error(),
            Self::Load(e) => e.os_code(),
            _ => {
                let mut cause = self.source();
                while let Some(err) = cause {
                    if let Some(code) = err.downcast_ref::<io::Error>().and_then(io::Error::raw_os_error) {
                        return Some(code);
                    }
                    cause = err.source();
                }
                None
            }
        }
    }

    /// Process exit code for this failure. Never zero.
    pub fn exit_code(&self) -> i32 {
        let code = self.os_code().unwrap_or(1);
        // POSIX keeps the low byte only.
        let code = if cfg!(unix) { code & 0xff } else { code };
        if code == 0 {
            1
        } else {
            code
        }
    }

    /// Localized explanation naming the failing path or symbol.
    pub fn explanation(&self, stage: &Stage) -> LocalizedMessage {
        match self {
            Self::ExecutablePath(_) | Self::ModuleDirectory(_) => {
                LocalizedMessage::new(stage.directory_failure)
            }
            Self::Load(e) => {
                LocalizedMessage::with_args(stage.load_failure, [e.path.display().to_string()])
            }
            Self::Symbol(e) => LocalizedMessage::with_args(
                MessageId::CantGetLibraryEntryPoint,
                [e.symbol().to_string(), e.path().display().to_string()],
            ),
            Self::Config(_) => LocalizedMessage::new(MessageId::CantParseCommandLineFlags),
        }
    }

    /// Localized remediation hint shown above the explanation.
    pub fn remediation(&self, stage: &Stage) -> LocalizedMessage {
        match self {
            Self::Config(_) => LocalizedMessage::new(MessageId::PleaseEnsureFreeMemoryAndCommandLine),
            _ => LocalizedMessage::new(stage.remediation),
        }
    }
}

/// `error` and all of its sources joined with `: `.
pub fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut text = error.to_string();
    let mut cause = error.source();
    while let Some(err) = cause {
        let part = err.to_string();
        if !text.contains(&part) {
            text.push_str(": ");
            text.push_str(&part);
        }
        cause = err.source();
    }
    text
}
