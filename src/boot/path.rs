// CLASSIFICATION: COMMUNITY
// Filename: path.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Where the next module of the chain lives on disk.
//!
//! Everything is resolved relative to the running executable as reported by
//! the OS, never from argv[0].

use crate::boot::error::BootError;
use std::path::{Path, PathBuf};

pub const PRODUCT_NAME: &str = "WhiteBox";
pub const PRODUCT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Logical name of a chain module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModuleName {
    BootManager,
    Kernel,
}

impl ModuleName {
    /// Library stem as produced by the module's crate.
    pub fn stem(self) -> &'static str {
        match self {
            Self::BootManager => "boot_manager",
            Self::Kernel => "kernel",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BootManager => "boot manager",
            Self::Kernel => "kernel",
        }
    }
}

/// On-disk layout conventions of a platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlatformLayout {
    /// `<exe dir>\<stem>.dll`
    Windows,
    /// `<exe dir>/../Frameworks/<P> Framework.framework/Versions/<v>/<P> Framework/lib<stem>.dylib`
    MacOs { product: String, version: String },
    /// `<exe dir>/lib<stem>.so`
    Posix,
}

impl PlatformLayout {
    /// Layout of the platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs {
                product: PRODUCT_NAME.to_string(),
                version: PRODUCT_VERSION.to_string(),
            }
        } else {
            Self::Posix
        }
    }

    pub fn module_file_name(&self, module: ModuleName) -> String {
        match self {
            Self::Windows => format!("{}.dll", module.stem()),
            Self::MacOs { .. } => format!("lib{}.dylib", module.stem()),
            Self::Posix => format!("lib{}.so", module.stem()),
        }
    }

    fn module_dir(&self, exe_dir: &Path) -> PathBuf {
        match self {
            Self::MacOs { product, version } => exe_dir
                .join("..")
                .join("Frameworks")
                .join(format!("{product} Framework.framework"))
                .join("Versions")
                .join(version)
                .join(format!("{product} Framework")),
            Self::Windows | Self::Posix => exe_dir.to_path_buf(),
        }
    }
}

/// Absolute path of `module` for an executable at `exe`.
///
/// Pure: depends only on `exe`'s directory and `layout`.
pub fn module_path(exe: &Path, module: ModuleName, layout: &PlatformLayout) -> Result<PathBuf, BootError> {
    if !exe.is_absolute() {
        return Err(BootError::ModuleDirectory(exe.to_path_buf()));
    }
    let exe_dir = exe
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .ok_or_else(|| BootError::ModuleDirectory(exe.to_path_buf()))?;
    Ok(layout
        .module_dir(exe_dir)
        .join(layout.module_file_name(module)))
}

/// Path of the running executable, straight from the OS.
pub fn current_exe_path() -> Result<PathBuf, BootError> {
    std::env::current_exe().map_err(BootError::ExecutablePath)
}
