// CLASSIFICATION: COMMUNITY
// Filename: args.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Argument bundles handed to chain entry points.
//!
//! Bundles borrow everything they carry for the duration of one entry call.
//! Both sides of the call are built from this crate, so the layouts match.

use crate::config::LogConfig;
use crate::intl::Lookup;

/// Platform process data for the window owner.
#[cfg(windows)]
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct PlatformArgs {
    /// `HINSTANCE` of the launcher executable.
    pub instance: *mut core::ffi::c_void,
    pub show_window_flags: i32,
    pub main_icon_id: i32,
    pub small_icon_id: i32,
}

#[cfg(windows)]
impl PlatformArgs {
    const SW_SHOWDEFAULT: i32 = 10;

    pub fn current(main_icon_id: i32, small_icon_id: i32) -> Self {
        #[link(name = "kernel32")]
        extern "system" {
            fn GetModuleHandleW(name: *const u16) -> *mut core::ffi::c_void;
        }
        // SAFETY: a null name asks for the executable's own module handle.
        let instance = unsafe { GetModuleHandleW(std::ptr::null()) };
        Self {
            instance,
            show_window_flags: Self::SW_SHOWDEFAULT,
            main_icon_id,
            small_icon_id,
        }
    }
}

/// Platform process data. POSIX stages need none.
#[cfg(not(windows))]
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct PlatformArgs {
    _reserved: u8,
}

#[cfg(not(windows))]
impl PlatformArgs {
    pub fn current(_main_icon_id: i32, _small_icon_id: i32) -> Self {
        Self::default()
    }
}

/// Command line data the launcher forwards to the boot manager.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandLineFlags {
    pub positional_flags: Vec<String>,
    pub insecure_allow_unsigned_module_target: bool,
}

/// Boot manager entry point input.
#[repr(C)]
pub struct BootManagerArgs<'a> {
    pub platform: PlatformArgs,
    pub app_description: &'a str,
    pub command_line_flags: &'a CommandLineFlags,
    pub intl: &'a dyn Lookup,
    /// Launcher's resolved logging setup; every module installs the same.
    pub log: &'a LogConfig,
}

impl<'a> BootManagerArgs<'a> {
    pub fn new(
        platform: PlatformArgs,
        app_description: &'a str,
        command_line_flags: &'a CommandLineFlags,
        intl: &'a dyn Lookup,
        log: &'a LogConfig,
    ) -> Self {
        Self {
            platform,
            app_description,
            command_line_flags,
            intl,
            log,
        }
    }
}

/// Kernel settings the boot manager extracts from positional flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelFlags {
    pub main_window_width: i32,
    pub main_window_height: i32,
    /// Positional flags the boot manager did not consume.
    pub positional_flags: Vec<String>,
}

impl Default for KernelFlags {
    fn default() -> Self {
        Self {
            main_window_width: 1024,
            main_window_height: 768,
            positional_flags: Vec::new(),
        }
    }
}

/// Kernel entry point input.
#[repr(C)]
pub struct KernelArgs<'a> {
    pub platform: PlatformArgs,
    pub app_description: &'a str,
    pub kernel_flags: &'a KernelFlags,
    pub intl: &'a dyn Lookup,
    /// Launcher's resolved logging setup; every module installs the same.
    pub log: &'a LogConfig,
}

impl<'a> KernelArgs<'a> {
    pub fn new(
        platform: PlatformArgs,
        app_description: &'a str,
        kernel_flags: &'a KernelFlags,
        intl: &'a dyn Lookup,
        log: &'a LogConfig,
    ) -> Self {
        Self {
            platform,
            app_description,
            kernel_flags,
            intl,
            log,
        }
    }
}
