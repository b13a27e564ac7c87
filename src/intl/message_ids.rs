// CLASSIFICATION: COMMUNITY
// Filename: message_ids.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Identifiers for every user-facing boot chain message.

/// Localized message id. English text is fallback only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum MessageId {
    BootmgrErrorDialogTitle = 3,
    CantGetExecutableDirectoryForBootManager = 7,
    CantGetLibraryEntryPoint = 9,
    PleaseReinstallTheApp = 11,
    CantLoadKernelFrom = 12,
    AppErrorDialogTitle = 13,
    PleaseCheckAppInstalledCorrectly = 14,
    CantGetCurrentDirectoryUnableToLoadTheApp = 15,
    CantLoadBootManager = 16,
    CantParseCommandLineFlags = 22,
    PleaseEnsureFreeMemoryAndCommandLine = 23,
}

impl MessageId {
    pub const ALL: [MessageId; 11] = [
        Self::BootmgrErrorDialogTitle,
        Self::CantGetExecutableDirectoryForBootManager,
        Self::CantGetLibraryEntryPoint,
        Self::PleaseReinstallTheApp,
        Self::CantLoadKernelFrom,
        Self::AppErrorDialogTitle,
        Self::PleaseCheckAppInstalledCorrectly,
        Self::CantGetCurrentDirectoryUnableToLoadTheApp,
        Self::CantLoadBootManager,
        Self::CantParseCommandLineFlags,
        Self::PleaseEnsureFreeMemoryAndCommandLine,
    ];

    /// Catalog key used in `<locale>.toml` files.
    pub fn key(self) -> &'static str {
        match self {
            Self::BootmgrErrorDialogTitle => "bootmgr_error_dialog_title",
            Self::CantGetExecutableDirectoryForBootManager => {
                "cant_get_executable_directory_for_boot_manager"
            }
            Self::CantGetLibraryEntryPoint => "cant_get_library_entry_point",
            Self::PleaseReinstallTheApp => "please_reinstall_the_app",
            Self::CantLoadKernelFrom => "cant_load_kernel_from",
            Self::AppErrorDialogTitle => "app_error_dialog_title",
            Self::PleaseCheckAppInstalledCorrectly => "please_check_app_installed_correctly",
            Self::CantGetCurrentDirectoryUnableToLoadTheApp => {
                "cant_get_current_directory_unable_to_load_the_app"
            }
            Self::CantLoadBootManager => "cant_load_boot_manager",
            Self::CantParseCommandLineFlags => "cant_parse_command_line_flags",
            Self::PleaseEnsureFreeMemoryAndCommandLine => {
                "please_ensure_free_memory_and_command_line"
            }
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }

    /// Built-in English text.
    pub fn fallback(self) -> &'static str {
        match self {
            Self::BootmgrErrorDialogTitle => "Boot Manager - Error",
            Self::CantGetExecutableDirectoryForBootManager => {
                "Can't get current directory.  Unable to load the kernel."
            }
            Self::CantGetLibraryEntryPoint => "Can't get '{0}' entry point from '{1}'.",
            Self::PleaseReinstallTheApp => "Looks like app is broken, please, reinstall the one.",
            Self::CantLoadKernelFrom => "Can't load whitebox kernel '{0}'.",
            Self::AppErrorDialogTitle => "{0} - Error",
            Self::PleaseCheckAppInstalledCorrectly => {
                "Please, check app is installed correctly and you have enough permissions to run it."
            }
            Self::CantGetCurrentDirectoryUnableToLoadTheApp => {
                "Can't get current directory.  Unable to load the app."
            }
            Self::CantLoadBootManager => "Can't load boot manager '{0}'.",
            Self::CantParseCommandLineFlags => "Can't parse command line flags.  See log for details.",
            Self::PleaseEnsureFreeMemoryAndCommandLine => {
                "Please ensure you have enough free memory and use command line correctly."
            }
        }
    }
}
