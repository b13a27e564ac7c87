// CLASSIFICATION: COMMUNITY
// Filename: loader.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Shared library loading for boot chain modules.
//!
//! [`ModuleHandle`] owns exactly one OS load. The platform open primitive is
//! picked at build time; callers only ever see open, symbol lookup and close.

use libloading::Library;
use log::{debug, info, warn};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// `ERROR_FILE_NOT_FOUND` on Windows and `ENOENT` on POSIX share a value.
const FILE_NOT_FOUND: i32 = 2;

/// Whether the loader must refuse modules without a valid code signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadPolicy {
    pub require_signed_target: bool,
}

impl LoadPolicy {
    /// Policy derived from the `--insecure-allow-unsigned-module-target` flag.
    pub fn from_insecure_flag(insecure_allow_unsigned_module_target: bool) -> Self {
        Self {
            require_signed_target: !insecure_allow_unsigned_module_target,
        }
    }
}

impl Default for LoadPolicy {
    fn default() -> Self {
        Self {
            require_signed_target: true,
        }
    }
}

/// Raw platform flags for the OS loader call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadFlags(u32);

impl LoadFlags {
    /// Flags enforcing `policy` on the current platform.
    pub fn for_policy(policy: LoadPolicy) -> Self {
        Self(platform::flags_for(policy))
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

/// Failure to load a module from disk.
#[derive(Debug, Error)]
#[error("can't load module '{}'", path.display())]
pub struct LoadError {
    pub path: PathBuf,
    #[source]
    pub source: libloading::Error,
}

impl LoadError {
    /// OS error code behind the failure, if one can be recovered.
    pub fn os_code(&self) -> Option<i32> {
        let mut cause: Option<&(dyn std::error::Error + 'static)> = Some(&self.source);
        while let Some(err) = cause {
            if let Some(code) = err.downcast_ref::<io::Error>().and_then(io::Error::raw_os_error) {
                return Some(code);
            }
            cause = err.source();
        }
        // dlopen reports text only.
        if !self.path.exists() {
            return Some(FILE_NOT_FOUND);
        }
        None
    }
}

/// Exclusive owner of one loaded shared library.
pub struct ModuleHandle {
    path: PathBuf,
    library: Option<Library>,
}

impl ModuleHandle {
    /// Load the library at `path` with `flags`.
    ///
    /// Loading runs the module's static initialisers; the boot chain only
    /// opens modules it resolved next to its own executable.
    pub fn open(path: impl AsRef<Path>, flags: LoadFlags) -> Result<Self, LoadError> {
        let path = path.as_ref();
        debug!("opening module '{}' with flags {:#x}", path.display(), flags.bits());
        let library = platform::open(path, flags).map_err(|source| LoadError {
            path: path.to_path_buf(),
            source,
        })?;
        info!("module '{}' loaded", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            library: Some(library),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.library.is_some()
    }

    /// Release the OS handle. Returns `true` only for the call that released it.
    pub fn close(&mut self) -> bool {
        match self.library.take() {
            Some(library) => {
                if let Err(e) = library.close() {
                    warn!("module '{}' close reported: {e}", self.path.display());
                } else {
                    debug!("module '{}' released", self.path.display());
                }
                true
            }
            None => false,
        }
    }

    pub(crate) fn library(&self) -> Option<&Library> {
        self.library.as_ref()
    }
}

impl Drop for ModuleHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .finish()
    }
}

#[cfg(windows)]
mod platform {
    use super::{LoadFlags, LoadPolicy};
    use libloading::Library;
    use std::path::Path;

    const LOAD_WITH_ALTERED_SEARCH_PATH: u32 = 0x0000_0008;
    const LOAD_LIBRARY_REQUIRE_SIGNED_TARGET: u32 = 0x0000_0080;

    pub(super) fn flags_for(policy: LoadPolicy) -> u32 {
        let mut flags = LOAD_WITH_ALTERED_SEARCH_PATH;
        if policy.require_signed_target {
            flags |= LOAD_LIBRARY_REQUIRE_SIGNED_TARGET;
        }
        flags
    }

    pub(super) fn open(path: &Path, flags: LoadFlags) -> Result<Library, libloading::Error> {
        // SAFETY: module initialisers run here; paths come from the resolver only.
        unsafe { libloading::os::windows::Library::load_with_flags(path, flags.bits()) }
            .map(Library::from)
    }
}

#[cfg(unix)]
mod platform {
    use super::{LoadFlags, LoadPolicy};
    use libloading::os::unix::{RTLD_LAZY, RTLD_LOCAL};
    use libloading::Library;
    use log::debug;
    use std::os::raw::c_int;
    use std::path::Path;

    #[cfg(target_os = "macos")]
    const RTLD_FIRST: c_int = 0x100;

    pub(super) fn flags_for(policy: LoadPolicy) -> u32 {
        if policy.require_signed_target {
            // Library validation belongs to the OS here, dlopen has no flag.
            debug!("signed module targets are enforced by the platform loader");
        }
        #[cfg(target_os = "macos")]
        let flags = RTLD_LAZY | RTLD_LOCAL | RTLD_FIRST;
        #[cfg(not(target_os = "macos"))]
        let flags = RTLD_LAZY | RTLD_LOCAL;
        flags as u32
    }

    pub(super) fn open(path: &Path, flags: LoadFlags) -> Result<Library, libloading::Error> {
        // SAFETY: module initialisers run here; paths come from the resolver only.
        unsafe { libloading::os::unix::Library::open(Some(path), flags.bits() as c_int) }
            .map(Library::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_module_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libmissing.so");
        let err = ModuleHandle::open(&path, LoadFlags::for_policy(LoadPolicy::default())).unwrap_err();
        assert_eq!(err.path, path);
        #[cfg(unix)]
        assert_eq!(err.os_code(), Some(FILE_NOT_FOUND));
        assert!(err.to_string().contains("libmissing.so"));
    }

    #[test]
    fn open_garbage_module_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libgarbage.so");
        std::fs::write(&path, b"definitely not a shared object").unwrap();
        let err = ModuleHandle::open(&path, LoadFlags::for_policy(LoadPolicy::default())).unwrap_err();
        assert_eq!(err.path, path);
    }

    #[test]
    fn insecure_flag_drops_signature_requirement() {
        assert!(LoadPolicy::from_insecure_flag(false).require_signed_target);
        assert!(!LoadPolicy::from_insecure_flag(true).require_signed_target);
    }

    #[cfg(windows)]
    #[test]
    fn windows_flags_follow_policy() {
        let strict = LoadFlags::for_policy(LoadPolicy::default()).bits();
        let loose = LoadFlags::for_policy(LoadPolicy::from_insecure_flag(true)).bits();
        assert_eq!(strict, 0x88);
        assert_eq!(loose, 0x08);
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    mod linux {
        use super::*;

        fn libc() -> ModuleHandle {
            ModuleHandle::open("libc.so.6", LoadFlags::for_policy(LoadPolicy::default())).unwrap()
        }

        #[test]
        fn close_releases_once() {
            let mut module = libc();
            assert!(module.is_open());
            assert!(module.close());
            assert!(!module.is_open());
            assert!(!module.close());
        }

        #[test]
        fn moved_handle_keeps_ownership() {
            let module = libc();
            let mut moved = module;
            assert!(moved.is_open());
            assert!(moved.close());
            drop(moved);
        }
    }
}
