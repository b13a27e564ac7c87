// CLASSIFICATION: COMMUNITY
// Filename: entry.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Entry point resolution and invocation.

use crate::runtime::loader::ModuleHandle;
use log::debug;
use std::marker::PhantomData;
use std::os::raw::c_int;
use std::path::PathBuf;
use thiserror::Error;

/// Contract every boot chain entry point follows: one borrowed argument
/// bundle in, one integer exit code out.
pub type EntryFn<A> = unsafe extern "C" fn(&A) -> c_int;

/// Failure to resolve an exported entry point.
#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("can't get '{symbol}' entry point from '{}'", path.display())]
    Missing {
        symbol: String,
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("can't get '{symbol}' entry point from released module '{}'", path.display())]
    Released { symbol: String, path: PathBuf },
}

impl SymbolError {
    pub fn symbol(&self) -> &str {
        match self {
            Self::Missing { symbol, .. } | Self::Released { symbol, .. } => symbol,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Missing { path, .. } | Self::Released { path, .. } => path,
        }
    }
}

/// Resolved entry point, borrowed from the module that exports it.
pub struct EntryPoint<'lib, A> {
    name: String,
    func: EntryFn<A>,
    _module: PhantomData<&'lib ModuleHandle>,
}

impl<'lib, A> EntryPoint<'lib, A> {
    /// Look up `name` in `module`. The module stays open either way.
    pub fn resolve(module: &'lib ModuleHandle, name: &str) -> Result<Self, SymbolError> {
        let library = module.library().ok_or_else(|| SymbolError::Released {
            symbol: name.to_string(),
            path: module.path().to_path_buf(),
        })?;
        // SAFETY: the symbol type is the entry contract; a module exporting
        // `name` with another signature breaks the chain's ABI.
        let symbol = unsafe { library.get::<EntryFn<A>>(name.as_bytes()) }.map_err(|source| {
            SymbolError::Missing {
                symbol: name.to_string(),
                path: module.path().to_path_buf(),
                source,
            }
        })?;
        debug!("resolved '{name}' in '{}'", module.path().display());
        Ok(Self {
            name: name.to_string(),
            func: *symbol,
            _module: PhantomData,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Call the entry point and hand back its return code untouched.
    ///
    /// # Safety
    ///
    /// The exported function must really have the [`EntryFn<A>`] signature.
    pub unsafe fn call(&self, args: &A) -> i32 {
        debug!("entering '{}'", self.name);
        let code = (self.func)(args);
        debug!("'{}' returned {code}", self.name);
        code
    }
}

impl<A> EntryPoint<'static, A> {
    /// Wrap an entry point that is linked in rather than loaded.
    pub fn from_fn(name: &str, func: EntryFn<A>) -> Self {
        Self {
            name: name.to_string(),
            func,
            _module: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    struct Bundle {
        code: i32,
    }

    unsafe extern "C" fn echo(args: &Bundle) -> c_int {
        args.code
    }

    #[test]
    fn call_returns_entry_code_unchanged() {
        let entry = EntryPoint::from_fn("echo", echo as EntryFn<Bundle>);
        for code in [0, 1, -1, 42, i32::MIN, i32::MAX] {
            assert_eq!(unsafe { entry.call(&Bundle { code }) }, code);
        }
        assert_eq!(entry.name(), "echo");
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn missing_symbol_leaves_module_open() {
        use crate::runtime::loader::{LoadFlags, LoadPolicy};

        let module =
            ModuleHandle::open("libc.so.6", LoadFlags::for_policy(LoadPolicy::default())).unwrap();
        let err = EntryPoint::<Bundle>::resolve(&module, "KernelMain").err().unwrap();
        assert_eq!(err.symbol(), "KernelMain");
        assert!(err.to_string().contains("libc.so.6"));
        assert!(module.is_open());
        assert!(EntryPoint::<Bundle>::resolve(&module, "getpid").is_ok());
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn released_module_has_no_symbols() {
        use crate::runtime::loader::{LoadFlags, LoadPolicy};

        let mut module =
            ModuleHandle::open("libc.so.6", LoadFlags::for_policy(LoadPolicy::default())).unwrap();
        module.close();
        let err = EntryPoint::<Bundle>::resolve(&module, "getpid").err().unwrap();
        assert!(matches!(err, SymbolError::Released { .. }));
    }
}
