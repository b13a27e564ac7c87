// CLASSIFICATION: COMMUNITY
// Filename: lib.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Test stage module. Exports `KernelMain` only, so loading it as the boot
//! manager fails symbol resolution.

use std::ffi::c_void;
use std::os::raw::c_int;

pub const STAGE_EXIT_CODE: c_int = 42;

#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn KernelMain(_args: *const c_void) -> c_int {
    STAGE_EXIT_CODE
}
