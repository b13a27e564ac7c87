// CLASSIFICATION: COMMUNITY
// Filename: main.rs v2.0
// Date Modified: 2026-10-16
// Author: Lukas Bower

//! Entry point for the WhiteBox launcher binary.

extern crate whitebox;
use whitebox::binlib::launcher_main;

fn main() {
    let code = launcher_main::run();
    std::process::exit(code);
}
