// iconforge - lib.rs
//
// Library entry point, exposing all modules for integration testing and
// for build scripts that want to drive a run programmatically.
//
// The command-line front end lives in `main.rs`.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
