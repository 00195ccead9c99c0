// iconforge - platform/mod.rs
//
// Platform layer: config file loading and filesystem persistence.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
