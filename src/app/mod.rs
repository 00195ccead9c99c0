// iconforge - app/mod.rs
//
// Application layer: run orchestration over the core and platform layers.

pub mod generator;
