// iconforge - core/mod.rs
//
// Core imaging layer: data model, source decoding, contain-fit rendering,
// and encoding. Pure transformations; the only I/O is reading the source.
// Must NOT depend on: platform or app.

pub mod encode;
pub mod model;
pub mod render;
pub mod source;
