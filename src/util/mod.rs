// iconforge - util/mod.rs
//
// Utility modules: error types, named constants, logging setup.
// Depends only on the plain data types in core::model.

pub mod constants;
pub mod error;
pub mod logging;
