//! Command implementations for the pegdex binary.

pub mod cache;
pub mod extract;
