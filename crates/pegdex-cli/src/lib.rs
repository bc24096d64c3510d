//! Pegdex CLI library.
//!
//! This crate provides the pipeline that ties classification, extraction,
//! sprite geometry and correlation together, plus the commands of the
//! `pegdex` binary.

pub mod commands;
pub mod config;
pub mod input;
pub mod pipeline;

pub use config::PipelineConfig;
pub use input::{AssetInput, AssetSource, BatchInput, SpriteInput};
pub use pipeline::{BatchOutput, BatchReport, Pipeline};
