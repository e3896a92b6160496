//! 画像のバッチリサイズ・フォーマット変換・リネームを行い、結果をzipアーカイブにまとめる

pub mod archive;
pub mod cli;
pub mod config;
pub mod core;
pub mod encoder;
pub mod image_loader;
pub mod naming;
pub mod preset;
pub mod processing;
pub mod resize;

pub use crate::core::{
    BatchResult, ErrorKind, InputItem, OutputFormat, Preset, ProcessedItem, ProcessingConfig,
    ProcessingError, ProcessingResult, RenamingRule, ResizeStrategy, TargetFormat,
};
pub use processing::process;
