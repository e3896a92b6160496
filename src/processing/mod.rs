// バッチオーケストレーター - アイテムごとの変換を並列に実行し、入力順に確定する

pub mod api;
pub mod engine;
pub mod implementations;
pub mod item;
pub mod parallel_execution;
pub mod traits;

#[cfg(test)]
pub mod tests;

pub use api::{create_default_processing_engine, create_quiet_processing_engine, process};
pub use engine::{assemble_batch, ProcessingEngine};
pub use implementations::{
    ConsoleProgressReporter, DefaultWorkerConfig, NoOpProgressReporter, PROFILE_NAMES,
};
pub use item::{ItemLifecycle, ItemOutcome, TransformPlan, TransformedItem};
pub use traits::{MockWorkerConfig, ProgressReporter, WorkerConfig};
