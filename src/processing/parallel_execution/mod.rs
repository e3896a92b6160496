// 並列実行 - Producer / Consumer / Collector によるパイプライン

pub mod collector;
pub mod consumer;
pub mod pipeline;
pub mod producer;

pub use pipeline::ProcessingPipeline;
