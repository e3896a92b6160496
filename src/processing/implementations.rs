// ワーカー設定と進捗報告の具象実装

use super::traits::{ProgressReporter, WorkerConfig};
use async_trait::async_trait;

/// デフォルトのワーカー設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultWorkerConfig {
    max_concurrent: usize,
    buffer_size: usize,
    enable_progress: bool,
}

impl DefaultWorkerConfig {
    pub fn new(cpu_count: usize) -> Self {
        Self {
            max_concurrent: cpu_count.max(1),
            buffer_size: 100,
            enable_progress: true,
        }
    }

    /// バランスの取れたデフォルト設定
    pub fn default_profile() -> Self {
        Self::new(num_cpus::get()).with_buffer_size(100)
    }

    /// 高スループット設定
    pub fn high_performance() -> Self {
        Self::new(num_cpus::get() * 2).with_buffer_size(500)
    }

    /// テスト用軽量設定（単一ワーカー、進捗報告なし）
    pub fn testing() -> Self {
        Self::new(1)
            .with_buffer_size(10)
            .with_progress_reporting(false)
    }

    /// 名前からプロファイルを取得
    pub fn from_profile(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default_profile()),
            "high_performance" => Some(Self::high_performance()),
            "testing" => Some(Self::testing()),
            _ => None,
        }
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }
}

/// 利用可能なプロファイル名
pub const PROFILE_NAMES: [&str; 3] = ["default", "high_performance", "testing"];

impl Default for DefaultWorkerConfig {
    fn default() -> Self {
        Self::default_profile()
    }
}

impl WorkerConfig for DefaultWorkerConfig {
    fn max_concurrent_tasks(&self) -> usize {
        self.max_concurrent
    }

    fn channel_buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}

/// コンソール出力による進捗報告実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, total_items: usize) {
        if !self.quiet {
            println!("🚀 Processing {total_items} images...");
        }
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        if !self.quiet && total > 0 && (completed % 10 == 0 || completed == total) {
            let percentage = (completed as f64 / total as f64) * 100.0;
            println!("📊 Progress: {completed}/{total} ({percentage:.1}%)");
        }
    }

    async fn report_error(&self, source_name: &str, error: &str) {
        if !self.quiet {
            eprintln!("❌ Error processing {source_name}: {error}");
        }
    }

    async fn report_completed(&self, succeeded: usize, failed: usize) {
        if !self.quiet {
            println!("✅ Completed! Succeeded: {succeeded}, Failed: {failed}");
        }
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_items: usize) {}

    async fn report_progress(&self, _completed: usize, _total: usize) {}

    async fn report_error(&self, _source_name: &str, _error: &str) {}

    async fn report_completed(&self, _succeeded: usize, _failed: usize) {}
}
