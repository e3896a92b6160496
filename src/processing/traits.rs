// バッチ処理のトレイト定義

use async_trait::async_trait;
use mockall::automock;

/// ワーカー実行設定を抽象化するトレイト
#[automock]
pub trait WorkerConfig: Send + Sync {
    /// 最大同時実行タスク数を取得
    fn max_concurrent_tasks(&self) -> usize;

    /// チャンネルバッファサイズを取得
    fn channel_buffer_size(&self) -> usize;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

impl WorkerConfig for Box<dyn WorkerConfig> {
    fn max_concurrent_tasks(&self) -> usize {
        self.as_ref().max_concurrent_tasks()
    }

    fn channel_buffer_size(&self) -> usize {
        self.as_ref().channel_buffer_size()
    }

    fn enable_progress_reporting(&self) -> bool {
        self.as_ref().enable_progress_reporting()
    }
}

/// 進捗報告の抽象化トレイト
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    async fn report_started(&self, total_items: usize);

    /// 進捗更新の報告（完了順）
    async fn report_progress(&self, completed: usize, total: usize);

    /// アイテム失敗時の報告
    async fn report_error(&self, source_name: &str, error: &str);

    /// 処理完了時の報告
    async fn report_completed(&self, succeeded: usize, failed: usize);
}

#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, total_items: usize) {
        self.as_ref().report_started(total_items).await
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        self.as_ref().report_progress(completed, total).await
    }

    async fn report_error(&self, source_name: &str, error: &str) {
        self.as_ref().report_error(source_name, error).await
    }

    async fn report_completed(&self, succeeded: usize, failed: usize) {
        self.as_ref().report_completed(succeeded, failed).await
    }
}
