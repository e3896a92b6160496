// Pipeline - Producer-Consumer-Collector パイプライン

use super::{collector::spawn_result_collector, consumer::spawn_consumers, producer::spawn_producer};
use crate::{
    core::{InputItem, ProcessingError, ProcessingResult},
    encoder::EncoderBackend,
    image_loader::ImageLoaderBackend,
    processing::{
        item::{ItemOutcome, TransformPlan},
        traits::{ProgressReporter, WorkerConfig},
    },
};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// 並列変換パイプライン
///
/// 結果は完了順ではなく入力順で返す。
pub struct ProcessingPipeline<L, E> {
    loader: Arc<L>,
    encoder: Arc<E>,
}

impl<L, E> ProcessingPipeline<L, E>
where
    L: ImageLoaderBackend + 'static,
    E: EncoderBackend + 'static,
{
    pub fn new(loader: Arc<L>, encoder: Arc<E>) -> Self {
        Self { loader, encoder }
    }

    /// 全アイテムを変換し、入力順の結果を返す
    pub async fn execute<C, R>(
        &self,
        items: Vec<InputItem>,
        plan: TransformPlan,
        config: &C,
        reporter: Option<Arc<R>>,
    ) -> ProcessingResult<Vec<ItemOutcome>>
    where
        C: WorkerConfig + ?Sized,
        R: ProgressReporter + ?Sized + 'static,
    {
        let total_items = items.len();
        if total_items == 0 {
            return Ok(Vec::new());
        }

        // 入力順のスロット埋め用に名前を控えておく
        let source_names: Vec<String> = items.iter().map(|item| item.name.clone()).collect();

        let buffer_size = config.channel_buffer_size().max(1);
        let worker_count = config.max_concurrent_tasks().max(1).min(total_items);

        let (work_tx, work_rx) = mpsc::channel(buffer_size);
        let (result_tx, result_rx) = mpsc::channel(buffer_size);
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_tasks().max(1)));

        let producer_handle = spawn_producer(items, work_tx);

        let consumer_handles = spawn_consumers(
            Arc::clone(&self.loader),
            Arc::clone(&self.encoder),
            Arc::new(plan),
            work_rx,
            result_tx,
            semaphore,
            worker_count,
        );

        let collector_handle = spawn_result_collector(result_rx, total_items, reporter);

        producer_handle.await??;
        for handle in consumer_handles {
            handle.await??;
        }
        let slots = collector_handle.await??;

        Ok(slots
            .into_iter()
            .zip(source_names)
            .enumerate()
            .map(|(index, (slot, source_name))| {
                slot.unwrap_or_else(|| {
                    let error = ProcessingError::channel("ワーカーから結果が返りませんでした");
                    ItemOutcome::failed(index, source_name, &error)
                })
            })
            .collect())
    }
}
