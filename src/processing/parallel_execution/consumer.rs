// Consumer - 並列ワーカー機能

use super::producer::WorkItem;
use crate::{
    core::{ProcessingError, ProcessingResult},
    encoder::EncoderBackend,
    image_loader::ImageLoaderBackend,
    processing::item::{transform_item, ItemOutcome, TransformPlan},
};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Semaphore};
use tracing::warn;

/// 単一Consumerワーカー
pub fn spawn_single_consumer<L, E>(
    worker_id: usize,
    loader: Arc<L>,
    encoder: Arc<E>,
    plan: Arc<TransformPlan>,
    work_rx: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
    result_tx: mpsc::Sender<ItemOutcome>,
    semaphore: Arc<Semaphore>,
) -> tokio::task::JoinHandle<ProcessingResult<()>>
where
    L: ImageLoaderBackend + 'static,
    E: EncoderBackend + 'static,
{
    tokio::spawn(async move {
        loop {
            // 次の作業を取得
            let (index, item) = {
                let mut rx = work_rx.lock().await;
                match rx.recv().await {
                    Some(work) => work,
                    None => break,
                }
            };

            // セマフォで同時実行数制御
            let _permit = semaphore
                .acquire()
                .await
                .map_err(|e| ProcessingError::channel(format!("セマフォエラー: {e}")))?;

            // パニックしてもアイテム単位の失敗として扱う
            let source_name = item.name.clone();
            let task = tokio::spawn({
                let loader = Arc::clone(&loader);
                let encoder = Arc::clone(&encoder);
                let plan = Arc::clone(&plan);
                async move { transform_item(loader.as_ref(), encoder, &plan, index, item).await }
            });
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    warn!("ワーカー{worker_id}: {source_name} のタスクが異常終了しました");
                    ItemOutcome::failed(index, source_name, &ProcessingError::task(join_error))
                }
            };

            if result_tx.send(outcome).await.is_err() {
                // 結果チャンネルが閉じられた場合は終了
                break;
            }
        }
        Ok(())
    })
}

/// Consumers: 並列ワーカープール
pub fn spawn_consumers<L, E>(
    loader: Arc<L>,
    encoder: Arc<E>,
    plan: Arc<TransformPlan>,
    work_rx: mpsc::Receiver<WorkItem>,
    result_tx: mpsc::Sender<ItemOutcome>,
    semaphore: Arc<Semaphore>,
    worker_count: usize,
) -> Vec<tokio::task::JoinHandle<ProcessingResult<()>>>
where
    L: ImageLoaderBackend + 'static,
    E: EncoderBackend + 'static,
{
    let work_rx = Arc::new(Mutex::new(work_rx));

    (0..worker_count)
        .map(|worker_id| {
            spawn_single_consumer(
                worker_id,
                Arc::clone(&loader),
                Arc::clone(&encoder),
                Arc::clone(&plan),
                Arc::clone(&work_rx),
                result_tx.clone(),
                Arc::clone(&semaphore),
            )
        })
        .collect()
}
