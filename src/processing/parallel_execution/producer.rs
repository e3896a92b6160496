// Producer - 入力アイテム配信機能

use crate::core::{InputItem, ProcessingResult};
use tokio::sync::mpsc;

/// 入力位置付きの作業単位
pub type WorkItem = (usize, InputItem);

/// Producer: 入力アイテムを入力順に配信
pub fn spawn_producer(
    items: Vec<InputItem>,
    work_tx: mpsc::Sender<WorkItem>,
) -> tokio::task::JoinHandle<ProcessingResult<()>> {
    tokio::spawn(async move {
        for work in items.into_iter().enumerate() {
            if work_tx.send(work).await.is_err() {
                // チャンネルが閉じられた場合は正常終了
                break;
            }
        }
        Ok(())
    })
}
