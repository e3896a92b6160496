// Collector - 結果を入力位置ごとのスロットに収集

use crate::{
    core::{ProcessingError, ProcessingResult},
    processing::{item::ItemOutcome, traits::ProgressReporter},
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Collector: 完了順に届く結果を入力順のスロットへ格納
pub fn spawn_result_collector<R>(
    mut result_rx: mpsc::Receiver<ItemOutcome>,
    total_items: usize,
    reporter: Option<Arc<R>>,
) -> tokio::task::JoinHandle<ProcessingResult<Vec<Option<ItemOutcome>>>>
where
    R: ProgressReporter + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut slots: Vec<Option<ItemOutcome>> = vec![None; total_items];
        let mut completed = 0;

        while let Some(outcome) = result_rx.recv().await {
            let index = outcome.index();
            let slot = slots.get_mut(index).ok_or_else(|| {
                ProcessingError::channel(format!("範囲外の結果インデックス: {index}"))
            })?;
            if slot.is_some() {
                return Err(ProcessingError::channel(format!(
                    "結果インデックスが重複しています: {index}"
                )));
            }

            if let (Some(reporter), ItemOutcome::Failed { source_name, failure, .. }) =
                (&reporter, &outcome)
            {
                reporter.report_error(source_name, &failure.message).await;
            }

            *slot = Some(outcome);
            completed += 1;

            if let Some(reporter) = &reporter {
                reporter.report_progress(completed, total_items).await;
            }
        }

        Ok(slots)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProcessingError;
    use crate::processing::implementations::NoOpProgressReporter;
    use crate::processing::tests::mocks::MockProgressReporter;

    fn failed(index: usize) -> ItemOutcome {
        let error = ProcessingError::decode(format!("{index}.jpg"), anyhow::anyhow!("bad"));
        ItemOutcome::failed(index, format!("{index}.jpg"), &error)
    }

    #[tokio::test]
    async fn test_collector_orders_by_index() {
        let (result_tx, result_rx) = mpsc::channel::<ItemOutcome>(10);
        let handle = spawn_result_collector::<NoOpProgressReporter>(result_rx, 3, None);

        for index in [2, 0, 1] {
            result_tx.send(failed(index)).await.unwrap();
        }
        drop(result_tx);

        let slots = handle.await.unwrap().unwrap();
        let indices: Vec<usize> = slots.iter().map(|s| s.as_ref().unwrap().index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_collector_reports_progress_and_errors() {
        let reporter = Arc::new(MockProgressReporter::default());
        let (result_tx, result_rx) = mpsc::channel::<ItemOutcome>(10);
        let handle = spawn_result_collector(result_rx, 2, Some(Arc::clone(&reporter)));

        result_tx.send(failed(1)).await.unwrap();
        result_tx.send(failed(0)).await.unwrap();
        drop(result_tx);
        handle.await.unwrap().unwrap();

        let calls = reporter.calls();
        assert_eq!(calls.iter().filter(|c| c.starts_with("error:")).count(), 2);
        assert!(calls.contains(&"progress:1:2".to_string()));
        assert!(calls.contains(&"progress:2:2".to_string()));
    }

    #[tokio::test]
    async fn test_collector_leaves_missing_slots_empty() {
        let (result_tx, result_rx) = mpsc::channel::<ItemOutcome>(10);
        let handle = spawn_result_collector::<NoOpProgressReporter>(result_rx, 2, None);

        result_tx.send(failed(0)).await.unwrap();
        drop(result_tx);

        let slots = handle.await.unwrap().unwrap();
        assert!(slots[0].is_some());
        assert!(slots[1].is_none());
    }

    #[tokio::test]
    async fn test_collector_rejects_out_of_range_index() {
        let (result_tx, result_rx) = mpsc::channel::<ItemOutcome>(10);
        let handle = spawn_result_collector::<NoOpProgressReporter>(result_rx, 1, None);

        result_tx.send(failed(5)).await.unwrap();
        drop(result_tx);

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(ProcessingError::ChannelError { .. })));
    }
}
