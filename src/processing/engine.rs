// ProcessingEngine - 依存性注入によるバッチ処理エンジン

use super::{
    item::{ItemOutcome, TransformPlan},
    parallel_execution::ProcessingPipeline,
    traits::{ProgressReporter, WorkerConfig},
};
use crate::{
    archive::ZipArchiveBuilder,
    core::{
        BatchResult, InputItem, ItemStage, ItemStatus, ProcessedItem, ProcessingConfig,
        ProcessingError, ProcessingResult, RenamingRule,
    },
    encoder::EncoderBackend,
    image_loader::ImageLoaderBackend,
    naming, preset,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// バッチ処理エンジン
///
/// 依存関係はすべてコンストラクタで注入する。並列処理で共有されるものは
/// 最初からArcで保持する。
pub struct ProcessingEngine<L, E, C, R> {
    loader: Arc<L>,
    encoder: Arc<E>,
    config: Arc<C>,
    reporter: Arc<R>,
}

impl<L, E, C, R> ProcessingEngine<L, E, C, R>
where
    L: ImageLoaderBackend + 'static,
    E: EncoderBackend + 'static,
    C: WorkerConfig,
    R: ProgressReporter + 'static,
{
    pub fn new(loader: L, encoder: E, config: C, reporter: R) -> Self {
        Self {
            loader: Arc::new(loader),
            encoder: Arc::new(encoder),
            config: Arc::new(config),
            reporter: Arc::new(reporter),
        }
    }

    /// 入力バッチを処理してアーカイブとアイテムごとの結果を返す
    ///
    /// 設定エラー（寸法・品質・ワーカー設定）は1件も処理せずに`Err`を返す。
    /// アイテム単位の失敗は`BatchResult`に記録され、バッチは中断しない。
    pub async fn process(
        &self,
        inputs: Vec<InputItem>,
        config: &ProcessingConfig,
    ) -> ProcessingResult<BatchResult> {
        let start_time = Instant::now();

        config.validate()?;
        let target = preset::resolve_config(config)?;
        self.validate_worker_config()?;

        let total_items = inputs.len();
        info!(
            preset = config.preset.label(),
            width = target.width,
            height = target.height,
            dpi = target.dpi,
            strategy = ?config.strategy,
            output_format = ?config.output_format,
            total_items,
            loader = self.loader.strategy_name(),
            encoder = self.encoder.encoder_name(),
            "バッチ処理を開始"
        );

        let reporter = self
            .config
            .enable_progress_reporting()
            .then(|| Arc::clone(&self.reporter));
        if let Some(reporter) = &reporter {
            reporter.report_started(total_items).await;
        }

        let pipeline = ProcessingPipeline::new(Arc::clone(&self.loader), Arc::clone(&self.encoder));
        let outcomes = pipeline
            .execute(
                inputs,
                TransformPlan::new(target, config),
                self.config.as_ref(),
                reporter.clone(),
            )
            .await?;

        let mut result = assemble_batch(outcomes, &config.renaming)?;
        result.total_processing_time_ms = start_time.elapsed().as_millis() as u64;

        if let Some(reporter) = &reporter {
            reporter
                .report_completed(result.succeeded, result.failed)
                .await;
        }
        info!(
            succeeded = result.succeeded,
            failed = result.failed,
            elapsed_ms = result.total_processing_time_ms,
            "{}",
            result.summary()
        );

        Ok(result)
    }

    fn validate_worker_config(&self) -> ProcessingResult<()> {
        if self.config.max_concurrent_tasks() == 0 {
            return Err(ProcessingError::configuration(
                "並列タスク数は1以上である必要があります",
            ));
        }
        if self.config.channel_buffer_size() == 0 {
            return Err(ProcessingError::configuration(
                "チャンネルバッファサイズは1以上である必要があります",
            ));
        }
        Ok(())
    }

    /// 設定への参照を取得
    pub fn config(&self) -> &C {
        &self.config
    }

    /// レポーターへの参照を取得
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn loader_name(&self) -> &'static str {
        self.loader.strategy_name()
    }

    pub fn encoder_name(&self) -> &'static str {
        self.encoder.encoder_name()
    }
}

/// 入力順の結果に名前を付け、成功分をアーカイブにまとめる
///
/// 連番は失敗アイテムも消費する。名前の衝突は入力順に解決する。
pub fn assemble_batch(
    outcomes: Vec<ItemOutcome>,
    rule: &RenamingRule,
) -> ProcessingResult<BatchResult> {
    let proposed: Vec<Option<String>> = outcomes
        .iter()
        .enumerate()
        .map(|(position, outcome)| match outcome {
            ItemOutcome::Transformed(item) => Some(naming::next_name(
                &item.source_name,
                naming::sequence_index(position, rule),
                rule,
                &item.extension,
            )),
            ItemOutcome::Failed { .. } => None,
        })
        .collect();
    let names = naming::disambiguate(proposed);

    let mut archive = ZipArchiveBuilder::new();
    let mut items = Vec::with_capacity(outcomes.len());
    let mut succeeded = 0;
    let mut failed = 0;

    for (position, (outcome, name)) in outcomes.into_iter().zip(names).enumerate() {
        let sequence_index = naming::sequence_index(position, rule);

        let processed = match outcome {
            ItemOutcome::Transformed(mut item) => {
                let output_name = name.ok_or_else(|| {
                    ProcessingError::internal(anyhow::anyhow!(
                        "{} に出力名が割り当てられていません",
                        item.source_name
                    ))
                })?;
                item.lifecycle.advance(ItemStage::Named)?;
                archive.add_entry(&output_name, &item.encoded_bytes)?;
                item.lifecycle.advance(ItemStage::Success)?;
                debug!("{} -> {}", item.source_name, output_name);
                succeeded += 1;

                ProcessedItem {
                    index: item.index,
                    sequence_index,
                    source_name: item.source_name,
                    output_name: Some(output_name),
                    format: Some(item.format),
                    encoded_bytes: item.encoded_bytes,
                    original_dimensions: Some(item.original_dimensions),
                    final_dimensions: Some(item.final_dimensions),
                    note: item.note,
                    status: ItemStatus::Success,
                }
            }
            ItemOutcome::Failed {
                index,
                source_name,
                failure,
                original_dimensions,
                note,
            } => {
                warn!(
                    kind = %failure.kind,
                    stage = ?failure.stage,
                    "{source_name} をスキップ: {}",
                    failure.message
                );
                failed += 1;

                ProcessedItem {
                    index,
                    sequence_index,
                    source_name,
                    output_name: None,
                    format: None,
                    encoded_bytes: Vec::new(),
                    original_dimensions,
                    final_dimensions: None,
                    note,
                    status: ItemStatus::Failed(failure),
                }
            }
        };
        items.push(processed);
    }

    let archive = if archive.is_empty() {
        None
    } else {
        Some(archive.finish()?)
    };

    Ok(BatchResult {
        archive,
        items,
        succeeded,
        failed,
        total_processing_time_ms: 0,
    })
}
