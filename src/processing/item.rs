// Item - 1入力分の変換（デコード → リサイズ → エンコード）とライフサイクル管理

use crate::{
    core::{
        InputItem, ItemFailure, ItemStage, OutputFormat, ProcessingConfig, ProcessingError,
        ProcessingResult, ResizeStrategy, ResolvedTarget, TargetFormat,
    },
    encoder::{resolve_format, EncoderBackend, FormatResolution},
    image_loader::ImageLoaderBackend,
    resize,
};
use std::sync::Arc;
use tracing::debug;

/// アイテムの状態遷移を記録する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLifecycle {
    history: Vec<ItemStage>,
}

impl Default for ItemLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemLifecycle {
    pub fn new() -> Self {
        Self {
            history: vec![ItemStage::Pending],
        }
    }

    /// 現在の段階
    pub fn stage(&self) -> ItemStage {
        self.history
            .last()
            .copied()
            .unwrap_or(ItemStage::Pending)
    }

    pub fn history(&self) -> &[ItemStage] {
        &self.history
    }

    /// 次の段階へ進める
    pub fn advance(&mut self, next: ItemStage) -> ProcessingResult<()> {
        let current = self.stage();
        if !current.can_transition_to(next) {
            return Err(ProcessingError::internal(anyhow::anyhow!(
                "不正な状態遷移: {current:?} -> {next:?}"
            )));
        }
        self.history.push(next);
        Ok(())
    }

    /// 現在の段階で失敗として確定し、理由を返す
    pub fn fail(&mut self, error: &ProcessingError) -> ItemFailure {
        let stage = self.stage();
        if !stage.is_terminal() {
            self.history.push(ItemStage::Failed);
        }
        ItemFailure::from_error(stage, error)
    }
}

/// バッチ全体で共有する変換パラメータ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformPlan {
    pub target: ResolvedTarget,
    pub strategy: ResizeStrategy,
    pub output_format: OutputFormat,
    pub quality: u8,
}

impl TransformPlan {
    pub fn new(target: ResolvedTarget, config: &ProcessingConfig) -> Self {
        Self {
            target,
            strategy: config.strategy,
            output_format: config.output_format,
            quality: config.quality,
        }
    }
}

/// エンコードまで完了したアイテム（命名前）
#[derive(Debug, Clone)]
pub struct TransformedItem {
    pub index: usize,
    pub source_name: String,
    pub format: TargetFormat,
    /// 出力ファイル名の拡張子（ドットなし）
    pub extension: String,
    pub encoded_bytes: Vec<u8>,
    pub original_dimensions: (u32, u32),
    pub final_dimensions: (u32, u32),
    pub note: Option<String>,
    pub lifecycle: ItemLifecycle,
}

/// ワーカーが返す1アイテム分の結果
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    Transformed(TransformedItem),
    Failed {
        index: usize,
        source_name: String,
        failure: ItemFailure,
        original_dimensions: Option<(u32, u32)>,
        note: Option<String>,
    },
}

impl ItemOutcome {
    /// 入力順の位置
    pub fn index(&self) -> usize {
        match self {
            Self::Transformed(item) => item.index,
            Self::Failed { index, .. } => *index,
        }
    }

    pub fn source_name(&self) -> &str {
        match self {
            Self::Transformed(item) => &item.source_name,
            Self::Failed { source_name, .. } => source_name,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// ワーカーの外側で発生したエラー（パニック等）から失敗結果を作る
    ///
    /// 到達した段階を追跡できないため`stage`は`Pending`（不明）になる。リサイズ・
    /// エンコード中のパニックは`transform_item`内で捕捉され、その段階が記録される。
    pub fn failed(index: usize, source_name: impl Into<String>, error: &ProcessingError) -> Self {
        Self::Failed {
            index,
            source_name: source_name.into(),
            failure: ItemFailure::from_error(ItemStage::Pending, error),
            original_dimensions: None,
            note: None,
        }
    }
}

struct StageOutput {
    encoded_bytes: Vec<u8>,
    original_dimensions: (u32, u32),
    final_dimensions: (u32, u32),
}

/// 1アイテムを変換する
///
/// どの段階の失敗も`ItemOutcome::Failed`として返し、呼び出し側には伝播しない。
pub async fn transform_item<L, E>(
    loader: &L,
    encoder: Arc<E>,
    plan: &TransformPlan,
    index: usize,
    item: InputItem,
) -> ItemOutcome
where
    L: ImageLoaderBackend + ?Sized,
    E: EncoderBackend + 'static,
{
    let resolution = resolve_format(plan.output_format, &item.name);
    let mut lifecycle = ItemLifecycle::new();
    let mut original_dimensions = None;

    let result = run_stages(
        loader,
        encoder,
        plan,
        &item,
        &resolution,
        &mut lifecycle,
        &mut original_dimensions,
    )
    .await;

    match result {
        Ok(output) => ItemOutcome::Transformed(TransformedItem {
            index,
            source_name: item.name,
            format: resolution.format,
            extension: resolution.extension,
            encoded_bytes: output.encoded_bytes,
            original_dimensions: output.original_dimensions,
            final_dimensions: output.final_dimensions,
            note: resolution.note,
            lifecycle,
        }),
        Err(error) => {
            let failure = lifecycle.fail(&error);
            debug!(
                "{} の処理に失敗 ({:?}): {}",
                item.name, failure.stage, failure.message
            );
            ItemOutcome::Failed {
                index,
                source_name: item.name,
                failure,
                original_dimensions,
                note: resolution.note,
            }
        }
    }
}

async fn run_stages<L, E>(
    loader: &L,
    encoder: Arc<E>,
    plan: &TransformPlan,
    item: &InputItem,
    resolution: &FormatResolution,
    lifecycle: &mut ItemLifecycle,
    original_dimensions: &mut Option<(u32, u32)>,
) -> ProcessingResult<StageOutput>
where
    L: ImageLoaderBackend + ?Sized,
    E: EncoderBackend + 'static,
{
    lifecycle.advance(ItemStage::Decoding)?;
    let loaded = loader
        .load_from_bytes(&item.data)
        .await
        .map_err(|e| ProcessingError::decode(item.name.clone(), e))?;
    *original_dimensions = Some(loaded.original_dimensions);
    debug!(
        "{} をデコード ({:?}, {}ms)",
        item.name, loaded.detected_format, loaded.load_time_ms
    );

    lifecycle.advance(ItemStage::Resizing)?;
    let format = resolution.format;
    let (width, height) = plan.target.dimensions();
    let strategy = plan.strategy;
    let image = loaded.image;
    let resized = tokio::task::spawn_blocking(move || {
        let keep_alpha = resize::preserves_alpha(&image, format);
        resize::resize(&image, width, height, strategy, keep_alpha)
    })
    .await??;
    let final_dimensions = (resized.width(), resized.height());

    lifecycle.advance(ItemStage::Encoding)?;
    let quality = plan.quality;
    let dpi = plan.target.dpi;
    let encoded_bytes =
        tokio::task::spawn_blocking(move || encoder.encode(&resized, format, quality, Some(dpi)))
            .await??;

    Ok(StageOutput {
        encoded_bytes,
        original_dimensions: loaded.original_dimensions,
        final_dimensions,
    })
}
