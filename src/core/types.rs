// 変換パイプラインのデータ型定義

use super::error::{ErrorKind, ProcessingError, ProcessingResult};
use serde::{Deserialize, Serialize};

/// 出力サイズのプリセット
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// 1080x1080 の正方形
    #[default]
    #[serde(rename = "square")]
    #[value(name = "square")]
    Square1x1,
    /// 1920x1080 のフルHD
    #[serde(rename = "full-hd")]
    #[value(name = "full-hd")]
    FullHd1080p,
    /// 35mm x 45mm (300 DPI) のパスポート写真
    Passport,
    /// 呼び出し側が指定する任意の寸法
    Custom,
}

impl Preset {
    /// 一覧表示用の全プリセット
    pub const ALL: [Preset; 4] = [
        Preset::Square1x1,
        Preset::FullHd1080p,
        Preset::Passport,
        Preset::Custom,
    ];

    /// 表示名
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Square1x1 => "1:1",
            Self::FullHd1080p => "1080p",
            Self::Passport => "Passport (35x45mm)",
            Self::Custom => "Custom",
        }
    }
}

/// リサイズ戦略
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ResizeStrategy {
    /// アスペクト比を保って枠内に収め、余白を背景で埋める (contain)
    #[default]
    Fit,
    /// アスペクト比を保って枠を覆い、はみ出した部分を中央から切り取る (cover)
    Fill,
    /// 縦横を独立に拡大縮小する
    Stretch,
}

/// 出力フォーマットの選択肢
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    #[serde(rename = "webp")]
    #[value(name = "webp")]
    WebP,
    /// 入力ファイル名の拡張子からアイテムごとに決定
    #[default]
    Original,
}

/// 実際にエンコードする具体的なフォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Jpeg,
    Png,
    #[serde(rename = "webp")]
    WebP,
    Bmp,
    Gif,
    Tiff,
}

impl TargetFormat {
    /// 拡張子から対応するフォーマットを推定（大文字小文字は区別しない）
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::WebP),
            "bmp" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// 正規の拡張子（ドットなし）
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Tiff => "tiff",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::WebP => "WEBP",
            Self::Bmp => "BMP",
            Self::Gif => "GIF",
            Self::Tiff => "TIFF",
        }
    }

    /// アルファチャンネルを保持できるか（BMPは白背景に合成する）
    pub const fn supports_alpha(&self) -> bool {
        !matches!(self, Self::Jpeg | Self::Bmp)
    }

    /// qualityが意味を持つ非可逆フォーマットか
    pub const fn is_lossy(&self) -> bool {
        matches!(self, Self::Jpeg | Self::WebP)
    }
}

impl std::fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 出力ファイル名の規則
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenamingRule {
    pub prefix: String,
    pub suffix: String,
    /// trueなら元のベース名を連番で置き換える
    pub use_sequence: bool,
    pub sequence_start: u32,
    /// 連番のゼロ埋め桁数
    pub sequence_padding: usize,
}

impl Default for RenamingRule {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            use_sequence: false,
            sequence_start: 1,
            sequence_padding: 4,
        }
    }
}

impl RenamingRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// 連番を有効化
    pub fn with_sequence(mut self, start: u32, padding: usize) -> Self {
        self.use_sequence = true;
        self.sequence_start = start;
        self.sequence_padding = padding;
        self
    }
}

/// バッチ1回分の変換設定
///
/// リクエストごとに一度だけ構築し、パイプラインには不変の値として渡す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub preset: Preset,
    /// Customプリセット用の幅（ピクセル）
    pub custom_width: Option<u32>,
    /// Customプリセット用の高さ（ピクセル）
    pub custom_height: Option<u32>,
    pub strategy: ResizeStrategy,
    pub output_format: OutputFormat,
    /// JPEG/WEBPの品質 (1..=100)、PNGでは無視される
    pub quality: u8,
    pub renaming: RenamingRule,
}

/// 品質のデフォルト値
pub const DEFAULT_QUALITY: u8 = 95;

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            custom_width: None,
            custom_height: None,
            strategy: ResizeStrategy::default(),
            output_format: OutputFormat::default(),
            quality: DEFAULT_QUALITY,
            renaming: RenamingRule::default(),
        }
    }
}

impl ProcessingConfig {
    pub fn new(preset: Preset) -> Self {
        Self {
            preset,
            ..Self::default()
        }
    }

    /// Customプリセットの寸法を指定
    pub fn with_custom_size(mut self, width: u32, height: u32) -> Self {
        self.preset = Preset::Custom;
        self.custom_width = Some(width);
        self.custom_height = Some(height);
        self
    }

    pub fn with_strategy(mut self, strategy: ResizeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_renaming(mut self, renaming: RenamingRule) -> Self {
        self.renaming = renaming;
        self
    }

    /// 寸法以外の設定値を検証（寸法はプリセット解決時に検証する）
    pub fn validate(&self) -> ProcessingResult<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(ProcessingError::validation(
                "quality",
                format!("1から100の範囲で指定してください (指定値: {})", self.quality),
            ));
        }

        for (field, value) in [
            ("renaming.prefix", &self.renaming.prefix),
            ("renaming.suffix", &self.renaming.suffix),
        ] {
            if value.contains(['/', '\\']) {
                return Err(ProcessingError::validation(
                    field,
                    "パス区切り文字は使用できません",
                ));
            }
        }

        Ok(())
    }
}

/// プリセット解決後の出力寸法とDPI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTarget {
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
}

impl ResolvedTarget {
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// 入力画像（ファイル名とバイト列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputItem {
    pub name: String,
    pub data: Vec<u8>,
}

impl InputItem {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// アイテムのライフサイクル段階
///
/// `Pending -> Decoding -> Resizing -> Encoding -> Named -> Success`、
/// または任意の非終端段階から `Failed` へ遷移する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStage {
    Pending,
    Decoding,
    Resizing,
    Encoding,
    Named,
    Success,
    Failed,
}

impl ItemStage {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }

    /// 遷移が許可されているか
    pub fn can_transition_to(&self, next: ItemStage) -> bool {
        match (self, next) {
            (Self::Pending, Self::Decoding)
            | (Self::Decoding, Self::Resizing)
            | (Self::Resizing, Self::Encoding)
            | (Self::Encoding, Self::Named)
            | (Self::Named, Self::Success) => true,
            (current, Self::Failed) => !current.is_terminal(),
            _ => false,
        }
    }
}

/// 失敗したアイテムの理由
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub kind: ErrorKind,
    /// 失敗が発生した段階
    pub stage: ItemStage,
    pub message: String,
}

impl ItemFailure {
    pub fn from_error(stage: ItemStage, error: &ProcessingError) -> Self {
        Self {
            kind: error.kind(),
            stage,
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    Success,
    Failed(ItemFailure),
}

/// 1入力に対する確定済みの処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedItem {
    /// 入力順の位置
    pub index: usize,
    /// 割り当てられた連番（失敗しても消費される）
    pub sequence_index: u32,
    pub source_name: String,
    pub output_name: Option<String>,
    pub format: Option<TargetFormat>,
    pub encoded_bytes: Vec<u8>,
    pub original_dimensions: Option<(u32, u32)>,
    pub final_dimensions: Option<(u32, u32)>,
    /// 失敗ではない補足（フォーマットのフォールバック等）
    pub note: Option<String>,
    pub status: ItemStatus,
}

impl ProcessedItem {
    pub fn is_success(&self) -> bool {
        matches!(self.status, ItemStatus::Success)
    }

    pub fn failure(&self) -> Option<&ItemFailure> {
        match &self.status {
            ItemStatus::Failed(failure) => Some(failure),
            ItemStatus::Success => None,
        }
    }

    /// サマリー表の1行
    pub fn report(&self) -> ItemReport {
        ItemReport {
            source_name: self.source_name.clone(),
            output_name: self.output_name.clone(),
            format: self.format,
            original_dimensions: self.original_dimensions,
            final_dimensions: self.final_dimensions,
            output_size: self.encoded_bytes.len(),
            note: self.note.clone(),
            success: self.is_success(),
            error_kind: self.failure().map(|f| f.kind),
            error: self.failure().map(|f| f.message.clone()),
        }
    }
}

/// レポート出力用の1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReport {
    pub source_name: String,
    pub output_name: Option<String>,
    pub format: Option<TargetFormat>,
    pub original_dimensions: Option<(u32, u32)>,
    pub final_dimensions: Option<(u32, u32)>,
    pub output_size: usize,
    pub note: Option<String>,
    pub success: bool,
    pub error_kind: Option<ErrorKind>,
    pub error: Option<String>,
}

/// バッチ全体の結果
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    /// 成功アイテムを入力順に格納したZIP（成功0件ならNone）
    pub archive: Option<Vec<u8>>,
    pub items: Vec<ProcessedItem>,
    pub succeeded: usize,
    pub failed: usize,
    pub total_processing_time_ms: u64,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// "N of M images processed successfully"
    pub fn summary(&self) -> String {
        format!(
            "{} of {} images processed successfully",
            self.succeeded,
            self.total()
        )
    }

    pub fn report(&self) -> Vec<ItemReport> {
        self.items.iter().map(ProcessedItem::report).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProcessedItem> {
        self.items.iter().filter(|item| !item.is_success())
    }
}
