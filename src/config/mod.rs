// ジョブ設定 - JSONジョブファイルとワーカープロファイル

use crate::core::ProcessingConfig;
use crate::processing::{DefaultWorkerConfig, PROFILE_NAMES};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Customプリセットで寸法が省略された場合の既定値 (幅, 高さ)
pub const DEFAULT_CUSTOM_SIZE: (u32, u32) = (800, 600);

/// JSONジョブファイル
///
/// ```json
/// {
///   "processing": { "preset": "passport", "output_format": "jpeg", "quality": 90 },
///   "profile": "high_performance"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobFile {
    pub processing: ProcessingConfig,
    /// ワーカープロファイル名
    pub profile: Option<String>,
    /// プロファイルの並列数を上書き
    pub max_concurrent: Option<usize>,
}

impl JobFile {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("ジョブファイルの解析に失敗しました")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("ジョブファイルのシリアライズに失敗しました")
    }

    /// ファイルから読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("ジョブファイルを読み込めません: {}", path.display()))?;
        Self::from_json(&content).with_context(|| path.display().to_string())
    }

    /// プロファイルと上書き値からワーカー設定を構築
    pub fn worker_config(&self) -> Result<DefaultWorkerConfig> {
        let config = match &self.profile {
            Some(name) => worker_profile(name)?,
            None => DefaultWorkerConfig::default(),
        };
        Ok(match self.max_concurrent {
            Some(max_concurrent) => config.with_max_concurrent(max_concurrent),
            None => config,
        })
    }
}

/// 名前からワーカープロファイルを取得
pub fn worker_profile(name: &str) -> Result<DefaultWorkerConfig> {
    DefaultWorkerConfig::from_profile(name).with_context(|| {
        format!(
            "無効なプロファイル: {name}. 利用可能: {}",
            PROFILE_NAMES.join(", ")
        )
    })
}
