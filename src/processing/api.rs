// 高レベル公開API
// ProcessingEngineを簡単に使用できるようにするための便利な関数

use super::{
    implementations::{ConsoleProgressReporter, DefaultWorkerConfig, NoOpProgressReporter},
    ProcessingEngine,
};
use crate::{
    core::{BatchResult, InputItem, ProcessingConfig, ProcessingResult},
    encoder::StandardEncoder,
    image_loader::StandardImageLoader,
};

/// デフォルト構成でバッチを処理
///
/// 進捗出力なし。ファイルシステムには一切触れない。
pub async fn process(
    inputs: Vec<InputItem>,
    config: &ProcessingConfig,
) -> ProcessingResult<BatchResult> {
    create_quiet_processing_engine(DefaultWorkerConfig::default())
        .process(inputs, config)
        .await
}

/// コンソールに進捗を出すエンジンを作成
pub fn create_default_processing_engine(
    config: DefaultWorkerConfig,
) -> ProcessingEngine<StandardImageLoader, StandardEncoder, DefaultWorkerConfig, ConsoleProgressReporter>
{
    ProcessingEngine::new(
        StandardImageLoader::new(),
        StandardEncoder::new(),
        config,
        ConsoleProgressReporter::new(),
    )
}

/// 静音エンジンを作成（テスト・ライブラリ利用向け）
pub fn create_quiet_processing_engine(
    config: DefaultWorkerConfig,
) -> ProcessingEngine<StandardImageLoader, StandardEncoder, DefaultWorkerConfig, NoOpProgressReporter>
{
    ProcessingEngine::new(
        StandardImageLoader::new(),
        StandardEncoder::new(),
        config,
        NoOpProgressReporter::new(),
    )
}
