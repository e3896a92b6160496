// バッチ変換パイプラインのエラー型定義
// 設定レベルのエラーはバッチ全体を中断し、画像単位のエラーは該当アイテムに閉じ込める

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 変換パイプライン固有のエラー型
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("寸法エラー: {reason}")]
    InvalidDimensions { reason: String },

    #[error("バリデーションエラー: {field} - {reason}")]
    ValidationError { field: String, reason: String },

    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("無効な画像: {reason}")]
    InvalidImage { reason: String },

    #[error("デコードエラー: {file_name} - {source}")]
    DecodeError {
        file_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("未対応のフォーマット: {format}")]
    UnsupportedFormat { format: String },

    #[error("エンコードエラー: {format} - {source}")]
    EncodeError {
        format: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("アーカイブエラー: {source}")]
    ArchiveError {
        #[source]
        source: anyhow::Error,
    },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("チャンネルエラー: {message}")]
    ChannelError { message: String },

    #[error("内部エラー: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl ProcessingError {
    /// 寸法エラーの作成
    pub fn invalid_dimensions(reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            reason: reason.into(),
        }
    }

    /// バリデーションエラーの作成
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// 無効な画像エラーの作成
    pub fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
        }
    }

    /// デコードエラーの作成
    pub fn decode(file_name: impl Into<String>, source: anyhow::Error) -> Self {
        Self::DecodeError {
            file_name: file_name.into(),
            source,
        }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// エンコードエラーの作成
    pub fn encode(format: impl Into<String>, source: anyhow::Error) -> Self {
        Self::EncodeError {
            format: format.into(),
            source,
        }
    }

    pub fn archive(source: anyhow::Error) -> Self {
        Self::ArchiveError { source }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    /// チャンネルエラーの作成
    pub fn channel(message: impl Into<String>) -> Self {
        Self::ChannelError {
            message: message.into(),
        }
    }

    /// 内部エラーの作成
    pub fn internal(source: anyhow::Error) -> Self {
        Self::InternalError { source }
    }

    /// レポート用のエラー種別を取得
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDimensions { .. } => ErrorKind::InvalidDimensions,
            Self::ValidationError { .. } | Self::ConfigurationError { .. } => {
                ErrorKind::Configuration
            }
            Self::InvalidImage { .. } => ErrorKind::InvalidImage,
            Self::DecodeError { .. } => ErrorKind::DecodeError,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::EncodeError { .. } => ErrorKind::EncodeError,
            Self::ArchiveError { .. } => ErrorKind::Archive,
            Self::TaskError { .. } | Self::ChannelError { .. } | Self::InternalError { .. } => {
                ErrorKind::Internal
            }
        }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidDimensions { .. } | Self::ValidationError { .. } => {
                ErrorSeverity::Critical
            }
            Self::ConfigurationError { .. } | Self::ArchiveError { .. } => ErrorSeverity::High,
            Self::InvalidImage { .. }
            | Self::DecodeError { .. }
            | Self::UnsupportedFormat { .. }
            | Self::EncodeError { .. } => ErrorSeverity::Medium,
            Self::ChannelError { .. } | Self::TaskError { .. } => ErrorSeverity::High,
            Self::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// アイテム単位に閉じ込められるエラーかどうか
    ///
    /// trueのエラーはバッチを中断せず、該当アイテムをFailedとして記録する
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidImage { .. }
                | Self::DecodeError { .. }
                | Self::UnsupportedFormat { .. }
                | Self::EncodeError { .. }
                | Self::TaskError { .. }
        )
    }

    /// エラー解決のための提案
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidDimensions { .. } => Some("幅と高さに1以上の整数を指定してください"),
            Self::ValidationError { .. } => Some("設定値の範囲を確認してください"),
            Self::ConfigurationError { .. } => Some("ワーカー設定を確認してください"),
            Self::DecodeError { .. } | Self::InvalidImage { .. } => {
                Some("画像ファイルの形式と整合性を確認してください")
            }
            _ => None,
        }
    }
}

/// レポートに記録するエラー種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidDimensions,
    Configuration,
    InvalidImage,
    DecodeError,
    UnsupportedFormat,
    EncodeError,
    Archive,
    Internal,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidDimensions => "InvalidDimensions",
            Self::Configuration => "Configuration",
            Self::InvalidImage => "InvalidImage",
            Self::DecodeError => "DecodeError",
            Self::UnsupportedFormat => "UnsupportedFormat",
            Self::EncodeError => "EncodeError",
            Self::Archive => "Archive",
            Self::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 低重要度 - ログ出力程度
    Low,
    /// 中重要度 - 該当アイテムのみ失敗
    Medium,
    /// 高重要度 - 要対応
    High,
    /// 致命的 - バッチ中断
    Critical,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// パイプラインの結果型
pub type ProcessingResult<T> = std::result::Result<T, ProcessingError>;

impl From<tokio::task::JoinError> for ProcessingError {
    fn from(error: tokio::task::JoinError) -> Self {
        ProcessingError::TaskError { source: error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_processing_error_creation() {
        let dims = ProcessingError::invalid_dimensions("幅が0です");
        assert!(dims.to_string().contains("寸法エラー"));
        assert!(dims.to_string().contains("幅が0です"));

        let decode = ProcessingError::decode("broken.png", anyhow::anyhow!("不正なヘッダー"));
        assert!(decode.to_string().contains("デコードエラー"));
        assert!(decode.to_string().contains("broken.png"));

        let encode = ProcessingError::encode("webp", anyhow::anyhow!("エンコーダー失敗"));
        assert!(encode.to_string().contains("エンコードエラー"));

        let validation = ProcessingError::validation("quality", "1..=100の範囲外です");
        assert!(validation.to_string().contains("quality"));
    }

    #[test]
    fn test_error_source_chain() {
        let error = ProcessingError::archive(anyhow::anyhow!("書き込み失敗"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(
            ProcessingError::invalid_dimensions("x").kind(),
            ErrorKind::InvalidDimensions
        );
        assert_eq!(
            ProcessingError::decode("a.png", anyhow::anyhow!("x")).kind(),
            ErrorKind::DecodeError
        );
        assert_eq!(
            ProcessingError::unsupported_format("tiff").kind(),
            ErrorKind::UnsupportedFormat
        );
        assert_eq!(ErrorKind::DecodeError.to_string(), "DecodeError");
    }

    #[test]
    fn test_error_recoverability() {
        assert!(!ProcessingError::invalid_dimensions("x").is_recoverable());
        assert!(!ProcessingError::validation("quality", "x").is_recoverable());
        assert!(ProcessingError::decode("a.png", anyhow::anyhow!("x")).is_recoverable());
        assert!(ProcessingError::encode("jpeg", anyhow::anyhow!("x")).is_recoverable());
        assert!(!ProcessingError::archive(anyhow::anyhow!("x")).is_recoverable());
    }

    #[test]
    fn test_error_severity() {
        assert_eq!(
            ProcessingError::invalid_dimensions("x").severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            ProcessingError::decode("a.png", anyhow::anyhow!("x")).severity(),
            ErrorSeverity::Medium
        );
        assert!(ErrorSeverity::Critical > ErrorSeverity::High);
        assert!(ErrorSeverity::High > ErrorSeverity::Medium);
        assert_eq!(ErrorSeverity::Critical.as_str(), "CRITICAL");
    }

    #[test]
    fn test_suggestion() {
        assert!(ProcessingError::invalid_dimensions("x").suggestion().is_some());
        assert!(ProcessingError::channel("closed").suggestion().is_none());
    }
}
