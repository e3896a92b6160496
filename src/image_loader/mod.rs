// 画像ローダー - 入力バイト列のデコードと画像情報の取得

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, ImageReader};
use mockall::automock;
use serde::Serialize;
use std::io::Cursor;

use crate::encoder::density;

pub mod standard;

pub use standard::StandardImageLoader;

/// 画像読み込みの結果情報
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// デコードされた画像
    pub image: DynamicImage,
    /// 元の画像サイズ
    pub original_dimensions: (u32, u32),
    /// 内容から判定したフォーマット
    pub detected_format: Option<ImageFormat>,
    /// 読み込みにかかった時間（ミリ秒）
    pub load_time_ms: u64,
}

/// 画像読み込みバックエンドのトレイト
#[automock]
#[async_trait]
pub trait ImageLoaderBackend: Send + Sync {
    /// バイト配列から画像を読み込む
    async fn load_from_bytes(&self, data: &[u8]) -> Result<LoadResult>;

    /// 読み込み戦略の名前を取得
    fn strategy_name(&self) -> &'static str;

    /// サポートする最大画像サイズを取得（ピクセル数）
    fn max_supported_pixels(&self) -> Option<u64> {
        None
    }
}

/// `inspect`が返す画像情報
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub color: String,
    pub size_kb: f64,
    pub dpi: Option<u32>,
}

/// 画像のヘッダーと内容から情報を取得
pub fn inspect(data: &[u8]) -> Result<ImageInfo> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .context("画像フォーマットの判定に失敗しました")?;
    let format = reader
        .format()
        .context("画像フォーマットを判定できません")?;
    let image = reader.decode().context("画像のデコードに失敗しました")?;

    let dpi = match format {
        ImageFormat::Jpeg => density::read_jpeg_density(data),
        ImageFormat::Png => density::read_png_density(data),
        _ => None,
    };

    Ok(ImageInfo {
        width: image.width(),
        height: image.height(),
        format: format_name(format),
        color: format!("{:?}", image.color()),
        size_kb: data.len() as f64 / 1024.0,
        dpi,
    })
}

/// 表示用のフォーマット名
pub fn format_name(format: ImageFormat) -> String {
    format
        .extensions_str()
        .first()
        .map(|extension| extension.to_uppercase())
        .unwrap_or_else(|| format!("{format:?}").to_uppercase())
}
